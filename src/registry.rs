// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::custom::CustomType;

use core::fmt;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("{registry}: `{name}` is already registered")]
    AlreadyExists { name: String, registry: String },
    #[error("{registry}: `{name}` is not a valid name; names must contain a non-whitespace character")]
    InvalidName { name: String, registry: String },
}

/// Items shared by reference under unique, non-blank names.
///
/// Names are kept sorted.
pub struct Registry<T: ?Sized> {
    items: BTreeMap<Rc<str>, Rc<T>>,
    label: String,
}

impl<T: ?Sized> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            label: self.label.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("label", &self.label)
            .field("names", &self.items.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: ?Sized> Registry<T> {
    /// `label` prefixes error messages.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            items: BTreeMap::new(),
            label: label.into(),
        }
    }

    fn error(&self, name: &str, blank: bool) -> RegistryError {
        let (name, registry) = (name.to_string(), self.label.clone());
        if blank {
            RegistryError::InvalidName { name, registry }
        } else {
            RegistryError::AlreadyExists { name, registry }
        }
    }

    pub fn register(&mut self, name: &str, item: Rc<T>) -> Result<(), RegistryError> {
        if name.trim().is_empty() {
            return Err(self.error(name, true));
        }
        if self.items.contains_key(name) {
            return Err(self.error(name, false));
        }
        self.items.insert(name.into(), item);
        Ok(())
    }

    /// Like [`Registry::register`], but an existing name is `Ok(false)` and keeps the old item.
    pub fn try_register(&mut self, name: &str, item: Rc<T>) -> Result<bool, RegistryError> {
        match self.register(name, item) {
            Ok(()) => Ok(true),
            Err(RegistryError::AlreadyExists { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Rc<T>> {
        self.items.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Rc<T>> {
        self.items.remove(name)
    }

    pub fn list_names(&self) -> Vec<Rc<str>> {
        self.items.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Registry of custom types, keyed by the name values carry in their type.
pub type TypeRegistry = Registry<dyn CustomType>;

impl Registry<dyn CustomType> {
    pub fn register_type(&mut self, t: Rc<dyn CustomType>) -> Result<(), RegistryError> {
        let name = t.name().to_string();
        self.register(&name, t)
    }
}
