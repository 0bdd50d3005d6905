// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::value::Value;

use core::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};

/// One step from a value to one of its children.
#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    /// Object attribute.
    AttributeName(Rc<str>),
    /// List element, by position.
    ElementKeyInt(usize),
    /// Map element, by key.
    ElementKeyString(Rc<str>),
    /// Set element, addressed by the element's value.
    ElementKeyValue(Value),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::AttributeName(name) => f.write_str(name),
            PathStep::ElementKeyInt(idx) => write!(f, "[{idx}]"),
            PathStep::ElementKeyString(key) => write!(f, "[{key:?}]"),
            PathStep::ElementKeyValue(v) => write!(f, "[Value({v})]"),
        }
    }
}

/// Location of a value inside a nested value, as a sequence of steps from the root.
///
/// Paths are values: every `at_*` method returns a new path and leaves the
/// receiver untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    pub fn empty() -> Path {
        Path::default()
    }

    pub fn root(name: impl Into<Rc<str>>) -> Path {
        Path::empty().at_name(name)
    }

    fn with_step(&self, step: PathStep) -> Path {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend(self.steps.iter().cloned());
        steps.push(step);
        Path { steps }
    }

    pub fn at_name(&self, name: impl Into<Rc<str>>) -> Path {
        self.with_step(PathStep::AttributeName(name.into()))
    }

    pub fn at_list_index(&self, index: usize) -> Path {
        self.with_step(PathStep::ElementKeyInt(index))
    }

    pub fn at_map_key(&self, key: impl Into<Rc<str>>) -> Path {
        self.with_step(PathStep::ElementKeyString(key.into()))
    }

    pub fn at_set_value(&self, value: Value) -> Path {
        self.with_step(PathStep::ElementKeyValue(value))
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn last_step(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// The path without its last step. The parent of the empty path is itself.
    pub fn parent(&self) -> Path {
        let mut steps = self.steps.clone();
        steps.pop();
        Path { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, step) in self.steps.iter().enumerate() {
            if idx > 0 && matches!(step, PathStep::AttributeName(_)) {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
