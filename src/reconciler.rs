// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::config::Config;
use crate::custom::CustomType;
use crate::diagnostics::Diagnostics;
use crate::path::Path;
use crate::registry::{RegistryError, TypeRegistry};
use crate::value::Value;

use std::rc::Rc;

/// A prior and a proposed value at one location.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileRequest {
    pub path: Path,
    pub prior: Value,
    pub proposed: Value,
}

/// Outcome of reconciling a request.
///
/// `value` is either the proposed value, the prior value, or a collection
/// rebuilt from the proposed value's elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub value: Value,
    pub diagnostics: Diagnostics,
}

impl Reconciled {
    pub(crate) fn unchanged(proposed: &Value) -> Self {
        Self {
            value: proposed.clone(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}

/// The semantic-equality reconciler.
///
/// Holds the custom types values may refer to and the configuration.
/// Reconciliation itself keeps no state between calls.
#[derive(Debug, Clone)]
pub struct Reconciler {
    types: TypeRegistry,
    config: Config,
}

/// Create a reconciler with the built-in custom types.
impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    pub fn new() -> Self {
        #[allow(unused_mut)]
        let mut reconciler = Self::without_builtins();
        #[cfg(feature = "builtins")]
        crate::builtins::register_all(&mut reconciler.types);
        reconciler
    }

    pub fn without_builtins() -> Self {
        Self {
            types: TypeRegistry::new("TYPE_REGISTRY"),
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn register_type(&mut self, t: Rc<dyn CustomType>) -> Result<(), RegistryError> {
        self.types.register_type(t)
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn reconcile(&self, request: &ReconcileRequest) -> Reconciled {
        self.reconcile_at(&request.path, &request.prior, &request.proposed)
    }

    pub fn reconcile_value(&self, path: &Path, prior: &Value, proposed: &Value) -> Reconciled {
        self.reconcile_at(path, prior, proposed)
    }

    /// Reconcile a whole resource state, addressed from the root.
    pub fn reconcile_state(&self, prior: &Value, proposed: &Value) -> Reconciled {
        self.reconcile_at(&Path::empty(), prior, proposed)
    }
}
