// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

#[cfg(feature = "builtins")]
pub mod builtins;
mod config;
mod custom;
mod diagnostics;
mod number;
mod path;
mod reconcile;
mod reconciler;
mod registry;
mod types;
mod value;

pub use config::{Config, MismatchPolicy};
pub use custom::{CollectionBuilder, CustomType, Retag, SemanticEquality};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use number::Number;
pub use path::{Path, PathStep};
pub use reconciler::{ReconcileRequest, Reconciled, Reconciler};
pub use registry::{Registry, RegistryError, TypeRegistry};
pub use types::{AttributeTypes, Kind, Type};
pub use value::{Data, Value, ValueError};
