// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins::utils::{add, compare_strings};
use crate::custom::{CustomType, SemanticEquality};
use crate::diagnostics::Diagnostics;
use crate::path::Path;
use crate::registry::TypeRegistry;
use crate::types::Type;
use crate::value::Value;

use std::rc::Rc;

pub const CASE_INSENSITIVE: &str = "case_insensitive";
pub const LOCATION: &str = "location";
pub const MAJOR_MINOR_VERSION: &str = "major_minor_version";

pub fn register(registry: &mut TypeRegistry) {
    add(registry, Rc::new(CaseInsensitive));
    add(registry, Rc::new(Location));
    add(registry, Rc::new(MajorMinorVersion));
}

pub fn case_insensitive() -> Type {
    Type::custom(CASE_INSENSITIVE, Type::String)
}

pub fn location() -> Type {
    Type::custom(LOCATION, Type::String)
}

pub fn major_minor_version() -> Type {
    Type::custom(MAJOR_MINOR_VERSION, Type::String)
}

/// Strings that differ only in case.
#[derive(Debug, Clone, Copy)]
pub struct CaseInsensitive;

impl CustomType for CaseInsensitive {
    fn name(&self) -> &str {
        CASE_INSENSITIVE
    }

    fn semantic_equality(&self) -> Option<&dyn SemanticEquality> {
        Some(self)
    }
}

impl SemanticEquality for CaseInsensitive {
    fn semantic_equals(&self, path: &Path, proposed: &Value, prior: &Value) -> (bool, Diagnostics) {
        compare_strings(CASE_INSENSITIVE, path, proposed, prior, |p, q| {
            Ok(p.to_lowercase() == q.to_lowercase())
        })
    }
}

/// Azure region names: `West Europe` and `westeurope` are the same location.
#[derive(Debug, Clone, Copy)]
pub struct Location;

pub fn normalize_location(location: &str) -> String {
    location.to_lowercase().replace(' ', "")
}

impl CustomType for Location {
    fn name(&self) -> &str {
        LOCATION
    }

    fn semantic_equality(&self) -> Option<&dyn SemanticEquality> {
        Some(self)
    }
}

impl SemanticEquality for Location {
    fn semantic_equals(&self, path: &Path, proposed: &Value, prior: &Value) -> (bool, Diagnostics) {
        compare_strings(LOCATION, path, proposed, prior, |p, q| {
            Ok(normalize_location(p) == normalize_location(q))
        })
    }
}

/// Versions the service expands on its own, e.g. `3.6` is returned as `3.6.1000.67`.
///
/// Two versions are equal when both have a major and a minor component and those match.
#[derive(Debug, Clone, Copy)]
pub struct MajorMinorVersion;

impl CustomType for MajorMinorVersion {
    fn name(&self) -> &str {
        MAJOR_MINOR_VERSION
    }

    fn semantic_equality(&self) -> Option<&dyn SemanticEquality> {
        Some(self)
    }
}

impl SemanticEquality for MajorMinorVersion {
    fn semantic_equals(&self, path: &Path, proposed: &Value, prior: &Value) -> (bool, Diagnostics) {
        compare_strings(MAJOR_MINOR_VERSION, path, proposed, prior, |p, q| {
            let p: Vec<&str> = p.split('.').collect();
            let q: Vec<&str> = q.split('.').collect();
            Ok(p.len() >= 2 && q.len() >= 2 && p[..2] == q[..2])
        })
    }
}
