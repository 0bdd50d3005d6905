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

use chrono::{DateTime, FixedOffset};

pub const RFC3339: &str = "rfc3339";

pub fn register(registry: &mut TypeRegistry) {
    add(registry, Rc::new(Rfc3339));
}

pub fn rfc3339() -> Type {
    Type::custom(RFC3339, Type::String)
}

/// RFC 3339 timestamps, equal when they denote the same instant.
#[derive(Debug, Clone, Copy)]
pub struct Rfc3339;

impl CustomType for Rfc3339 {
    fn name(&self) -> &str {
        RFC3339
    }

    fn semantic_equality(&self) -> Option<&dyn SemanticEquality> {
        Some(self)
    }
}

fn parse(which: &str, s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s)
        .map_err(|e| format!("The {which} value `{s}` is not a valid RFC 3339 timestamp: {e}"))
}

impl SemanticEquality for Rfc3339 {
    fn semantic_equals(&self, path: &Path, proposed: &Value, prior: &Value) -> (bool, Diagnostics) {
        compare_strings(RFC3339, path, proposed, prior, |p, q| {
            Ok(parse("proposed", p)? == parse("prior", q)?)
        })
    }
}
