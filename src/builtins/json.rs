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

pub const JSON: &str = "json";

pub fn register(registry: &mut TypeRegistry) {
    add(registry, Rc::new(NormalizedJson));
}

pub fn json() -> Type {
    Type::custom(JSON, Type::String)
}

/// JSON documents compared after parsing, so whitespace and key order do not matter.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedJson;

impl CustomType for NormalizedJson {
    fn name(&self) -> &str {
        JSON
    }

    fn semantic_equality(&self) -> Option<&dyn SemanticEquality> {
        Some(self)
    }
}

fn parse(which: &str, s: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(s).map_err(|e| {
        format!(
            "An unexpected error occurred while performing semantic equality checks. \
             The {which} value is not valid JSON: {e}"
        )
    })
}

impl SemanticEquality for NormalizedJson {
    fn semantic_equals(&self, path: &Path, proposed: &Value, prior: &Value) -> (bool, Diagnostics) {
        compare_strings(JSON, path, proposed, prior, |p, q| {
            Ok(parse("proposed", p)? == parse("prior", q)?)
        })
    }
}
