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

pub const VERSION: &str = "version";

pub fn register(registry: &mut TypeRegistry) {
    add(registry, Rc::new(Version));
}

pub fn version() -> Type {
    Type::custom(VERSION, Type::String)
}

/// Semantic versions where missing minor and patch components default to zero.
///
/// `1.0` and `1.0.0` are equal. Build metadata is ignored.
#[derive(Debug, Clone, Copy)]
pub struct Version;

impl CustomType for Version {
    fn name(&self) -> &str {
        VERSION
    }

    fn semantic_equality(&self) -> Option<&dyn SemanticEquality> {
        Some(self)
    }
}

pub fn parse_lenient(s: &str) -> Result<semver::Version, semver::Error> {
    let s = s.trim();
    let s = s.strip_prefix('v').unwrap_or(s);
    let split = s.find(|c| c == '-' || c == '+').unwrap_or(s.len());
    let (core, rest) = s.split_at(split);
    let padded = match core.split('.').count() {
        1 => format!("{core}.0.0{rest}"),
        2 => format!("{core}.0{rest}"),
        _ => s.to_string(),
    };
    semver::Version::parse(&padded)
}

fn parse(which: &str, s: &str) -> Result<semver::Version, String> {
    parse_lenient(s).map_err(|e| format!("The {which} value `{s}` is not a valid version: {e}"))
}

impl SemanticEquality for Version {
    fn semantic_equals(&self, path: &Path, proposed: &Value, prior: &Value) -> (bool, Diagnostics) {
        compare_strings(VERSION, path, proposed, prior, |p, q| {
            let p = parse("proposed", p)?;
            let q = parse("prior", q)?;
            Ok(p.major == q.major && p.minor == q.minor && p.patch == q.patch && p.pre == q.pre)
        })
    }
}
