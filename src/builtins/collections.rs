// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins::utils::{add, ensure_elements};
use crate::custom::{CollectionBuilder, CustomType, SemanticEquality};
use crate::diagnostics::Diagnostics;
use crate::path::Path;
use crate::registry::TypeRegistry;
use crate::types::Type;
use crate::value::Value;

use std::rc::Rc;

pub const UNORDERED: &str = "unordered";

pub fn register(registry: &mut TypeRegistry) {
    add(registry, Rc::new(Unordered));
}

pub fn unordered(element_type: Type) -> Type {
    Type::custom(UNORDERED, Type::list(element_type))
}

/// Lists whose order the remote API does not preserve.
///
/// Two lists are equal when they hold the same elements the same number of times.
#[derive(Debug, Clone, Copy)]
pub struct Unordered;

impl CustomType for Unordered {
    fn name(&self) -> &str {
        UNORDERED
    }

    fn semantic_equality(&self) -> Option<&dyn SemanticEquality> {
        Some(self)
    }

    fn collection_builder(&self) -> Option<&dyn CollectionBuilder> {
        Some(self)
    }
}

fn count(elements: &[Value], e: &Value) -> usize {
    elements.iter().filter(|x| *x == e).count()
}

impl SemanticEquality for Unordered {
    fn semantic_equals(&self, path: &Path, proposed: &Value, prior: &Value) -> (bool, Diagnostics) {
        let elements = ensure_elements(UNORDERED, path, proposed)
            .and_then(|p| Ok((p, ensure_elements(UNORDERED, path, prior)?)));
        let (proposed, prior) = match elements {
            Ok(e) => e,
            Err(d) => return (false, Diagnostics::from(d)),
        };

        let equal = proposed.len() == prior.len()
            && proposed
                .iter()
                .all(|e| count(proposed, e) == count(prior, e));
        (equal, Diagnostics::new())
    }
}

impl CollectionBuilder for Unordered {
    fn value_from_collection(&self, _path: &Path, generic: Value) -> (Value, Diagnostics) {
        (generic.into_custom(UNORDERED), Diagnostics::new())
    }
}
