// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Capabilities user-defined types can provide to the reconciler.
//!
//! A value refers to its custom type by name (see [`Type::Custom`](crate::Type::Custom)).
//! The implementation registered under that name decides which optional
//! capabilities it supports by returning them from the query methods of
//! [`CustomType`].

use crate::diagnostics::Diagnostics;
use crate::path::Path;
use crate::value::Value;

use core::fmt;

/// A user-defined type.
pub trait CustomType: fmt::Debug {
    /// Name values of this type carry in their [`Type`](crate::Type).
    fn name(&self) -> &str;

    fn semantic_equality(&self) -> Option<&dyn SemanticEquality> {
        None
    }

    fn collection_builder(&self) -> Option<&dyn CollectionBuilder> {
        None
    }
}

/// Decides whether a prior value should be kept in place of a proposed one.
pub trait SemanticEquality {
    /// Returns `true` when `prior` is semantically equal to `proposed` and should be kept.
    ///
    /// Any error diagnostic returned makes the reconciler discard the answer.
    fn semantic_equals(&self, path: &Path, proposed: &Value, prior: &Value) -> (bool, Diagnostics);
}

/// Converts a rebuilt base collection or object back into the custom type.
pub trait CollectionBuilder {
    /// `generic` is a known list, set, map or object typed as the custom type's base.
    /// The returned value must carry the custom type.
    fn value_from_collection(&self, path: &Path, generic: Value) -> (Value, Diagnostics);
}

/// Builder for custom types whose values are their base values with the custom tag.
#[derive(Debug, Clone)]
pub struct Retag {
    name: String,
}

impl Retag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl CollectionBuilder for Retag {
    fn value_from_collection(&self, _path: &Path, generic: Value) -> (Value, Diagnostics) {
        (generic.into_custom(self.name.as_str()), Diagnostics::new())
    }
}
