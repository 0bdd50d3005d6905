// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Dispatch of reconciliation requests to the per-variant reconcilers.
//!
//! Every routine here returns its own [`Reconciled`]; callers concatenate
//! child diagnostics explicitly.

use crate::config::MismatchPolicy;
use crate::custom::SemanticEquality;
use crate::diagnostics::Diagnostics;
use crate::path::Path;
use crate::reconciler::{Reconciled, Reconciler};
use crate::types::Kind;
use crate::value::{Value, ValueError};

use core::ops::ControlFlow;

use tracing::{debug, trace};

mod list;
mod map;
mod object;
mod scalar;

impl Reconciler {
    pub(crate) fn reconcile_at(&self, path: &Path, prior: &Value, proposed: &Value) -> Reconciled {
        // An unset or undetermined prior can never be preferred.
        if !prior.is_known() {
            return Reconciled::unchanged(proposed);
        }
        // Never resurrect a prior value over an explicit null or a pending computation.
        if !proposed.is_known() {
            return Reconciled::unchanged(proposed);
        }
        if prior.kind() != proposed.kind() {
            return self.variant_mismatch(path, prior, proposed);
        }

        let resolved = match proposed.kind() {
            Kind::Bool | Kind::Float64 | Kind::Int64 | Kind::Number | Kind::String => {
                self.reconcile_scalar(path, prior, proposed)
            }
            Kind::Dynamic => self.reconcile_dynamic(path, prior, proposed),
            Kind::List => self.reconcile_list(path, prior, proposed),
            Kind::Set => self.reconcile_set(path, prior, proposed),
            Kind::Map => self.reconcile_map(path, prior, proposed),
            Kind::Object => self.reconcile_object(path, prior, proposed),
        };

        if resolved.value == *prior {
            trace!(path = %path, "resolved value equals prior value");
        }
        resolved
    }

    fn variant_mismatch(&self, path: &Path, prior: &Value, proposed: &Value) -> Reconciled {
        let mut result = Reconciled::unchanged(proposed);
        debug!(
            path = %path,
            prior_type = %prior.ty(),
            proposed_type = %proposed.ty(),
            "prior and proposed values have different variants"
        );

        let summary = "Value Type Mismatch";
        let detail = format!(
            "The prior value has type {} but the proposed value has type {}. \
             Semantic equality was not checked and the proposed value was kept.",
            prior.ty(),
            proposed.ty()
        );
        match self.config().variant_mismatch {
            MismatchPolicy::Ignore => (),
            MismatchPolicy::Warn => result
                .diagnostics
                .add_attribute_warning(path, summary, detail),
            MismatchPolicy::Error => result.diagnostics.add_attribute_error(path, summary, detail),
        }
        result
    }

    fn semantic_equality_of(&self, value: &Value) -> Option<&dyn SemanticEquality> {
        let name = value.custom_name()?;
        self.types().get(name)?.semantic_equality()
    }

    /// Ask the proposed value's type whether the prior value should be kept.
    ///
    /// `None` when either value's type does not provide semantic equality.
    pub(crate) fn ask_semantic_equality(
        &self,
        path: &Path,
        prior: &Value,
        proposed: &Value,
    ) -> Option<(bool, Diagnostics)> {
        let equality = self.semantic_equality_of(proposed)?;
        self.semantic_equality_of(prior)?;

        trace!(
            path = %path,
            custom_type = proposed.custom_name().unwrap_or_default(),
            "calling semantic equality"
        );
        let (use_prior, diagnostics) = equality.semantic_equals(path, proposed, prior);
        trace!(path = %path, use_prior, "called semantic equality");

        Some((use_prior, diagnostics))
    }

    /// Whole-collection check shared by lists, sets, maps and objects.
    ///
    /// Breaks with the final result when the collection's own type settles the
    /// outcome (use prior, or an error). Otherwise continues with the
    /// diagnostics gathered so far.
    pub(crate) fn check_whole(
        &self,
        path: &Path,
        prior: &Value,
        proposed: &Value,
    ) -> ControlFlow<Reconciled, Diagnostics> {
        let Some((use_prior, diagnostics)) = self.ask_semantic_equality(path, prior, proposed)
        else {
            return ControlFlow::Continue(Diagnostics::new());
        };

        if diagnostics.has_error() {
            return ControlFlow::Break(Reconciled {
                value: proposed.clone(),
                diagnostics,
            });
        }
        if use_prior {
            return ControlFlow::Break(Reconciled {
                value: prior.clone(),
                diagnostics,
            });
        }
        ControlFlow::Continue(diagnostics)
    }

    /// Convert a collection rebuilt from changed elements into the proposed value's type.
    ///
    /// On any failure the result keeps the proposed value.
    pub(crate) fn rebuild(
        &self,
        path: &Path,
        proposed: &Value,
        generic: Result<Value, ValueError>,
    ) -> Reconciled {
        let mut result = Reconciled::unchanged(proposed);

        let generic = match generic {
            Ok(v) => v,
            Err(e) => {
                result.diagnostics.add_attribute_error(
                    path,
                    "Value Conversion Error",
                    format!(
                        "An unexpected error was encountered while rebuilding the value \
                         after semantic equality of its elements: {e}"
                    ),
                );
                return result;
            }
        };

        let Some(name) = proposed.custom_name() else {
            trace!(path = %path, "rebuilt value after element changes");
            result.value = generic;
            return result;
        };

        let Some(builder) = self
            .types()
            .get(name)
            .and_then(|t| t.collection_builder())
        else {
            debug!(path = %path, custom_type = name, "custom type cannot be built from a collection");
            result.diagnostics.add_attribute_error(
                path,
                "Value Conversion Error",
                format!(
                    "An unexpected error was encountered trying to convert the value. \
                     This is always an error in the provider. Please report the following \
                     to the provider developer:\n\n\
                     Expected type {name} to support building values from {}.",
                    proposed.kind()
                ),
            );
            return result;
        };

        let (value, diagnostics) = builder.value_from_collection(path, generic);
        result.diagnostics.append(diagnostics);
        if result.diagnostics.has_error() {
            return result;
        }
        if value.ty() != proposed.ty() {
            debug!(path = %path, custom_type = name, "collection builder returned the wrong type");
            result.diagnostics.add_attribute_error(
                path,
                "Value Conversion Error",
                format!(
                    "An unexpected error was encountered trying to convert the value. \
                     This is always an error in the provider. Please report the following \
                     to the provider developer:\n\n\
                     Expected framework type from provider logic: {}\n\
                     Received framework type from provider logic: {}",
                    proposed.ty(),
                    value.ty()
                ),
            );
            return result;
        }

        trace!(path = %path, custom_type = name, "rebuilt value after element changes");
        result.value = value;
        result
    }
}
