// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::path::Path;
use crate::reconciler::{Reconciled, Reconciler};
use crate::value::Value;

impl Reconciler {
    /// Bool, float64, int64, number and string values.
    pub(crate) fn reconcile_scalar(&self, path: &Path, prior: &Value, proposed: &Value) -> Reconciled {
        let mut result = Reconciled::unchanged(proposed);

        let Some((use_prior, diagnostics)) = self.ask_semantic_equality(path, prior, proposed)
        else {
            return result;
        };

        result.diagnostics.append(diagnostics);
        // A failed check never selects the prior value.
        if result.diagnostics.has_error() || !use_prior {
            return result;
        }

        result.value = prior.clone();
        result
    }

    pub(crate) fn reconcile_dynamic(&self, path: &Path, prior: &Value, proposed: &Value) -> Reconciled {
        // Known dynamic values can still wrap a null or unknown payload.
        if prior.is_underlying_null_or_unknown() || proposed.is_underlying_null_or_unknown() {
            return Reconciled::unchanged(proposed);
        }
        self.reconcile_scalar(path, prior, proposed)
    }
}
