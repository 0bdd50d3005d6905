// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::path::Path;
use crate::reconciler::{Reconciled, Reconciler};
use crate::value::Value;

use core::ops::ControlFlow;

impl Reconciler {
    pub(crate) fn reconcile_list(&self, path: &Path, prior: &Value, proposed: &Value) -> Reconciled {
        let diagnostics = match self.check_whole(path, prior, proposed) {
            ControlFlow::Break(result) => return result,
            ControlFlow::Continue(diagnostics) => diagnostics,
        };

        // Elements are checked whenever the list type did not select the prior
        // value, even if it answered. A custom list type's semantic equality
        // is not relied upon to delegate to its elements.
        let mut result = self.reconcile_sequence(path, prior, proposed, |idx, _| {
            path.at_list_index(idx)
        });
        let mut all = diagnostics;
        all.append(result.diagnostics);
        result.diagnostics = all;
        result
    }

    pub(crate) fn reconcile_set(&self, path: &Path, prior: &Value, proposed: &Value) -> Reconciled {
        let diagnostics = match self.check_whole(path, prior, proposed) {
            ControlFlow::Break(result) => return result,
            ControlFlow::Continue(diagnostics) => diagnostics,
        };

        // Set elements are addressed by value.
        let mut result = self.reconcile_sequence(path, prior, proposed, |_, element| {
            path.at_set_value(element.clone())
        });
        let mut all = diagnostics;
        all.append(result.diagnostics);
        result.diagnostics = all;
        result
    }

    /// Reconcile list or set elements pairwise by position.
    fn reconcile_sequence<F>(
        &self,
        path: &Path,
        prior: &Value,
        proposed: &Value,
        element_path: F,
    ) -> Reconciled
    where
        F: Fn(usize, &Value) -> Path,
    {
        let mut result = Reconciled::unchanged(proposed);
        let (Some(prior_elements), Some(proposed_elements)) =
            (prior.elements(), proposed.elements())
        else {
            return result;
        };

        let mut elements = Vec::with_capacity(proposed_elements.len());
        let mut changed = false;
        for (idx, proposed_element) in proposed_elements.iter().enumerate() {
            // Elements beyond the prior's length have nothing to compare with.
            let Some(prior_element) = prior_elements.get(idx) else {
                elements.push(proposed_element.clone());
                continue;
            };

            let element = self.reconcile_at(
                &element_path(idx, proposed_element),
                prior_element,
                proposed_element,
            );
            result.diagnostics.append(element.diagnostics);
            if result.diagnostics.has_error() {
                return result;
            }

            if element.value != *proposed_element {
                changed = true;
            }
            elements.push(element.value);
        }

        if !changed {
            return result;
        }

        let rebuilt = self.rebuild(
            path,
            proposed,
            Value::rebuild_list_like(proposed.ty(), elements),
        );
        result.diagnostics.append(rebuilt.diagnostics);
        result.value = rebuilt.value;
        result
    }
}
