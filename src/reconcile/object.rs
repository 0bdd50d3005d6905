// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::path::Path;
use crate::reconciler::{Reconciled, Reconciler};
use crate::value::Value;

use core::ops::ControlFlow;

impl Reconciler {
    pub(crate) fn reconcile_object(&self, path: &Path, prior: &Value, proposed: &Value) -> Reconciled {
        let diagnostics = match self.check_whole(path, prior, proposed) {
            ControlFlow::Break(result) => return result,
            ControlFlow::Continue(diagnostics) => diagnostics,
        };

        let mut result = self.reconcile_entries(
            path,
            prior.attributes(),
            proposed.attributes(),
            proposed,
            |name| path.at_name(name.clone()),
        );
        let mut all = diagnostics;
        all.append(result.diagnostics);
        result.diagnostics = all;
        result
    }
}
