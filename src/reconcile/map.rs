// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::path::Path;
use crate::reconciler::{Reconciled, Reconciler};
use crate::value::Value;

use core::ops::ControlFlow;
use std::collections::BTreeMap;
use std::rc::Rc;

impl Reconciler {
    pub(crate) fn reconcile_map(&self, path: &Path, prior: &Value, proposed: &Value) -> Reconciled {
        let diagnostics = match self.check_whole(path, prior, proposed) {
            ControlFlow::Break(result) => return result,
            ControlFlow::Continue(diagnostics) => diagnostics,
        };

        // See reconcile_list: elements are checked unless the map type selected the prior.
        let mut result = self.reconcile_entries(
            path,
            prior.entries(),
            proposed.entries(),
            proposed,
            |key| path.at_map_key(key.clone()),
        );
        let mut all = diagnostics;
        all.append(result.diagnostics);
        result.diagnostics = all;
        result
    }

    /// Reconcile map entries or object attributes pairwise by key.
    ///
    /// Keys only in the proposed value pass through. Keys only in the prior
    /// value are dropped.
    pub(crate) fn reconcile_entries<F>(
        &self,
        path: &Path,
        prior_entries: Option<&BTreeMap<Rc<str>, Value>>,
        proposed_entries: Option<&BTreeMap<Rc<str>, Value>>,
        proposed: &Value,
        entry_path: F,
    ) -> Reconciled
    where
        F: Fn(&Rc<str>) -> Path,
    {
        let mut result = Reconciled::unchanged(proposed);
        let (Some(prior_entries), Some(proposed_entries)) = (prior_entries, proposed_entries)
        else {
            return result;
        };

        let mut entries = BTreeMap::new();
        let mut changed = false;
        for (key, proposed_entry) in proposed_entries.iter() {
            let Some(prior_entry) = prior_entries.get(key) else {
                entries.insert(key.clone(), proposed_entry.clone());
                continue;
            };

            let entry = self.reconcile_at(&entry_path(key), prior_entry, proposed_entry);
            result.diagnostics.append(entry.diagnostics);
            if result.diagnostics.has_error() {
                return result;
            }

            if entry.value != *proposed_entry {
                changed = true;
            }
            entries.insert(key.clone(), entry.value);
        }

        if !changed {
            return result;
        }

        let rebuilt = self.rebuild(path, proposed, Value::rebuild_keyed(proposed.ty(), entries));
        result.diagnostics.append(rebuilt.diagnostics);
        result.value = rebuilt.value;
        result
    }
}
