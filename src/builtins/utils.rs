// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::custom::CustomType;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::path::Path;
use crate::registry::TypeRegistry;
use crate::value::Value;

use std::rc::Rc;

use tracing::debug;

pub fn add(registry: &mut TypeRegistry, t: Rc<dyn CustomType>) {
    let name = t.name().to_string();
    match registry.try_register(&name, t) {
        Ok(true) => (),
        Ok(false) => debug!(custom_type = %name, "type already registered; keeping existing"),
        Err(e) => debug!(custom_type = %name, "{e}"),
    }
}

pub fn check_error(path: &Path, detail: impl Into<String>) -> Diagnostic {
    Diagnostic::error("Semantic Equality Check Error", detail).with_path(path.clone())
}

pub fn ensure_string<'a>(type_name: &str, path: &Path, v: &'a Value) -> Result<&'a str, Diagnostic> {
    v.as_str().map_err(|_| {
        check_error(
            path,
            format!(
                "An unexpected value type was received while performing semantic equality checks. \
                 Please report this to the provider developers.\n\n\
                 Expected Value Type: {type_name}[string]\n\
                 Got Value Type: {}",
                v.ty()
            ),
        )
    })
}

pub fn ensure_elements<'a>(
    type_name: &str,
    path: &Path,
    v: &'a Value,
) -> Result<&'a [Value], Diagnostic> {
    v.elements().ok_or_else(|| {
        check_error(
            path,
            format!(
                "An unexpected value type was received while performing semantic equality checks. \
                 Please report this to the provider developers.\n\n\
                 Expected Value Type: {type_name}[list]\n\
                 Got Value Type: {}",
                v.ty()
            ),
        )
    })
}

/// Run a string comparison for a string-based custom type.
///
/// `compare` returns `Err(detail)` when either string cannot be interpreted.
pub fn compare_strings<F>(
    type_name: &str,
    path: &Path,
    proposed: &Value,
    prior: &Value,
    compare: F,
) -> (bool, Diagnostics)
where
    F: Fn(&str, &str) -> Result<bool, String>,
{
    let strings = ensure_string(type_name, path, proposed)
        .and_then(|p| Ok((p, ensure_string(type_name, path, prior)?)));
    let (proposed, prior) = match strings {
        Ok(s) => s,
        Err(d) => return (false, Diagnostics::from(d)),
    };

    match compare(proposed, prior) {
        Ok(equal) => (equal, Diagnostics::new()),
        Err(detail) => (false, Diagnostics::from(check_error(path, detail))),
    }
}
