// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Custom types shipped with the crate.
//!
//! Each one captures a kind of difference remote APIs introduce on their
//! own (case changes, reformatted documents, expanded versions) that should
//! not show up as a change to the user's configuration.

pub mod collections;
pub mod json;
pub mod strings;
#[cfg(feature = "time")]
pub mod time;
pub mod utils;
#[cfg(feature = "semver")]
pub mod versions;

use crate::registry::TypeRegistry;

pub use collections::{unordered, Unordered, UNORDERED};
pub use json::{json, NormalizedJson, JSON};
pub use strings::{
    case_insensitive, location, major_minor_version, CaseInsensitive, Location,
    MajorMinorVersion, CASE_INSENSITIVE, LOCATION, MAJOR_MINOR_VERSION,
};
#[cfg(feature = "time")]
pub use time::{rfc3339, Rfc3339, RFC3339};
#[cfg(feature = "semver")]
pub use versions::{version, Version, VERSION};

/// Register every built-in type. Names already present in `registry` are left alone.
pub fn register_all(registry: &mut TypeRegistry) {
    strings::register(registry);
    json::register(registry);
    collections::register(registry);
    #[cfg(feature = "time")]
    time::register(registry);
    #[cfg(feature = "semver")]
    versions::register(registry);
}
