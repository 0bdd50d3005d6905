// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use semequal::*;

use anyhow::{bail, Result};
use serde::Deserialize;
use test_generator::test_resources;

mod custom;

const UNKNOWN: &str = "#unknown";

#[derive(Deserialize, PartialEq, Debug)]
#[serde(deny_unknown_fields)]
struct WantDiagnostic {
    severity: Severity,
    summary: String,
    path: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TestCase {
    note: String,
    #[serde(rename = "type")]
    ty: Type,
    prior_type: Option<Type>,
    // Root attribute the values live under.
    attribute: Option<String>,
    config: Option<Config>,
    #[serde(default)]
    prior: serde_yaml::Value,
    #[serde(default)]
    proposed: serde_yaml::Value,
    #[serde(default)]
    want: serde_yaml::Value,
    #[serde(default)]
    want_diagnostics: Vec<WantDiagnostic>,
    skip: Option<bool>,
}

#[derive(Deserialize, Debug)]
struct YamlTest {
    cases: Vec<TestCase>,
}

fn decode(ty: &Type, yaml: &serde_yaml::Value) -> Result<Value> {
    Value::from_json_with_unknown(ty, &serde_json::to_value(yaml)?, UNKNOWN)
}

fn run_case(case: &TestCase) -> Result<()> {
    let prior_type = case.prior_type.as_ref().unwrap_or(&case.ty);
    let prior = decode(prior_type, &case.prior)?;
    let proposed = decode(&case.ty, &case.proposed)?;
    let want = decode(&case.ty, &case.want)?;

    let mut reconciler = Reconciler::new();
    if let Some(config) = &case.config {
        reconciler.set_config(config.clone());
    }

    let request = ReconcileRequest {
        path: Path::root(case.attribute.as_deref().unwrap_or("attr")),
        prior,
        proposed,
    };
    let result = reconciler.reconcile(&request);

    if result.value != want {
        bail!(
            "value mismatch\n  want: {want}\n   got: {}\ndiagnostics:\n{}",
            result.value,
            result.diagnostics
        );
    }

    let actual: Vec<WantDiagnostic> = result
        .diagnostics
        .iter()
        .map(|d| WantDiagnostic {
            severity: d.severity,
            summary: d.summary.clone(),
            path: d.path.as_ref().map(|p| p.to_string()),
        })
        .collect();
    if actual != case.want_diagnostics {
        bail!(
            "diagnostics mismatch\n  want: {:?}\n   got: {actual:?}\n{}",
            case.want_diagnostics,
            result.diagnostics
        );
    }

    // Reconciliation keeps no state: a second run gives the same answer.
    if reconciler.reconcile(&request) != result {
        bail!("second run differs from the first");
    }

    Ok(())
}

fn yaml_test_impl(file: &str) -> Result<()> {
    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    std::eprintln!("running {file}");

    for case in &test.cases {
        std::eprint!("case {} ", case.note);
        if case.skip == Some(true) {
            std::eprintln!("skipped");
            continue;
        }

        if let Err(e) = run_case(case) {
            bail!("case `{}` failed: {e}", case.note);
        }
        std::eprintln!("passed");
    }

    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    #[cfg(not(feature = "builtins"))]
    return Ok(());

    #[cfg(not(feature = "time"))]
    if file.contains("rfc3339") {
        return Ok(());
    }
    #[cfg(not(feature = "semver"))]
    if file.contains("semver") {
        return Ok(());
    }

    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{e}");
        }
    }
}

#[test_resources("tests/reconcile/cases/**/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}
