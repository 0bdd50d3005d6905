// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use semequal::*;

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{anyhow, Result};

const LOWER: &str = "lower";

/// Strings compared ignoring ASCII case.
#[derive(Debug)]
struct Lower;

impl CustomType for Lower {
    fn name(&self) -> &str {
        LOWER
    }

    fn semantic_equality(&self) -> Option<&dyn SemanticEquality> {
        Some(self)
    }
}

impl SemanticEquality for Lower {
    fn semantic_equals(&self, _path: &Path, proposed: &Value, prior: &Value) -> (bool, Diagnostics) {
        match (proposed.as_str(), prior.as_str()) {
            (Ok(a), Ok(b)) => (a.eq_ignore_ascii_case(b), Diagnostics::new()),
            _ => (
                false,
                Diagnostic::error("Unexpected Value", "expected strings").into(),
            ),
        }
    }
}

/// Answers every semantic equality check the same way.
#[derive(Debug)]
struct Fixed {
    name: &'static str,
    equal: bool,
    diagnostic: Option<Diagnostic>,
    calls: Cell<usize>,
}

impl Fixed {
    fn new(name: &'static str, equal: bool) -> Self {
        Self {
            name,
            equal,
            diagnostic: None,
            calls: Cell::new(0),
        }
    }

    fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostic = Some(diagnostic);
        self
    }
}

impl CustomType for Fixed {
    fn name(&self) -> &str {
        self.name
    }

    fn semantic_equality(&self) -> Option<&dyn SemanticEquality> {
        Some(self)
    }
}

impl SemanticEquality for Fixed {
    fn semantic_equals(&self, path: &Path, _proposed: &Value, _prior: &Value) -> (bool, Diagnostics) {
        self.calls.set(self.calls.get() + 1);
        let diagnostics = self
            .diagnostic
            .iter()
            .map(|d| d.clone().with_path(path.clone()))
            .collect();
        (self.equal, diagnostics)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Build {
    Missing,
    Retag,
    WrongType,
}

/// Collection type without semantic equality of its own.
#[derive(Debug)]
struct Container {
    name: &'static str,
    build: Build,
    builds: Cell<usize>,
}

impl Container {
    fn new(name: &'static str, build: Build) -> Self {
        Self {
            name,
            build,
            builds: Cell::new(0),
        }
    }
}

impl CustomType for Container {
    fn name(&self) -> &str {
        self.name
    }

    fn collection_builder(&self) -> Option<&dyn CollectionBuilder> {
        match self.build {
            Build::Missing => None,
            _ => Some(self),
        }
    }
}

impl CollectionBuilder for Container {
    fn value_from_collection(&self, _path: &Path, generic: Value) -> (Value, Diagnostics) {
        self.builds.set(self.builds.get() + 1);
        match self.build {
            Build::WrongType => (generic, Diagnostics::new()),
            _ => (generic.into_custom(self.name), Diagnostics::new()),
        }
    }
}

fn lower(s: &str) -> Value {
    Value::string(s).into_custom(LOWER)
}

fn lower_type() -> Type {
    Type::custom(LOWER, Type::String)
}

fn lower_list(items: &[&str]) -> Result<Value> {
    Ok(Value::list(
        lower_type(),
        items.iter().map(|s| lower(s)).collect(),
    )?)
}

fn reconciler() -> Result<Reconciler> {
    let mut reconciler = Reconciler::without_builtins();
    reconciler.register_type(Rc::new(Lower))?;
    Ok(reconciler)
}

fn error_paths(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics
        .errors()
        .filter_map(|d| d.path.as_ref().map(|p| p.to_string()))
        .collect()
}

#[test]
fn whole_collection_answer_is_final() -> Result<()> {
    let mut reconciler = reconciler()?;
    let all_same = Rc::new(Fixed::new("all_same", true));
    reconciler.register_type(all_same.clone())?;

    let prior = lower_list(&["A", "B"])?.into_custom("all_same");
    let proposed = lower_list(&["x", "y", "z"])?.into_custom("all_same");

    let result = reconciler.reconcile_value(&Path::root("items"), &prior, &proposed);
    assert_eq!(result.value, prior);
    assert!(result.diagnostics.is_empty());
    assert_eq!(all_same.calls.get(), 1);

    // No state is kept between calls.
    let again = reconciler.reconcile_value(&Path::root("items"), &prior, &proposed);
    assert_eq!(again, result);
    assert_eq!(all_same.calls.get(), 2);
    Ok(())
}

#[test]
fn changed_element_rebuilds_the_list() -> Result<()> {
    let mut reconciler = reconciler()?;
    let anything = Rc::new(Fixed::new("anything", true));
    reconciler.register_type(anything.clone())?;

    let element_type = Type::custom("anything", Type::String);
    let list = |items: &[&str]| -> Result<Value> {
        let elements = items
            .iter()
            .map(|s| Value::string(*s).into_custom("anything"))
            .collect();
        Ok(Value::list(element_type.clone(), elements)?)
    };

    let result = reconciler.reconcile_value(
        &Path::root("letters"),
        &list(&["a", "b"])?,
        &list(&["a", "c"])?,
    );
    assert_eq!(result.value, list(&["a", "b"])?);
    assert!(result.diagnostics.is_empty());
    assert_eq!(anything.calls.get(), 2);
    Ok(())
}

#[test]
fn elements_are_checked_after_whole_collection_declines() -> Result<()> {
    let mut reconciler = reconciler()?;
    reconciler.register_type(Rc::new(Container::new("bag", Build::Retag)))?;
    let never = Rc::new(Fixed::new("never", false));
    reconciler.register_type(never.clone())?;

    // A declining list type without a builder cannot be rebuilt.
    let prior = lower_list(&["A"])?.into_custom("never");
    let proposed = lower_list(&["a"])?.into_custom("never");
    let result = reconciler.reconcile_value(&Path::root("items"), &prior, &proposed);
    assert_eq!(never.calls.get(), 1);
    assert_eq!(result.value, proposed);
    assert_eq!(error_paths(&result.diagnostics), vec!["items".to_string()]);

    let prior = lower_list(&["A"])?.into_custom("bag");
    let proposed = lower_list(&["a"])?.into_custom("bag");
    let result = reconciler.reconcile_value(&Path::root("items"), &prior, &proposed);
    assert_eq!(result.value, prior);
    assert!(result.diagnostics.is_empty());
    Ok(())
}

#[test]
fn missing_builder_is_reported() -> Result<()> {
    let mut reconciler = reconciler()?;
    reconciler.register_type(Rc::new(Container::new("plain", Build::Missing)))?;

    let prior = lower_list(&["A", "B"])?.into_custom("plain");
    let proposed = lower_list(&["a", "c"])?.into_custom("plain");

    let result = reconciler.reconcile_value(&Path::root("items"), &prior, &proposed);
    assert_eq!(result.value, proposed);
    assert_eq!(result.diagnostics.errors_count(), 1);
    let error = result
        .diagnostics
        .errors()
        .next()
        .ok_or_else(|| anyhow!("no error"))?;
    assert_eq!(error.summary, "Value Conversion Error");
    assert_eq!(error.path, Some(Path::root("items")));
    Ok(())
}

#[test]
fn builder_must_return_the_custom_type() -> Result<()> {
    let mut reconciler = reconciler()?;
    let sloppy = Rc::new(Container::new("sloppy", Build::WrongType));
    reconciler.register_type(sloppy.clone())?;

    let prior = lower_list(&["A"])?.into_custom("sloppy");
    let proposed = lower_list(&["a"])?.into_custom("sloppy");

    let result = reconciler.reconcile_value(&Path::root("items"), &prior, &proposed);
    assert_eq!(sloppy.builds.get(), 1);
    assert_eq!(result.value, proposed);
    assert_eq!(error_paths(&result.diagnostics), vec!["items".to_string()]);
    Ok(())
}

#[test]
fn no_rebuild_when_nothing_changed() -> Result<()> {
    let mut reconciler = reconciler()?;
    let bag = Rc::new(Container::new("bag", Build::Retag));
    reconciler.register_type(bag.clone())?;

    let prior = lower_list(&["A"])?.into_custom("bag");
    let proposed = lower_list(&["b", "c"])?.into_custom("bag");

    let result = reconciler.reconcile_value(&Path::root("items"), &prior, &proposed);
    assert_eq!(result.value, proposed);
    assert!(result.diagnostics.is_empty());
    assert_eq!(bag.builds.get(), 0);
    Ok(())
}

#[test]
fn errored_check_keeps_proposed() -> Result<()> {
    let mut reconciler = reconciler()?;
    reconciler.register_type(Rc::new(
        Fixed::new("broken", true).with_diagnostic(Diagnostic::error("Broken", "always fails")),
    ))?;
    reconciler.register_type(Rc::new(
        Fixed::new("noisy", true).with_diagnostic(Diagnostic::warning("Noisy", "always warns")),
    ))?;

    let path = Path::root("value");
    let result = reconciler.reconcile_value(
        &path,
        &Value::string("a").into_custom("broken"),
        &Value::string("b").into_custom("broken"),
    );
    assert_eq!(result.value, Value::string("b").into_custom("broken"));
    assert_eq!(result.diagnostics.errors_count(), 1);

    // Warnings do not stop the prior value from being used.
    let result = reconciler.reconcile_value(
        &path,
        &Value::string("a").into_custom("noisy"),
        &Value::string("b").into_custom("noisy"),
    );
    assert_eq!(result.value, Value::string("a").into_custom("noisy"));
    assert_eq!(result.diagnostics.warnings_count(), 1);
    assert!(!result.has_error());
    Ok(())
}

#[test]
fn nested_error_keeps_its_path() -> Result<()> {
    let mut reconciler = reconciler()?;
    reconciler.register_type(Rc::new(
        Fixed::new("broken", true).with_diagnostic(Diagnostic::error("Broken", "always fails")),
    ))?;

    let broken = Type::custom("broken", Type::String);
    let ty = Type::object([(
        "outer",
        Type::object([("inner", Type::list(broken.clone()))]),
    )]);
    let prior = Value::from_json_str(&ty, r#"{"outer": {"inner": ["a", "b"]}}"#)?;
    let proposed = Value::from_json_str(&ty, r#"{"outer": {"inner": ["c", "d"]}}"#)?;

    let result = reconciler.reconcile_value(&Path::root("root"), &prior, &proposed);
    assert_eq!(result.value, proposed);
    // The first element error stops the walk.
    assert_eq!(
        error_paths(&result.diagnostics),
        vec!["root.outer.inner[0]".to_string()]
    );

    // Set elements are addressed by value.
    let ty = Type::set(broken);
    let prior = Value::from_json_str(&ty, r#"["a"]"#)?;
    let proposed = Value::from_json_str(&ty, r#"["b"]"#)?;
    let result = reconciler.reconcile_value(&Path::root("items"), &prior, &proposed);
    assert_eq!(
        error_paths(&result.diagnostics),
        vec![r#"items[Value("b")]"#.to_string()]
    );
    Ok(())
}

#[test]
fn state_paths_start_at_attributes() -> Result<()> {
    let reconciler = reconciler()?;
    let ty = Type::object([("name", lower_type()), ("count", Type::Int64)]);
    let prior = Value::from_json_str(&ty, r#"{"name": "Web", "count": 1}"#)?;
    let proposed = Value::from_json_str(&ty, r#"{"name": "web", "count": 2}"#)?;

    let result = reconciler.reconcile_state(&prior, &proposed);
    let want = Value::from_json_str(&ty, r#"{"name": "Web", "count": 2}"#)?;
    assert_eq!(result.value, want);

    let mismatched = Value::from_json_str(
        &Type::object([("name", Type::Bool), ("count", Type::Int64)]),
        r#"{"name": true, "count": 2}"#,
    )?;
    let result = reconciler.reconcile_state(&prior, &mismatched);
    assert_eq!(result.value, mismatched);
    assert_eq!(error_paths(&result.diagnostics), vec!["name".to_string()]);
    Ok(())
}

fn opaque(payload: Value) -> Value {
    Value::dynamic(payload).into_custom("opaque")
}

#[test]
fn dynamic_attribute_with_unknown_payload() -> Result<()> {
    let mut reconciler = reconciler()?;
    let always = Rc::new(Fixed::new("opaque", true));
    reconciler.register_type(always.clone())?;

    let attribute_types: AttributeTypes = [
        (Rc::<str>::from("name"), lower_type()),
        (Rc::<str>::from("payload"), Type::custom("opaque", Type::Dynamic)),
    ]
    .into_iter()
    .collect();
    let object = |name: &str, payload: Value| -> Result<Value> {
        let attributes: BTreeMap<Rc<str>, Value> = [
            (Rc::<str>::from("name"), lower(name)),
            (Rc::<str>::from("payload"), payload),
        ]
        .into_iter()
        .collect();
        Ok(Value::object(attribute_types.clone(), attributes)?)
    };

    let pending = opaque(Value::unknown(Type::String));
    assert!(pending.is_known());

    let prior = object("Foo", opaque(Value::string("x")))?;
    let proposed = object("foo", pending.clone())?;

    let result = reconciler.reconcile_value(&Path::root("resource"), &prior, &proposed);
    assert_eq!(result.value, object("Foo", pending)?);
    assert!(result.diagnostics.is_empty());
    assert_eq!(always.calls.get(), 0);
    Ok(())
}

#[test]
fn dynamic_payloads_must_both_be_known() -> Result<()> {
    let mut reconciler = reconciler()?;
    let always = Rc::new(Fixed::new("opaque", true));
    reconciler.register_type(always.clone())?;
    let path = Path::root("payload");

    let prior = opaque(Value::string("x"));
    let proposed = opaque(Value::unknown(Type::String));
    let result = reconciler.reconcile_value(&path, &prior, &proposed);
    assert_eq!(result.value, proposed);

    let prior = opaque(Value::null(Type::String));
    let proposed = opaque(Value::string("y"));
    let result = reconciler.reconcile_value(&path, &prior, &proposed);
    assert_eq!(result.value, proposed);
    assert_eq!(always.calls.get(), 0);

    let prior = opaque(Value::string("x"));
    let result = reconciler.reconcile_value(&path, &prior, &proposed);
    assert_eq!(result.value, prior);
    assert!(result.diagnostics.is_empty());
    assert_eq!(always.calls.get(), 1);
    Ok(())
}

#[test]
fn nan_elements_do_not_trigger_a_rebuild() -> Result<()> {
    let mut reconciler = reconciler()?;
    reconciler.register_type(Rc::new(Container::new("plain", Build::Missing)))?;

    let samples = Value::list(
        Type::Float64,
        vec![Value::float64(f64::NAN), Value::float64(1.5)],
    )?
    .into_custom("plain");

    let result = reconciler.reconcile_value(&Path::root("samples"), &samples, &samples);
    assert_eq!(result.value, samples);
    assert!(result.diagnostics.is_empty());
    Ok(())
}

#[test]
fn types_are_registered_once() -> Result<()> {
    let mut reconciler = reconciler()?;
    assert!(matches!(
        reconciler.register_type(Rc::new(Lower)),
        Err(RegistryError::AlreadyExists { .. })
    ));
    assert_eq!(reconciler.types().list_names(), vec![Rc::<str>::from(LOWER)]);
    Ok(())
}
