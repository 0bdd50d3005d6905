// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::number::{float_eq, Number};
use crate::types::{AttributeTypes, Kind, Type};

use core::fmt;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{anyhow, bail, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Payload of a [`Value`].
///
/// A value is exactly one of null, unknown or a known payload of its variant.
/// Collections are shared and never mutated in place.
#[derive(Debug, Clone)]
pub enum Data {
    Null,
    Unknown,
    Bool(bool),
    Float64(f64),
    Int64(i64),
    Number(Number),
    String(Rc<str>),

    // The underlying value of a known dynamic value. It carries its own
    // concrete type and may itself be null or unknown.
    Dynamic(Rc<Value>),

    List(Rc<Vec<Value>>),
    // Elements are unique. Order is preserved for positional alignment but
    // does not take part in equality.
    Set(Rc<Vec<Value>>),
    Map(Rc<BTreeMap<Rc<str>, Value>>),
    Object(Rc<BTreeMap<Rc<str>, Value>>),
}

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Data::Null, Data::Null) | (Data::Unknown, Data::Unknown) => true,
            (Data::Bool(a), Data::Bool(b)) => a == b,
            (Data::Float64(a), Data::Float64(b)) => float_eq(*a, *b),
            (Data::Int64(a), Data::Int64(b)) => a == b,
            (Data::Number(a), Data::Number(b)) => a == b,
            (Data::String(a), Data::String(b)) => a == b,
            (Data::Dynamic(a), Data::Dynamic(b)) => a == b,
            (Data::List(a), Data::List(b)) => a == b,
            (Data::Set(a), Data::Set(b)) => {
                a.len() == b.len() && a.iter().all(|e| b.iter().any(|o| o == e))
            }
            (Data::Map(a), Data::Map(b)) | (Data::Object(a), Data::Object(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("{kind} element {key} has type {actual}, expected {expected}")]
    ElementType {
        kind: Kind,
        key: String,
        expected: String,
        actual: String,
    },
    #[error("attribute `{name}` has type {actual}, expected {expected}")]
    AttributeType {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("missing attribute `{0}`")]
    MissingAttribute(String),
    #[error("unexpected attribute `{0}`")]
    UnexpectedAttribute(String),
    #[error("duplicate set element {0}")]
    DuplicateSetElement(String),
    #[error("{actual} is not a {expected} type")]
    KindMismatch { expected: Kind, actual: String },
}

/// A typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    ty: Type,
    data: Data,
}

impl Value {
    pub fn null(ty: Type) -> Value {
        Value {
            ty,
            data: Data::Null,
        }
    }

    pub fn unknown(ty: Type) -> Value {
        Value {
            ty,
            data: Data::Unknown,
        }
    }

    pub fn bool(b: bool) -> Value {
        Value {
            ty: Type::Bool,
            data: Data::Bool(b),
        }
    }

    pub fn float64(f: f64) -> Value {
        Value {
            ty: Type::Float64,
            data: Data::Float64(f),
        }
    }

    pub fn int64(i: i64) -> Value {
        Value {
            ty: Type::Int64,
            data: Data::Int64(i),
        }
    }

    pub fn number(n: impl Into<Number>) -> Value {
        Value {
            ty: Type::Number,
            data: Data::Number(n.into()),
        }
    }

    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value {
            ty: Type::String,
            data: Data::String(s.into()),
        }
    }

    /// Wrap `underlying` in a known dynamic value.
    pub fn dynamic(underlying: Value) -> Value {
        if underlying.ty == Type::Dynamic {
            return underlying;
        }
        Value {
            ty: Type::Dynamic,
            data: Data::Dynamic(Rc::new(underlying)),
        }
    }

    pub fn list(element_type: Type, elements: Vec<Value>) -> Result<Value, ValueError> {
        for (idx, e) in elements.iter().enumerate() {
            check_element(Kind::List, &element_type, idx.to_string(), e)?;
        }
        Ok(Value {
            ty: Type::list(element_type),
            data: Data::List(Rc::new(elements)),
        })
    }

    pub fn set(element_type: Type, elements: Vec<Value>) -> Result<Value, ValueError> {
        for (idx, e) in elements.iter().enumerate() {
            check_element(Kind::Set, &element_type, idx.to_string(), e)?;
            if elements[..idx].contains(e) {
                return Err(ValueError::DuplicateSetElement(e.to_string()));
            }
        }
        Ok(Value {
            ty: Type::set(element_type),
            data: Data::Set(Rc::new(elements)),
        })
    }

    pub fn map(
        element_type: Type,
        entries: BTreeMap<Rc<str>, Value>,
    ) -> Result<Value, ValueError> {
        for (key, e) in entries.iter() {
            check_element(Kind::Map, &element_type, format!("{key:?}"), e)?;
        }
        Ok(Value {
            ty: Type::map(element_type),
            data: Data::Map(Rc::new(entries)),
        })
    }

    pub fn object(
        attribute_types: AttributeTypes,
        attributes: BTreeMap<Rc<str>, Value>,
    ) -> Result<Value, ValueError> {
        for name in attributes.keys() {
            if !attribute_types.contains_key(name) {
                return Err(ValueError::UnexpectedAttribute(name.to_string()));
            }
        }
        for (name, expected) in attribute_types.iter() {
            match attributes.get(name) {
                Some(v) if &v.ty == expected => (),
                Some(v) => {
                    return Err(ValueError::AttributeType {
                        name: name.to_string(),
                        expected: expected.to_string(),
                        actual: v.ty.to_string(),
                    })
                }
                None => return Err(ValueError::MissingAttribute(name.to_string())),
            }
        }
        Ok(Value {
            ty: Type::Object(Rc::new(attribute_types)),
            data: Data::Object(Rc::new(attributes)),
        })
    }

    /// Retag the value as an instance of the custom type `name`.
    pub fn into_custom(self, name: impl Into<Rc<str>>) -> Value {
        Value {
            ty: Type::custom(name, self.ty),
            data: self.data,
        }
    }

    /// The same value typed as its base type.
    pub fn to_base(&self) -> Value {
        Value {
            ty: self.ty.base().clone(),
            data: self.data.clone(),
        }
    }

    /// Rebuild a collection or object of `ty`'s base kind from the given payload.
    ///
    /// Used after element-wise changes; the result is never custom typed.
    pub(crate) fn rebuild_list_like(ty: &Type, elements: Vec<Value>) -> Result<Value, ValueError> {
        match (ty.base(), ty.element_type()) {
            (Type::List(_), Some(e)) => Value::list(e.clone(), elements),
            (Type::Set(_), Some(e)) => Value::set(e.clone(), elements),
            _ => Err(ValueError::KindMismatch {
                expected: Kind::List,
                actual: ty.to_string(),
            }),
        }
    }

    pub(crate) fn rebuild_keyed(
        ty: &Type,
        entries: BTreeMap<Rc<str>, Value>,
    ) -> Result<Value, ValueError> {
        match ty.base() {
            Type::Map(e) => Value::map(e.as_ref().clone(), entries),
            Type::Object(attrs) => Value::object(attrs.as_ref().clone(), entries),
            _ => Err(ValueError::KindMismatch {
                expected: Kind::Map,
                actual: ty.to_string(),
            }),
        }
    }
}

fn check_element(kind: Kind, expected: &Type, key: String, e: &Value) -> Result<(), ValueError> {
    if &e.ty == expected {
        return Ok(());
    }
    Err(ValueError::ElementType {
        kind,
        key,
        expected: expected.to_string(),
        actual: e.ty.to_string(),
    })
}

impl Value {
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn kind(&self) -> Kind {
        self.ty.kind()
    }

    pub fn custom_name(&self) -> Option<&str> {
        self.ty.custom_name()
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn is_null(&self) -> bool {
        matches!(self.data, Data::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.data, Data::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !self.is_null() && !self.is_unknown()
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self.data {
            Data::Bool(b) => Ok(b),
            _ => Err(anyhow!("not a bool")),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self.data {
            Data::Float64(f) => Ok(f),
            _ => Err(anyhow!("not a float64")),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        match self.data {
            Data::Int64(i) => Ok(i),
            _ => Err(anyhow!("not an int64")),
        }
    }

    pub fn as_number(&self) -> Result<&Number> {
        match &self.data {
            Data::Number(n) => Ok(n),
            _ => Err(anyhow!("not a number")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match &self.data {
            Data::String(s) => Ok(s),
            _ => Err(anyhow!("not a string")),
        }
    }

    /// Elements of a known list or set.
    pub fn elements(&self) -> Option<&[Value]> {
        match &self.data {
            Data::List(e) | Data::Set(e) => Some(e.as_slice()),
            _ => None,
        }
    }

    /// Entries of a known map.
    pub fn entries(&self) -> Option<&BTreeMap<Rc<str>, Value>> {
        match &self.data {
            Data::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Attributes of a known object.
    pub fn attributes(&self) -> Option<&BTreeMap<Rc<str>, Value>> {
        match &self.data {
            Data::Object(m) => Some(m),
            _ => None,
        }
    }

    /// The underlying value of a known dynamic value.
    pub fn underlying(&self) -> Option<&Value> {
        match &self.data {
            Data::Dynamic(v) => Some(v),
            _ => None,
        }
    }

    /// A dynamic value can be known while its payload is still null or unknown.
    pub fn is_underlying_null_or_unknown(&self) -> bool {
        match &self.data {
            Data::Dynamic(v) => !v.is_known(),
            _ => !self.is_known(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Data::Null => f.write_str("<null>"),
            Data::Unknown => f.write_str("<unknown>"),
            Data::Bool(b) => write!(f, "{b}"),
            Data::Float64(v) => write!(f, "{v}"),
            Data::Int64(i) => write!(f, "{i}"),
            Data::Number(n) => write!(f, "{n}"),
            Data::String(s) => write!(f, "{s:?}"),
            Data::Dynamic(v) => write!(f, "{v}"),
            Data::List(elements) | Data::Set(elements) => {
                f.write_str("[")?;
                for (idx, e) in elements.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{e}")?;
                }
                f.write_str("]")
            }
            Data::Map(entries) | Data::Object(entries) => {
                f.write_str("{")?;
                for (idx, (k, v)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{k:?}:{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.data {
            Data::Null => serializer.serialize_none(),
            // display unknown as a special string
            Data::Unknown => serializer.serialize_str("<unknown>"),
            Data::Bool(b) => serializer.serialize_bool(*b),
            Data::Float64(v) => serializer.serialize_f64(*v),
            Data::Int64(i) => serializer.serialize_i64(*i),
            Data::Number(n) => n.serialize(serializer),
            Data::String(s) => serializer.serialize_str(s),
            Data::Dynamic(v) => v.serialize(serializer),
            Data::List(elements) | Data::Set(elements) => elements.serialize(serializer),
            Data::Map(entries) | Data::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries.iter() {
                    map.serialize_entry(k.as_ref(), v)?;
                }
                map.end()
            }
        }
    }
}

impl Value {
    /// Decode `json` as a value of type `ty`.
    pub fn from_json(ty: &Type, json: &serde_json::Value) -> Result<Value> {
        decode(ty, json, None)
    }

    /// Like [`Value::from_json`], decoding any string equal to `marker` as unknown.
    pub fn from_json_with_unknown(
        ty: &Type,
        json: &serde_json::Value,
        marker: &str,
    ) -> Result<Value> {
        decode(ty, json, Some(marker))
    }

    pub fn from_json_str(ty: &Type, json: &str) -> Result<Value> {
        Self::from_json(ty, &serde_json::from_str(json)?)
    }

    pub fn to_json_str(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn decode(ty: &Type, json: &serde_json::Value, unknown: Option<&str>) -> Result<Value> {
    use serde_json::Value as Json;

    if let (Json::String(s), Some(marker)) = (json, unknown) {
        if s == marker {
            return Ok(Value::unknown(ty.clone()));
        }
    }
    if json.is_null() {
        return Ok(Value::null(ty.clone()));
    }

    let value = match (ty.base(), json) {
        (Type::Bool, Json::Bool(b)) => Value::bool(*b),
        (Type::Float64, Json::Number(n)) => match n.as_f64() {
            Some(f) => Value::float64(f),
            None => bail!("{n} is not a float64"),
        },
        (Type::Int64, Json::Number(n)) => match n.as_i64() {
            Some(i) => Value::int64(i),
            None => bail!("{n} is not an int64"),
        },
        (Type::Number, Json::Number(n)) => Value::number(Number::from_json(n)?),
        (Type::String, Json::String(s)) => Value::string(s.as_str()),
        (Type::Dynamic, _) => Value::dynamic(decode(&infer_type(json), json, unknown)?),
        (Type::List(e), Json::Array(items)) => {
            let elements = decode_elements(e, items, unknown)?;
            Value::list(e.as_ref().clone(), elements)?
        }
        (Type::Set(e), Json::Array(items)) => {
            let elements = decode_elements(e, items, unknown)?;
            Value::set(e.as_ref().clone(), elements)?
        }
        (Type::Map(e), Json::Object(fields)) => {
            let mut entries = BTreeMap::new();
            for (k, v) in fields {
                entries.insert(Rc::from(k.as_str()), decode(e, v, unknown)?);
            }
            Value::map(e.as_ref().clone(), entries)?
        }
        (Type::Object(attrs), Json::Object(fields)) => {
            let mut attributes = BTreeMap::new();
            for (name, t) in attrs.iter() {
                // Absent attributes decode as null.
                let v = match fields.get(name.as_ref()) {
                    Some(v) => decode(t, v, unknown)?,
                    None => Value::null(t.clone()),
                };
                attributes.insert(name.clone(), v);
            }
            if let Some(extra) = fields.keys().find(|k| !attrs.contains_key(k.as_str())) {
                bail!("unexpected attribute `{extra}` for {ty}");
            }
            Value::object(attrs.as_ref().clone(), attributes)?
        }
        _ => bail!("cannot decode {json} as {ty}"),
    };

    Ok(match ty.custom_name() {
        Some(name) => value.into_custom(name),
        None => value,
    })
}

fn decode_elements(
    element_type: &Type,
    items: &[serde_json::Value],
    unknown: Option<&str>,
) -> Result<Vec<Value>> {
    items
        .iter()
        .map(|item| decode(element_type, item, unknown))
        .collect()
}

// Type of a dynamic payload.
fn infer_type(json: &serde_json::Value) -> Type {
    use serde_json::Value as Json;
    match json {
        Json::Bool(_) => Type::Bool,
        Json::Number(_) => Type::Number,
        Json::Array(_) => Type::list(Type::Dynamic),
        Json::Object(fields) => Type::object(fields.keys().map(|k| (k.as_str(), Type::Dynamic))),
        _ => Type::String,
    }
}
