// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Schema types of values.
//!
//! A [`Type`] describes the shape of a [`Value`](crate::Value): its variant,
//! the element type of collections, the attribute types of objects and, for
//! values produced by user-defined types, the name of that custom type.

use core::fmt;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{anyhow, bail, Result};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// The closed set of value variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Bool,
    Float64,
    Int64,
    Number,
    String,
    Dynamic,
    List,
    Map,
    Set,
    Object,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Float64 => "float64",
            Kind::Int64 => "int64",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Dynamic => "dynamic",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Set => "set",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type AttributeTypes = BTreeMap<Rc<str>, Type>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    Float64,
    Int64,
    Number,
    String,
    Dynamic,
    List(Rc<Type>),
    Map(Rc<Type>),
    Set(Rc<Type>),
    Object(Rc<AttributeTypes>),

    // A user-defined type layered over a non-custom base type.
    Custom(Rc<str>, Rc<Type>),
}

impl Type {
    pub fn list(element: Type) -> Type {
        Type::List(Rc::new(element))
    }

    pub fn map(element: Type) -> Type {
        Type::Map(Rc::new(element))
    }

    pub fn set(element: Type) -> Type {
        Type::Set(Rc::new(element))
    }

    pub fn object<I, K>(attributes: I) -> Type
    where
        I: IntoIterator<Item = (K, Type)>,
        K: Into<Rc<str>>,
    {
        Type::Object(Rc::new(
            attributes.into_iter().map(|(k, t)| (k.into(), t)).collect(),
        ))
    }

    /// Layer a custom type named `name` over `base`.
    ///
    /// If `base` is itself custom, its base is used instead; custom types do not nest.
    pub fn custom(name: impl Into<Rc<str>>, base: Type) -> Type {
        let base = match base {
            Type::Custom(_, inner) => inner,
            other => Rc::new(other),
        };
        Type::Custom(name.into(), base)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Type::Bool => Kind::Bool,
            Type::Float64 => Kind::Float64,
            Type::Int64 => Kind::Int64,
            Type::Number => Kind::Number,
            Type::String => Kind::String,
            Type::Dynamic => Kind::Dynamic,
            Type::List(_) => Kind::List,
            Type::Map(_) => Kind::Map,
            Type::Set(_) => Kind::Set,
            Type::Object(_) => Kind::Object,
            Type::Custom(_, base) => base.kind(),
        }
    }

    /// The type with any custom layer removed.
    pub fn base(&self) -> &Type {
        match self {
            Type::Custom(_, base) => base,
            _ => self,
        }
    }

    pub fn custom_name(&self) -> Option<&str> {
        match self {
            Type::Custom(name, _) => Some(name),
            _ => None,
        }
    }

    pub fn element_type(&self) -> Option<&Type> {
        match self.base() {
            Type::List(e) | Type::Map(e) | Type::Set(e) => Some(e),
            _ => None,
        }
    }

    pub fn attribute_types(&self) -> Option<&AttributeTypes> {
        match self.base() {
            Type::Object(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Parse the JSON type constraint encoding.
    ///
    /// Primitive types are strings (`"string"`), collections are two element
    /// arrays (`["list", "string"]`), objects map attribute names to types
    /// (`["object", {"a": "bool"}]`) and custom types carry their name
    /// (`["custom", "json", "string"]`).
    pub fn from_json(json: &serde_json::Value) -> Result<Type> {
        use serde_json::Value as Json;
        match json {
            Json::String(s) => match s.as_str() {
                "bool" => Ok(Type::Bool),
                "float64" => Ok(Type::Float64),
                "int64" => Ok(Type::Int64),
                "number" => Ok(Type::Number),
                "string" => Ok(Type::String),
                "dynamic" => Ok(Type::Dynamic),
                _ => bail!("unknown primitive type `{s}`"),
            },
            Json::Array(items) => match (items.first().and_then(|k| k.as_str()), items.len()) {
                (Some("list"), 2) => Ok(Type::list(Type::from_json(&items[1])?)),
                (Some("map"), 2) => Ok(Type::map(Type::from_json(&items[1])?)),
                (Some("set"), 2) => Ok(Type::set(Type::from_json(&items[1])?)),
                (Some("object"), 2) => {
                    let attrs = items[1]
                        .as_object()
                        .ok_or_else(|| anyhow!("object attribute types must be a map"))?;
                    let mut types = AttributeTypes::new();
                    for (name, t) in attrs {
                        types.insert(name.as_str().into(), Type::from_json(t)?);
                    }
                    Ok(Type::Object(Rc::new(types)))
                }
                (Some("custom"), 3) => {
                    let name = items[1]
                        .as_str()
                        .ok_or_else(|| anyhow!("custom type name must be a string"))?;
                    Ok(Type::custom(name, Type::from_json(&items[2])?))
                }
                _ => bail!("invalid type constraint {json}"),
            },
            _ => bail!("invalid type constraint {json}"),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Type> {
        Type::from_json(&serde_json::from_str(json)?)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::List(e) => write!(f, "list({e})"),
            Type::Map(e) => write!(f, "map({e})"),
            Type::Set(e) => write!(f, "set({e})"),
            Type::Object(attrs) => {
                f.write_str("object({")?;
                for (idx, (name, t)) in attrs.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}={t}")?;
                }
                f.write_str("})")
            }
            Type::Custom(name, base) => write!(f, "{name}[{base}]"),
            _ => f.write_str(self.kind().as_str()),
        }
    }
}

impl Serialize for Type {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Type::List(e) | Type::Map(e) | Type::Set(e) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(self.kind().as_str())?;
                seq.serialize_element(e.as_ref())?;
                seq.end()
            }
            Type::Object(attrs) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element("object")?;
                seq.serialize_element(attrs.as_ref())?;
                seq.end()
            }
            Type::Custom(name, base) => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element("custom")?;
                seq.serialize_element(name.as_ref())?;
                seq.serialize_element(base.as_ref())?;
                seq.end()
            }
            _ => serializer.serialize_str(self.kind().as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D>(deserializer: D) -> Result<Type, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = serde_json::Value::deserialize(deserializer)?;
        Type::from_json(&json).map_err(serde::de::Error::custom)
    }
}
