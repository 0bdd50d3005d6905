// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use core::str::FromStr;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use serde::ser::Serializer;
use serde::Serialize;

const F64_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0; // 2^53

/// Arbitrary-precision number backing the `number` kind.
///
/// Integers of any size are kept exactly. Everything else is an `f64`.
#[derive(Clone)]
pub enum Number {
    Int(Rc<BigInt>),
    Float(f64),
}

impl Number {
    fn float_to_bigint(value: f64) -> Option<BigInt> {
        if !value.is_finite() || value.fract() != 0.0 || value.abs() > F64_SAFE_INTEGER {
            return None;
        }
        BigInt::from_f64(value)
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Number::Int(_) => true,
            Number::Float(f) => Self::float_to_bigint(*f).is_some(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => i.to_i64(),
            Number::Float(f) => Self::float_to_bigint(*f).and_then(|i| i.to_i64()),
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Int(i) => i.to_u64(),
            Number::Float(f) => Self::float_to_bigint(*f).and_then(|i| i.to_u64()),
        }
    }

    /// Lossy conversion for very large integers.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => i.to_f64().unwrap_or(f64::NAN),
            Number::Float(f) => *f,
        }
    }

    pub fn from_json(n: &serde_json::Number) -> Result<Number> {
        if let Some(u) = n.as_u64() {
            Ok(Number::from(u))
        } else if let Some(i) = n.as_i64() {
            Ok(Number::from(i))
        } else if let Some(f) = n.as_f64() {
            Ok(Number::from(f))
        } else {
            Err(anyhow!("unsupported json number {n}"))
        }
    }
}

/// Float equality that is reflexive: NaN equals NaN.
pub(crate) fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => float_eq(*a, *b),
            // Exact for integral floats of any magnitude.
            (Number::Int(i), Number::Float(f)) | (Number::Float(f), Number::Int(i)) => {
                f.is_finite() && f.fract() == 0.0 && BigInt::from_f64(*f).is_some_and(|fi| fi == **i)
            }
        }
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            // Integral floats render without a fractional part.
            Number::Float(v) => match Self::float_to_bigint(*v) {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{v}"),
            },
        }
    }
}

impl FromStr for Number {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(i) = BigInt::from_str(s) {
            return Ok(Number::from(i));
        }
        match f64::from_str(s) {
            Ok(f) => Ok(Number::Float(f)),
            Err(_) => Err(anyhow!("`{s}` is not a number")),
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Number::Int(i) => {
                if let Some(u) = i.to_u64() {
                    serializer.serialize_u64(u)
                } else if let Some(v) = i.to_i64() {
                    serializer.serialize_i64(v)
                } else {
                    serializer.serialize_f64(self.as_f64())
                }
            }
            Number::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::Int(Rc::new(value))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::from(BigInt::from(value))
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::from(BigInt::from(value))
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::from(BigInt::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}
