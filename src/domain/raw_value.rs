// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw configuration value tree.
//!
//! This module provides the `RawValue` type, the tagged union every layer and
//! every normalized document is made of. Layers arrive in arbitrary nested
//! mapping form; dispatching on the tag (scalar, list, map) is what lets the
//! normalizer expand shorthand without runtime type probing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A scalar leaf value.
///
/// Scalars are the only values that carry data directly; everything else in a
/// configuration tree is structure around them.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::raw_value::Scalar;
///
/// let s = Scalar::Str("flock".to_string());
/// assert_eq!(s.to_string(), "flock");
/// assert!(Scalar::Null.is_null());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// The absent/unset value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// A string.
    Str(String),
}

impl Scalar {
    /// Returns `true` for `Scalar::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Returns the string content if this scalar is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the boolean content if this scalar is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to coerce this scalar to the given target type.
    ///
    /// String spellings of booleans follow the usual configuration
    /// conventions (case-insensitive): `true`/`yes`/`1`/`on` and
    /// `false`/`no`/`0`/`off`. Integers and floats coerce from their string
    /// spellings; any scalar coerces to a string via its display form.
    /// Returns `None` when no lossless interpretation exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::domain::raw_value::{Scalar, ScalarType};
    ///
    /// let s = Scalar::Str("yes".to_string());
    /// assert_eq!(s.coerce(ScalarType::Bool), Some(Scalar::Bool(true)));
    /// ```
    pub fn coerce(&self, target: ScalarType) -> Option<Scalar> {
        match (self, target) {
            (Scalar::Null, _) => Some(Scalar::Null),
            (Scalar::Bool(_), ScalarType::Bool) => Some(self.clone()),
            (Scalar::Int(_), ScalarType::Int) => Some(self.clone()),
            (Scalar::Float(_), ScalarType::Float) => Some(self.clone()),
            (Scalar::Int(n), ScalarType::Float) => Some(Scalar::Float(*n as f64)),
            (Scalar::Str(_), ScalarType::Str) => Some(self.clone()),
            (Scalar::Str(s), ScalarType::Bool) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Some(Scalar::Bool(true)),
                "false" | "no" | "0" | "off" => Some(Scalar::Bool(false)),
                _ => None,
            },
            (Scalar::Str(s), ScalarType::Int) => s.parse::<i64>().ok().map(Scalar::Int),
            (Scalar::Str(s), ScalarType::Float) => s.parse::<f64>().ok().map(Scalar::Float),
            (Scalar::Bool(b), ScalarType::Str) => Some(Scalar::Str(b.to_string())),
            (Scalar::Int(n), ScalarType::Str) => Some(Scalar::Str(n.to_string())),
            (Scalar::Float(x), ScalarType::Str) => Some(Scalar::Str(x.to_string())),
            _ => None,
        }
    }

    /// Returns a short name for the scalar's shape, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Str(_) => "string",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => write!(f, "{}", s),
        }
    }
}

/// The scalar type a schema node expects, driving coercion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarType {
    /// Boolean, with string spellings accepted.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float, with integers widened.
    Float,
    /// String, with scalar display forms accepted.
    Str,
}

impl ScalarType {
    /// Returns the name used in shape-error messages.
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Bool => "boolean",
            ScalarType::Int => "integer",
            ScalarType::Float => "float",
            ScalarType::Str => "string",
        }
    }
}

/// A raw configuration value: scalar leaf, list, or mapping.
///
/// Every layer handed to the processor and every normalized document it
/// produces is a `RawValue`. Maps use `BTreeMap` so key iteration is always
/// sorted; error messages and scope expansion rely on that determinism.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::raw_value::RawValue;
///
/// let layer = RawValue::map([
///     ("name", RawValue::from("SESSIONID")),
///     ("enabled", RawValue::from(true)),
/// ]);
/// assert!(layer.as_map().is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A scalar leaf.
    Scalar(Scalar),
    /// An ordered list of values.
    List(Vec<RawValue>),
    /// A string-keyed mapping with sorted iteration order.
    Map(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// The null scalar.
    pub fn null() -> Self {
        RawValue::Scalar(Scalar::Null)
    }

    /// Builds a list value from anything iterable.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::domain::raw_value::RawValue;
    ///
    /// let v = RawValue::list([RawValue::from("flock"), RawValue::from("semaphore")]);
    /// assert_eq!(v.as_list().unwrap().len(), 2);
    /// ```
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = RawValue>,
    {
        RawValue::List(items.into_iter().collect())
    }

    /// Builds a map value from `(key, value)` pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, RawValue)>,
    {
        RawValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }

    /// An empty map.
    pub fn empty_map() -> Self {
        RawValue::Map(BTreeMap::new())
    }

    /// Returns `true` if this value is the null scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Scalar(Scalar::Null))
    }

    /// Returns the scalar if this value is a leaf.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            RawValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the string content if this value is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Returns the boolean content if this value is a boolean scalar.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Scalar::as_bool)
    }

    /// Returns the items if this value is a list.
    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries if this value is a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, RawValue>> {
        match self {
            RawValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the entries mutably if this value is a map.
    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, RawValue>> {
        match self {
            RawValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a direct child of a map value.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Returns a short name for the value's shape, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Scalar(s) => s.type_name(),
            RawValue::List(_) => "list",
            RawValue::Map(_) => "map",
        }
    }
}

impl From<Scalar> for RawValue {
    fn from(s: Scalar) -> Self {
        RawValue::Scalar(s)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Scalar(Scalar::Str(s))
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Scalar(Scalar::Int(n))
    }
}

impl From<f64> for RawValue {
    fn from(x: f64) -> Self {
        RawValue::Scalar(Scalar::Float(x))
    }
}
