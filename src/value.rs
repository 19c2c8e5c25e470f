//! Dynamic value representation for bean properties and collection entries.
//!
//! This module provides the [`Value`] enum which carries any value a bean
//! property or collection entry can hold: null, a leaf value with a string
//! conversion, a nested bean, or a collection.
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use beanxml::Value;
//!
//! let null = Value::Null;
//! let text = Value::from("hello");
//! let number = Value::from(42);
//! let list = Value::list(vec![Value::from(1), Value::Null, Value::from(3)]);
//! assert!(list.is_collection());
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use beanxml::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! let n: i32 = i32::try_from(value).unwrap();
//! assert_eq!(n, 42);
//! ```

use crate::bean::BeanBox;
use crate::collection::Collection;
use crate::types::{LeafType, TypeRef};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use std::fmt;

/// A dynamically-typed property or entry value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Bool(bool),
    Char(char),
    Int(i32),
    Long(i64),
    Double(f64),
    DateTime(DateTime<Utc>),
    BigInt(BigInt),
    Bean(BeanBox),
    Collection(Collection),
}

impl Value {
    /// Wraps a list of values.
    #[must_use]
    pub fn list(values: Vec<Value>) -> Self {
        Value::Collection(Collection::List(values))
    }

    /// Wraps a set, dropping duplicate elements.
    #[must_use]
    pub fn set(values: Vec<Value>) -> Self {
        Value::Collection(Collection::set_from(values))
    }

    /// Wraps a map, later duplicate keys replacing earlier ones.
    #[must_use]
    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        Value::Collection(Collection::map_from(entries))
    }

    /// Wraps a bean.
    #[must_use]
    pub fn bean<B: crate::Bean + Clone>(bean: B) -> Self {
        Value::Bean(BeanBox::new(bean))
    }

    /// Returns the runtime type of this value, or `None` for null.
    #[must_use]
    pub fn type_ref(&self) -> Option<TypeRef> {
        let ty = match self {
            Value::Null => return None,
            Value::String(_) => TypeRef::Leaf(LeafType::String),
            Value::Bool(_) => TypeRef::Leaf(LeafType::Bool),
            Value::Char(_) => TypeRef::Leaf(LeafType::Char),
            Value::Int(_) => TypeRef::Leaf(LeafType::Int),
            Value::Long(_) => TypeRef::Leaf(LeafType::Long),
            Value::Double(_) => TypeRef::Leaf(LeafType::Double),
            Value::DateTime(_) => TypeRef::Leaf(LeafType::DateTime),
            Value::BigInt(_) => TypeRef::Leaf(LeafType::BigInt),
            Value::Bean(bean) => TypeRef::Bean(bean.type_name()),
            Value::Collection(collection) => TypeRef::Collection(collection.meta_type()),
        };
        Some(ty)
    }

    /// Returns the name of the runtime type, `"null"` for null.
    #[must_use]
    pub fn type_name(&self) -> String {
        self.type_ref()
            .map(|ty| ty.full_name().to_string())
            .unwrap_or_else(|| "null".to_string())
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bean(&self) -> bool {
        matches!(self, Value::Bean(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Value::Collection(_))
    }

    /// If the value is a string, returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanxml::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is an integer of either width, returns it widened.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(i64::from(*i)),
            Value::Long(l) => Some(*l),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bean(&self) -> Option<&BeanBox> {
        match self {
            Value::Bean(bean) => Some(bean),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Collection(collection) => Some(collection),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}", l),
            Value::Double(d) => write!(f, "{}", d),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::BigInt(bi) => write!(f, "{}", bi),
            Value::Bean(bean) => write!(f, "{}{{..}}", bean.type_name()),
            Value::Collection(collection) => {
                write!(f, "{}[{}]", collection.meta_type().name(), collection.len())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Char(c) => serializer.serialize_char(*c),
            Value::Int(i) => serializer.serialize_i32(*i),
            Value::Long(l) => serializer.serialize_i64(*l),
            Value::Double(d) => serializer.serialize_f64(*d),
            Value::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::BigInt(bi) => serializer.serialize_str(&bi.to_string()),
            Value::Bean(bean) => bean.serialize(serializer),
            Value::Collection(collection) => collection.serialize(serializer),
        }
    }
}

// TryFrom implementations for extracting values from Value
impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(crate::Error::custom(format!(
                "expected string, found {}",
                other.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(crate::Error::custom(format!(
                "expected bool, found {}",
                other.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for char {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Char(c) => Ok(c),
            other => Err(crate::Error::custom(format!(
                "expected char, found {}",
                other.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for i32 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(crate::Error::custom(format!(
                "expected i32, found {}",
                other.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Long(l) => Ok(l),
            Value::Int(i) => Ok(i64::from(i)),
            other => Err(crate::Error::custom(format!(
                "expected i64, found {}",
                other.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Double(d) => Ok(d),
            other => Err(crate::Error::custom(format!(
                "expected f64, found {}",
                other.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for Collection {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Collection(c) => Ok(c),
            other => Err(crate::Error::custom(format!(
                "expected collection, found {}",
                other.type_name()
            ))),
        }
    }
}

// From implementations for creating Value from primitives
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<BeanBox> for Value {
    fn from(value: BeanBox) -> Self {
        Value::Bean(value)
    }
}

impl From<Collection> for Value {
    fn from(value: Collection) -> Self {
        Value::Collection(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
