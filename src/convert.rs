//! Leaf string conversion.
//!
//! A type is *leaf-convertible* when the [`StringConverter`] in use can turn
//! its values into text and back. All [`LeafType`]s are convertible with the
//! [`DefaultConverter`]; bean types become convertible when a pair of
//! conversion functions is registered for them, after which they are written
//! as a single text element instead of a nested element.
//!
//! ## Examples
//!
//! ```rust
//! use beanxml::convert::{DefaultConverter, StringConverter};
//! use beanxml::types::{LeafType, TypeRef};
//! use beanxml::Value;
//!
//! let converter = DefaultConverter::new();
//! let ty = TypeRef::Leaf(LeafType::Double);
//! assert_eq!(converter.convert_to_string(&Value::Double(2.5)).unwrap(), "2.5");
//! assert_eq!(converter.convert_from_string(&ty, "2.5").unwrap(), Value::Double(2.5));
//! ```

use crate::bean::{Bean, BeanBox};
use crate::types::{LeafType, TypeRef};
use crate::{Error, Result, Value};
use chrono::{DateTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Bidirectional text conversion for leaf values.
pub trait StringConverter: Send + Sync {
    /// Returns `true` if values of `ty` can be written as text.
    fn is_convertible(&self, ty: &TypeRef) -> bool;

    /// Renders a non-null value as text.
    fn convert_to_string(&self, value: &Value) -> Result<String>;

    /// Parses text as a value of `ty`.
    fn convert_from_string(&self, ty: &TypeRef, text: &str) -> Result<Value>;
}

/// Renders a bean registered as leaf-convertible.
pub type BeanToString = fn(&dyn Bean) -> Result<String>;

/// Parses a bean registered as leaf-convertible.
pub type BeanFromString = fn(&str) -> Result<BeanBox>;

#[derive(Clone, Copy)]
struct BeanConversion {
    to_string: BeanToString,
    from_string: BeanFromString,
}

/// Converter for the built-in leaf types plus any registered bean types.
#[derive(Clone, Default)]
pub struct DefaultConverter {
    beans: HashMap<&'static str, BeanConversion>,
}

impl DefaultConverter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the bean type `name` leaf-convertible.
    pub fn register_bean(
        &mut self,
        name: &'static str,
        to_string: BeanToString,
        from_string: BeanFromString,
    ) {
        self.beans.insert(
            name,
            BeanConversion {
                to_string,
                from_string,
            },
        );
    }

    /// Builder-style form of [`register_bean`](Self::register_bean).
    #[must_use]
    pub fn with_bean(
        mut self,
        name: &'static str,
        to_string: BeanToString,
        from_string: BeanFromString,
    ) -> Self {
        self.register_bean(name, to_string, from_string);
        self
    }
}

impl fmt::Debug for DefaultConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultConverter")
            .field("beans", &self.beans.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn parse_leaf<T>(leaf: LeafType, text: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.parse::<T>().map_err(|e| {
        Error::conversion(leaf.full_name(), leaf.full_name(), format!("'{}': {}", text, e))
    })
}

impl StringConverter for DefaultConverter {
    fn is_convertible(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Leaf(_) => true,
            TypeRef::Bean(name) => self.beans.contains_key(name),
            TypeRef::Any | TypeRef::Collection(_) => false,
        }
    }

    fn convert_to_string(&self, value: &Value) -> Result<String> {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Char(c) => c.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Long(l) => l.to_string(),
            Value::Double(d) => d.to_string(),
            Value::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Value::BigInt(bi) => bi.to_string(),
            Value::Bean(bean) => {
                let name = bean.type_name();
                let conversion = self.beans.get(name).ok_or_else(|| {
                    Error::conversion(name, name, "no string conversion registered")
                })?;
                (conversion.to_string)(&**bean)?
            }
            Value::Null | Value::Collection(_) => {
                let name = value.type_name();
                return Err(Error::conversion(&name, &name, "not a leaf value"));
            }
        };
        Ok(text)
    }

    fn convert_from_string(&self, ty: &TypeRef, text: &str) -> Result<Value> {
        let value = match ty {
            TypeRef::Leaf(leaf) => match leaf {
                LeafType::String => Value::String(text.to_string()),
                LeafType::Bool => Value::Bool(parse_leaf(*leaf, text)?),
                LeafType::Char => Value::Char(parse_leaf(*leaf, text)?),
                LeafType::Int => Value::Int(parse_leaf(*leaf, text)?),
                LeafType::Long => Value::Long(parse_leaf(*leaf, text)?),
                LeafType::Double => Value::Double(parse_leaf(*leaf, text)?),
                LeafType::DateTime => {
                    let parsed = DateTime::parse_from_rfc3339(text).map_err(|e| {
                        Error::conversion(
                            leaf.full_name(),
                            leaf.full_name(),
                            format!("'{}': {}", text, e),
                        )
                    })?;
                    Value::DateTime(parsed.with_timezone(&Utc))
                }
                LeafType::BigInt => Value::BigInt(parse_leaf::<BigInt>(*leaf, text)?),
            },
            TypeRef::Bean(name) => {
                let conversion = self.beans.get(name).ok_or_else(|| {
                    Error::conversion(name, name, "no string conversion registered")
                })?;
                Value::Bean((conversion.from_string)(text)?)
            }
            TypeRef::Any | TypeRef::Collection(_) => {
                return Err(Error::conversion(
                    ty.full_name(),
                    ty.full_name(),
                    "type has no string form",
                ))
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn leaf(leaf: LeafType) -> TypeRef {
        TypeRef::Leaf(leaf)
    }

    #[test]
    fn test_leaf_formats() {
        let converter = DefaultConverter::new();
        assert_eq!(converter.convert_to_string(&Value::Bool(true)).unwrap(), "true");
        assert_eq!(converter.convert_to_string(&Value::Long(-7)).unwrap(), "-7");
        assert_eq!(converter.convert_to_string(&Value::Double(1.0)).unwrap(), "1");
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(
            converter.convert_to_string(&Value::DateTime(dt)).unwrap(),
            "2024-03-01T12:30:00Z"
        );
    }

    #[test]
    fn test_parse_leaves() {
        let converter = DefaultConverter::new();
        assert_eq!(
            converter.convert_from_string(&leaf(LeafType::Int), "42").unwrap(),
            Value::Int(42)
        );
        assert_eq!(
            converter.convert_from_string(&leaf(LeafType::Char), "x").unwrap(),
            Value::Char('x')
        );
        let big = converter
            .convert_from_string(&leaf(LeafType::BigInt), "123456789012345678901234567890")
            .unwrap();
        assert_eq!(big.to_string(), "123456789012345678901234567890");
    }

    #[test]
    fn test_parse_failure_is_conversion_error() {
        let converter = DefaultConverter::new();
        let err = converter
            .convert_from_string(&leaf(LeafType::Int), "forty")
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Conversion);
        assert!(converter.convert_from_string(&leaf(LeafType::Char), "xy").is_err());
    }

    #[test]
    fn test_unregistered_bean_is_not_convertible() {
        let converter = DefaultConverter::new();
        assert!(!converter.is_convertible(&TypeRef::Bean("app::Money")));
        assert!(!converter.is_convertible(&TypeRef::Any));
        assert!(converter.is_convertible(&leaf(LeafType::String)));
    }
}
