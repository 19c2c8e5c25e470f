//! Error types for bean XML writing and reading.
//!
//! This module provides error reporting with enough context to locate the
//! offending element in a document or the offending value in a bean graph.
//!
//! ## Error Categories
//!
//! - **Structural**: malformed nesting, unterminated elements, unresolvable type
//!   or meta-type names. Reported with line/column information.
//! - **Domain**: a value that the format cannot express in the requested position,
//!   such as an object used as a map-key attribute or a control character in text.
//! - **Conversion**: the string conversion registry cannot render or parse a value.
//!   Reported with both the declared and the actual type name.
//! - **Schema**: an invalid bean schema or an unknown/duplicate property.
//!
//! Every error is fatal for the document being processed: there is no partial result.
//!
//! ## Examples
//!
//! ```rust
//! use beanxml::{from_str, BeanXmlOptions, ErrorKind};
//!
//! let result = from_str("<bean type=\"beanxml::MapBean\"><a>1</b></bean>", &BeanXmlOptions::default());
//! let err = result.unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Structural);
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while writing or reading bean XML.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed document structure
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// Closing tag does not match the open element
    #[error("Unbalanced element at line {line}, column {col}: expected </{expected}>, found </{found}>")]
    UnbalancedElement {
        line: usize,
        col: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input
    #[error("Unexpected end of input at line {line}, column {col}: expected {expected}")]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
    },

    /// A `type` attribute that names no known type
    #[error("Unknown type '{name}' at line {line}, column {col}")]
    UnknownType { line: usize, col: usize, name: String },

    /// A `metatype` attribute that names no known collection shape
    #[error("Unknown meta-type '{name}' at line {line}, column {col}")]
    UnknownMetaType { line: usize, col: usize, name: String },

    /// Character that cannot be represented in XML text
    #[error("Invalid character for XML: {code}")]
    InvalidCharacter { code: u32 },

    /// Property name that cannot be written as an element name
    #[error("Invalid element name: '{0}'")]
    InvalidName(String),

    /// Value that cannot be used as a map key in the requested position
    #[error("Invalid map key: {0}")]
    InvalidKey(String),

    /// The string conversion registry failed for a value
    #[error("Unable to convert type {actual} declared as {declared}: {msg}")]
    Conversion {
        declared: String,
        actual: String,
        msg: String,
    },

    /// Property name not present in the schema
    #[error("Unknown property '{property}' on {bean}")]
    UnknownProperty { bean: String, property: String },

    /// Property defined or set twice
    #[error("Duplicate property '{property}' on {bean}")]
    DuplicateProperty { bean: String, property: String },

    /// Unsupported type or schema definition
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    Domain,
    Conversion,
    Schema,
    Io,
    Other,
}

impl Error {
    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanxml::Error;
    ///
    /// let err = Error::syntax(10, 5, "expected '>'");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates an error for a closing tag that does not match its open element.
    pub fn unbalanced(line: usize, col: usize, expected: &str, found: &str) -> Self {
        Error::UnbalancedElement {
            line,
            col,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(line: usize, col: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
        }
    }

    /// Creates an error for a type name that cannot be resolved.
    pub fn unknown_type(line: usize, col: usize, name: &str) -> Self {
        Error::UnknownType {
            line,
            col,
            name: name.to_string(),
        }
    }

    /// Creates an error for a meta-type name that cannot be resolved.
    pub fn unknown_meta_type(line: usize, col: usize, name: &str) -> Self {
        Error::UnknownMetaType {
            line,
            col,
            name: name.to_string(),
        }
    }

    /// Creates an error for a character that XML cannot carry.
    pub fn invalid_character(ch: char) -> Self {
        Error::InvalidCharacter { code: ch as u32 }
    }

    /// Creates an error for a property name that is not an XML name.
    pub fn invalid_name(name: &str) -> Self {
        Error::InvalidName(name.to_string())
    }

    /// Creates an invalid map key error.
    pub fn invalid_key<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidKey(msg.to_string())
    }

    /// Creates a conversion error naming the declared and actual types.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanxml::Error;
    ///
    /// let err = Error::conversion("i64", "i32", "type mismatch");
    /// assert!(err.to_string().contains("declared as i64"));
    /// ```
    pub fn conversion<T: fmt::Display>(declared: &str, actual: &str, msg: T) -> Self {
        Error::Conversion {
            declared: declared.to_string(),
            actual: actual.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an unknown property error.
    pub fn unknown_property(bean: &str, property: &str) -> Self {
        Error::UnknownProperty {
            bean: bean.to_string(),
            property: property.to_string(),
        }
    }

    /// Creates a duplicate property error.
    pub fn duplicate_property(bean: &str, property: &str) -> Self {
        Error::DuplicateProperty {
            bean: bean.to_string(),
            property: property.to_string(),
        }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanxml::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax { .. }
            | Error::UnbalancedElement { .. }
            | Error::UnexpectedEof { .. }
            | Error::UnknownType { .. }
            | Error::UnknownMetaType { .. } => ErrorKind::Structural,
            Error::InvalidCharacter { .. } | Error::InvalidName(_) | Error::InvalidKey(_) => {
                ErrorKind::Domain
            }
            Error::Conversion { .. } => ErrorKind::Conversion,
            Error::UnknownProperty { .. }
            | Error::DuplicateProperty { .. }
            | Error::UnsupportedType(_) => ErrorKind::Schema,
            Error::Io(_) => ErrorKind::Io,
            Error::Custom(_) => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::syntax(1, 1, "x").kind(), ErrorKind::Structural);
        assert_eq!(Error::unknown_type(1, 1, "x").kind(), ErrorKind::Structural);
        assert_eq!(Error::invalid_character('\u{1}').kind(), ErrorKind::Domain);
        assert_eq!(Error::invalid_key("bean").kind(), ErrorKind::Domain);
        assert_eq!(Error::invalid_name("first name").kind(), ErrorKind::Domain);
        assert_eq!(
            Error::conversion("i64", "i32", "mismatch").kind(),
            ErrorKind::Conversion
        );
        assert_eq!(Error::duplicate_property("a::B", "x").kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_invalid_character_reports_code() {
        let err = Error::invalid_character('\u{7}');
        assert_eq!(err.to_string(), "Invalid character for XML: 7");
    }
}
