//! Configuration for bean XML writing and reading.
//!
//! [`BeanXmlOptions`] carries the output layout (indent and newline), whether
//! the root type is written, and the pluggable collaborators: the leaf string
//! converter, the collection adapter and the registry of bean types known to
//! the reader.
//!
//! ## Examples
//!
//! ```rust
//! use beanxml::{BeanXmlOptions, MapBean, Value};
//!
//! let mut bean = MapBean::new();
//! bean.insert("name", Value::from("Alice"));
//!
//! let compact = beanxml::to_string_with_options(&bean, &BeanXmlOptions::compact()).unwrap();
//! assert!(compact.contains("<bean type=\"beanxml::MapBean\"><name>Alice</name></bean>"));
//!
//! let pretty = beanxml::to_string_with_options(&bean, &BeanXmlOptions::pretty()).unwrap();
//! assert!(pretty.contains("\n <name>Alice</name>\n"));
//! ```

use crate::bean::MetaBean;
use crate::collection::{CollectionAdapter, DefaultCollectionAdapter};
use crate::convert::{DefaultConverter, StringConverter};
use crate::registry::TypeRegistry;
use std::fmt;
use std::sync::Arc;

/// Settings shared by the writer and the reader.
///
/// # Examples
///
/// ```rust
/// use beanxml::BeanXmlOptions;
///
/// // Default compact options
/// let options = BeanXmlOptions::new();
/// assert!(!options.is_pretty());
///
/// // Two spaces per level, no root type
/// let options = BeanXmlOptions::pretty()
///     .with_indent(2)
///     .with_root_type(false);
/// assert!(options.is_pretty());
/// ```
#[derive(Clone)]
pub struct BeanXmlOptions {
    /// Spaces per nesting level; ignored when `newline` is empty.
    pub indent: usize,
    pub newline: String,
    /// Write the root `type` attribute and shorten names against the root's namespace.
    pub root_type: bool,
    pub converter: Arc<dyn StringConverter>,
    pub adapter: Arc<dyn CollectionAdapter>,
    pub registry: TypeRegistry,
    /// Deepest element nesting the reader accepts, the root counting as one.
    pub max_depth: usize,
}

/// Nesting limit used unless [`BeanXmlOptions::with_max_depth`] says otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 128;

impl Default for BeanXmlOptions {
    fn default() -> Self {
        BeanXmlOptions {
            indent: 0,
            newline: String::new(),
            root_type: true,
            converter: Arc::new(DefaultConverter::new()),
            adapter: Arc::new(DefaultCollectionAdapter),
            registry: TypeRegistry::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl BeanXmlOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compact output: no whitespace between tags.
    #[must_use]
    pub fn compact() -> Self {
        Self::default()
    }

    /// Pretty output: one space per level and a newline after every tag.
    #[must_use]
    pub fn pretty() -> Self {
        BeanXmlOptions {
            indent: 1,
            newline: "\n".to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }

    #[must_use]
    pub fn with_root_type(mut self, root_type: bool) -> Self {
        self.root_type = root_type;
        self
    }

    #[must_use]
    pub fn with_converter(mut self, converter: Arc<dyn StringConverter>) -> Self {
        self.converter = converter;
        self
    }

    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<dyn CollectionAdapter>) -> Self {
        self.adapter = adapter;
        self
    }

    /// Makes a bean type resolvable by the reader.
    #[must_use]
    pub fn with_type(mut self, meta: Arc<MetaBean>) -> Self {
        self.registry.register(meta);
        self
    }

    /// Limits how deeply the reader lets elements nest.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns `true` if output is laid out on several lines.
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        !self.newline.is_empty()
    }

    /// The indentation for one nesting level.
    #[must_use]
    pub fn indent_unit(&self) -> String {
        if self.is_pretty() {
            " ".repeat(self.indent)
        } else {
            String::new()
        }
    }
}

impl fmt::Debug for BeanXmlOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanXmlOptions")
            .field("indent", &self.indent)
            .field("newline", &self.newline)
            .field("root_type", &self.root_type)
            .field("max_depth", &self.max_depth)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let compact = BeanXmlOptions::compact();
        assert!(!compact.is_pretty());
        assert_eq!(compact.indent_unit(), "");
        assert!(compact.root_type);

        let pretty = BeanXmlOptions::pretty();
        assert_eq!(pretty.indent_unit(), " ");
        assert_eq!(pretty.newline, "\n");
        assert_eq!(pretty.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_with_max_depth() {
        let options = BeanXmlOptions::compact().with_max_depth(4);
        assert_eq!(options.max_depth, 4);
        assert!(format!("{:?}", options).contains("max_depth: 4"));
    }

    #[test]
    fn test_indent_ignored_without_newline() {
        let options = BeanXmlOptions::new().with_indent(4);
        assert_eq!(options.indent_unit(), "");
    }
}
