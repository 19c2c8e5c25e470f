//! Bean XML reading.
//!
//! Reading happens in two passes. The [`Deserializer`] parses the document
//! into a tree of [`Element`]s, tracking line and column for diagnostics.
//! The tree is then bound to bean schemas: `type` and `metatype` attributes
//! are trusted first, otherwise the declared type of the property or entry
//! decides how an element is read.
//!
//! ## Usage
//!
//! ```rust
//! use beanxml::{from_str, BeanXmlOptions, MapBean, Value};
//!
//! let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
//! <bean type="beanxml::MapBean">
//!  <city>London &amp; Capital &lt;!&gt;</city>
//!  <size type="i32">12</size>
//! </bean>
//! "#;
//!
//! let bean = from_str(xml, &BeanXmlOptions::default()).unwrap();
//! let map = bean.downcast::<MapBean>().unwrap();
//! assert_eq!(map.get("city"), Some(&Value::from("London & Capital <!>")));
//! assert_eq!(map.get("size"), Some(&Value::Int(12)));
//! ```
//!
//! ## Accepted syntax
//!
//! Besides what the writer produces, the parser accepts an optional XML
//! declaration, comments anywhere (also inside text), CDATA sections,
//! processing instructions, named and numeric character references and
//! single-quoted attributes.

use crate::bean::{BeanBox, MetaBean};
use crate::collection::{CollectionBuilder, MetaType};
use crate::encoder::TypeNameCache;
use crate::format::{self, BEAN, COUNT, ENTRY, ITEM, KEY, METATYPE, NULL, TYPE};
use crate::types::{GenericType, TypeRef};
use crate::options::DEFAULT_MAX_DEPTH;
use crate::{BeanXmlOptions, Error, Result, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// One parsed XML element.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Character data; empty when the element has children.
    pub text: String,
    pub line: usize,
    pub col: usize,
}

impl Element {
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn syntax(&self, msg: &str) -> Error {
        Error::syntax(self.line, self.col, msg)
    }
}

/// The XML tree parser.
///
/// Created via [`Deserializer::from_str`].
pub struct Deserializer<'de> {
    input: &'de str,
    position: usize,
    line: usize,
    column: usize,
    max_depth: usize,
}

impl<'de> Deserializer<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Deserializer {
            input,
            position: 0,
            line: 1,
            column: 1,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the deepest nesting accepted, the root element counting as one.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        if let Some(ch) = self.input[self.position..].chars().next() {
            self.position += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(ch)
        } else {
            None
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.position..].starts_with(s)
    }

    fn consume(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            for _ in s.chars() {
                self.next_char();
            }
            true
        } else {
            false
        }
    }

    fn expect(&mut self, s: &str) -> Result<()> {
        if self.consume(s) {
            Ok(())
        } else if self.at_end() {
            Err(self.eof(&format!("'{}'", s)))
        } else {
            Err(self.error(&format!("expected '{}'", s)))
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn error(&self, msg: &str) -> Error {
        Error::syntax(self.line, self.column, msg)
    }

    fn eof(&self, expected: &str) -> Error {
        Error::unexpected_eof(self.line, self.column, expected)
    }

    /// Consumes input up to and including `end`, returning what came before it.
    fn take_until(&mut self, end: &str, what: &str) -> Result<&'de str> {
        let input = self.input;
        let rest = &input[self.position..];
        let len = rest.find(end).ok_or_else(|| self.eof(what))?;
        let taken = &rest[..len];
        for _ in taken.chars() {
            self.next_char();
        }
        self.consume(end);
        Ok(taken)
    }

    /// Skips comments, processing instructions and whitespace outside the root.
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.consume("<!--") {
                self.take_until("-->", "'-->'")?;
            } else if self.consume("<?") {
                self.take_until("?>", "'?>'")?;
            } else if self.starts_with("<!DOCTYPE") {
                self.take_until(">", "'>'")?;
            } else {
                return Ok(());
            }
        }
    }

    /// Parses a whole document and returns its root element.
    ///
    /// # Errors
    ///
    /// Fails on malformed or unbalanced markup, on trailing content and on
    /// elements nested deeper than the configured limit.
    pub fn parse_document(&mut self) -> Result<Element> {
        self.consume("\u{feff}");
        self.skip_misc()?;
        if self.at_end() {
            return Err(self.eof("root element"));
        }
        let root = self.parse_element(1)?;
        self.skip_misc()?;
        if !self.at_end() {
            return Err(self.error("unexpected content after the root element"));
        }
        Ok(root)
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':') {
                self.next_char();
            } else {
                break;
            }
        }
        if self.position == start {
            return match self.peek_char() {
                None => Err(self.eof("a name")),
                Some(ch) => Err(self.error(&format!("invalid character '{}' in name", ch))),
            };
        }
        Ok(self.input[start..self.position].to_string())
    }

    fn parse_reference(&mut self, out: &mut String) -> Result<()> {
        let (line, col) = (self.line, self.column);
        self.next_char();
        let body = self.take_until(";", "';'")?;
        let ch = format::resolve_entity(body).ok_or_else(|| {
            Error::syntax(line, col, &format!("unknown character reference '&{};'", body))
        })?;
        out.push(ch);
        Ok(())
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.next_char() {
            Some(q @ ('"' | '\'')) => q,
            Some(_) => return Err(self.error("expected a quoted attribute value")),
            None => return Err(self.eof("attribute value")),
        };
        let mut value = String::new();
        loop {
            match self.peek_char() {
                None => return Err(self.eof("end of attribute value")),
                Some(ch) if ch == quote => {
                    self.next_char();
                    return Ok(value);
                }
                Some('&') => self.parse_reference(&mut value)?,
                Some('<') => return Err(self.error("'<' is not allowed in an attribute value")),
                Some(ch) => {
                    check_char(ch)?;
                    // literal whitespace in attributes normalizes to a space
                    value.push(if matches!(ch, '\t' | '\n' | '\r') { ' ' } else { ch });
                    self.next_char();
                }
            }
        }
    }

    fn parse_element(&mut self, depth: usize) -> Result<Element> {
        let (line, col) = (self.line, self.column);
        if depth > self.max_depth {
            return Err(self.error("nesting too deep"));
        }
        self.expect("<")?;
        let name = self.parse_name()?;
        let mut element = Element {
            name,
            line,
            col,
            ..Element::default()
        };

        loop {
            self.skip_whitespace();
            if self.consume("/>") {
                return Ok(element);
            }
            if self.consume(">") {
                break;
            }
            if self.at_end() {
                return Err(self.eof("'>'"));
            }
            let attr = self.parse_name()?;
            self.skip_whitespace();
            self.expect("=")?;
            self.skip_whitespace();
            let value = self.parse_attribute_value()?;
            if element.attr(&attr).is_some() {
                return Err(Error::syntax(line, col, &format!("duplicate attribute '{}'", attr)));
            }
            element.attrs.push((attr, value));
        }

        let mut has_text = false;
        loop {
            if self.at_end() {
                return Err(self.eof(&format!("'</{}>'", element.name)));
            }
            if self.starts_with("</") {
                let (close_line, close_col) = (self.line, self.column);
                self.consume("</");
                let closing = self.parse_name()?;
                self.skip_whitespace();
                self.expect(">")?;
                if closing != element.name {
                    return Err(Error::unbalanced(close_line, close_col, &element.name, &closing));
                }
                break;
            } else if self.consume("<!--") {
                self.take_until("-->", "'-->'")?;
            } else if self.consume("<![CDATA[") {
                let data = self.take_until("]]>", "']]>'")?;
                element.text.push_str(data);
                has_text |= !data.is_empty();
            } else if self.consume("<?") {
                self.take_until("?>", "'?>'")?;
            } else if self.starts_with("<") {
                let child = self.parse_element(depth + 1)?;
                element.children.push(child);
            } else if self.starts_with("&") {
                self.parse_reference(&mut element.text)?;
                has_text = true;
            } else if let Some(ch) = self.next_char() {
                check_char(ch)?;
                element.text.push(ch);
                has_text |= !ch.is_ascii_whitespace();
            }
        }

        if !element.children.is_empty() {
            if has_text {
                return Err(element.syntax("text mixed with child elements"));
            }
            element.text.clear();
        }
        Ok(element)
    }
}

fn check_char(ch: char) -> Result<()> {
    if (ch as u32) < 32 && !matches!(ch, '\t' | '\n' | '\r') {
        return Err(Error::invalid_character(ch));
    }
    Ok(())
}

/// Binds a parsed element tree to bean schemas.
struct Binder<'o> {
    options: &'o BeanXmlOptions,
    cache: TypeNameCache,
}

impl<'o> Binder<'o> {
    fn new(options: &'o BeanXmlOptions) -> Self {
        Binder {
            options,
            cache: TypeNameCache::new(None),
        }
    }

    fn read_root(&mut self, root: &Element, expected: Option<&Arc<MetaBean>>) -> Result<BeanBox> {
        if root.name != BEAN {
            return Err(root.syntax(&format!(
                "expected root element <{}>, found <{}>",
                BEAN, root.name
            )));
        }
        let meta = match (root.attr(TYPE), expected) {
            (Some(name), _) => {
                let meta = self
                    .options
                    .registry
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::unknown_type(root.line, root.col, name))?;
                self.cache.set_base(meta.module_path());
                meta
            }
            (None, Some(meta)) => Arc::clone(meta),
            (None, None) => return Err(root.syntax("root element has no type attribute")),
        };
        debug!(root = meta.name(), "reading bean document");
        self.read_bean(root, &meta)
    }

    fn read_bean(&mut self, element: &Element, meta: &Arc<MetaBean>) -> Result<BeanBox> {
        if !element.text.trim().is_empty() {
            return Err(element.syntax(&format!("unexpected text in bean {}", meta.name())));
        }
        let mut builder = meta.create_builder();
        let mut seen = HashSet::new();
        for child in &element.children {
            let property = meta
                .property(&child.name)
                .ok_or_else(|| Error::unknown_property(meta.name(), &child.name))?;
            if !seen.insert(child.name.as_str()) {
                return Err(Error::duplicate_property(meta.name(), &child.name));
            }
            let value = self.read_value(child, &property.generic_type(), false)?;
            if property.style().is_buildable() {
                builder.set(&property, value)?;
            }
        }
        builder.build()
    }

    /// Resolves the type of an element from its attributes, falling back to `declared`.
    fn resolve_type(&mut self, element: &Element, declared: &GenericType) -> Result<GenericType> {
        if let Some(name) = element.attr(TYPE) {
            let ty = self
                .cache
                .decode(name, &self.options.registry)
                .ok_or_else(|| Error::unknown_type(element.line, element.col, name))?;
            return Ok(GenericType::of(ty));
        }
        if let Some(name) = element.attr(METATYPE) {
            let meta = MetaType::parse(name)
                .ok_or_else(|| Error::unknown_meta_type(element.line, element.col, name))?;
            return Ok(GenericType::raw_collection(meta));
        }
        Ok(declared.clone())
    }

    fn read_value(
        &mut self,
        element: &Element,
        declared: &GenericType,
        in_collection: bool,
    ) -> Result<Value> {
        if let Some(null) = element.attr(NULL) {
            if !in_collection || null != "true" {
                return Err(element.syntax(
                    "null is only allowed as null=\"true\" on a collection entry",
                ));
            }
            if !element.children.is_empty() || !element.text.is_empty() {
                return Err(element.syntax("null entry must be empty"));
            }
            return Ok(Value::Null);
        }
        let resolved = self.resolve_type(element, declared)?;
        match &resolved.raw {
            TypeRef::Collection(meta) => self.read_collection(element, *meta, &resolved.args),
            raw if self.options.converter.is_convertible(raw) => {
                if !element.children.is_empty() {
                    return Err(element.syntax(&format!("{} value cannot contain elements", raw)));
                }
                self.options.converter.convert_from_string(raw, &element.text)
            }
            TypeRef::Bean(name) => {
                let meta = self
                    .options
                    .registry
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::unknown_type(element.line, element.col, name))?;
                Ok(Value::Bean(self.read_bean(element, &meta)?))
            }
            TypeRef::Any => {
                if element.children.is_empty() {
                    Ok(Value::String(element.text.clone()))
                } else {
                    Err(element.syntax("element with children needs a type or metatype attribute"))
                }
            }
            TypeRef::Leaf(leaf) => Err(Error::unsupported_type(leaf.full_name())),
        }
    }

    fn read_collection(
        &mut self,
        element: &Element,
        meta: MetaType,
        args: &[GenericType],
    ) -> Result<Value> {
        if !element.text.trim().is_empty() {
            return Err(element.syntax(&format!("unexpected text in {}", meta)));
        }
        let (key_type, value_type) = meta.declared_types(args);
        let key_type = key_type.unwrap_or(GenericType::ANY);
        let mut builder = CollectionBuilder::new(meta);
        for child in &element.children {
            let count = match child.attr(COUNT) {
                Some(text) => text
                    .parse::<u32>()
                    .ok()
                    .filter(|count| *count > 0)
                    .ok_or_else(|| child.syntax(&format!("invalid count '{}'", text)))?,
                None => 1,
            };
            if count != 1 && meta != MetaType::Multiset {
                return Err(child.syntax(&format!("count is not valid in a {}", meta)));
            }
            if meta.is_map_like() {
                if child.name != ENTRY {
                    return Err(child.syntax(&format!(
                        "expected <{}>, found <{}>",
                        ENTRY, child.name
                    )));
                }
                let (key, value) = match child.attr(KEY) {
                    Some(text) => {
                        let key = self.read_key_attribute(text, &key_type)?;
                        (key, self.read_value(child, &value_type, true)?)
                    }
                    None => match child.children.as_slice() {
                        [key, value] if key.name == ITEM && value.name == ITEM => (
                            self.read_value(key, &key_type, true)?,
                            self.read_value(value, &value_type, true)?,
                        ),
                        _ => {
                            return Err(child.syntax(
                                "map entry needs a key attribute or a key and a value item",
                            ))
                        }
                    },
                };
                builder
                    .insert(key, value, count)
                    .map_err(|err| at_element(child, err))?;
            } else {
                if child.name != ITEM {
                    return Err(child.syntax(&format!(
                        "expected <{}>, found <{}>",
                        ITEM, child.name
                    )));
                }
                let value = self.read_value(child, &value_type, true)?;
                builder
                    .push(value, count)
                    .map_err(|err| at_element(child, err))?;
            }
        }
        Ok(Value::Collection(builder.build()))
    }

    fn read_key_attribute(&self, text: &str, key_type: &GenericType) -> Result<Value> {
        match &key_type.raw {
            TypeRef::Any => Ok(Value::String(text.to_string())),
            raw if self.options.converter.is_convertible(raw) => {
                self.options.converter.convert_from_string(raw, text)
            }
            raw => Err(Error::invalid_key(format!(
                "key attribute cannot hold a value of type {}",
                raw
            ))),
        }
    }
}

/// Gives a builder's shape complaint the position of the offending element.
fn at_element(element: &Element, err: Error) -> Error {
    match err {
        Error::Custom(msg) => element.syntax(&msg),
        other => other,
    }
}

/// Reads a document, resolving the root bean from its `type` attribute or,
/// when absent, from `expected`.
pub(crate) fn read_document(
    input: &str,
    options: &BeanXmlOptions,
    expected: Option<&Arc<MetaBean>>,
) -> Result<BeanBox> {
    let root = Deserializer::from_str(input)
        .with_max_depth(options.max_depth)
        .parse_document()?;
    let bean = Binder::new(options).read_root(&root, expected)?;
    debug!(root = bean.type_name(), bytes = input.len(), "read bean document");
    Ok(bean)
}
