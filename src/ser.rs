//! Bean XML writing.
//!
//! The [`Serializer`] walks a bean graph through its schemas and appends XML
//! to a single buffer. One serializer writes exactly one document: it owns
//! the per-document type name cache and the base namespace taken from the
//! root bean.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use beanxml::{to_string, to_string_pretty, MapBean, Value};
//!
//! let mut bean = MapBean::new();
//! bean.insert("city", Value::from("London & Capital <!>"));
//!
//! let compact = to_string(&bean).unwrap();
//! assert!(compact.contains("<city>London &amp; Capital &lt;!&gt;</city>"));
//!
//! let pretty = to_string_pretty(&bean).unwrap();
//! assert!(pretty.ends_with("</bean>\n"));
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use beanxml::{BeanXmlOptions, MapBean, Serializer};
//!
//! let options = BeanXmlOptions::new().with_root_type(false);
//! let xml = Serializer::new(&options).write(&MapBean::new()).unwrap();
//! assert_eq!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><bean></bean>");
//! ```

use crate::bean::{Bean, BeanBox};
use crate::collection::Cursor;
use crate::encoder::TypeNameCache;
use crate::format::{self, BEAN, COUNT, ENTRY, ITEM, KEY, METATYPE, NULL, TYPE};
use crate::types::{GenericType, TypeRef};
use crate::{BeanXmlOptions, Error, Result, Value};
use tracing::debug;

/// How the keys of one map are written.
enum KeyMode {
    /// Keys of a convertible declared type always go in the `key` attribute.
    Attribute,
    /// String keys go in the attribute, anything else in a key `item`.
    Erased,
    /// Keys are written as a key `item`.
    Element,
}

/// The bean XML writer.
pub struct Serializer<'o> {
    output: String,
    options: &'o BeanXmlOptions,
    indent_unit: String,
    cache: TypeNameCache,
}

impl<'o> Serializer<'o> {
    pub fn new(options: &'o BeanXmlOptions) -> Self {
        Serializer {
            output: String::with_capacity(1024),
            options,
            indent_unit: options.indent_unit(),
            cache: TypeNameCache::new(None),
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes `bean` as a complete document and returns it.
    ///
    /// # Errors
    ///
    /// Fails on the first value that cannot be written; no partial output is returned.
    pub fn write(mut self, bean: &dyn Bean) -> Result<String> {
        let meta = bean.meta_bean();
        let root_type = self.options.root_type;
        if root_type {
            self.cache.set_base(meta.module_path());
        }
        debug!(
            root = meta.name(),
            root_type,
            pretty = self.options.is_pretty(),
            "writing bean document"
        );

        self.output.push_str(format::HEADER);
        self.newline();
        self.output.push('<');
        self.output.push_str(BEAN);
        if root_type {
            format::push_attribute(&mut self.output, TYPE, meta.name())?;
        }
        self.output.push('>');
        self.newline();
        self.write_properties(bean, 1)?;
        self.output.push_str("</");
        self.output.push_str(BEAN);
        self.output.push('>');
        self.newline();

        debug!(bytes = self.output.len(), "wrote bean document");
        Ok(self.into_inner())
    }

    #[inline]
    fn newline(&mut self) {
        self.output.push_str(&self.options.newline);
    }

    #[inline]
    fn push_indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.output.push_str(&self.indent_unit);
        }
    }

    fn open_tag(&mut self, depth: usize, tag: &str, attrs: &str) {
        self.push_indent(depth);
        self.output.push('<');
        self.output.push_str(tag);
        self.output.push_str(attrs);
    }

    fn close_tag(&mut self, depth: usize, tag: &str) {
        self.push_indent(depth);
        self.output.push_str("</");
        self.output.push_str(tag);
        self.output.push('>');
        self.newline();
    }

    fn empty_tag(&mut self, depth: usize, tag: &str, attrs: &str) {
        self.open_tag(depth, tag, attrs);
        self.output.push_str("/>");
        self.newline();
    }

    /// Writes every non-null serializable property; returns `true` if any was written.
    fn write_properties(&mut self, bean: &dyn Bean, depth: usize) -> Result<bool> {
        let meta = bean.meta_bean();
        let mut wrote = false;
        for property in meta.properties() {
            if !property.style().is_serializable() {
                continue;
            }
            let value = property.get(bean)?;
            if value.is_null() {
                continue;
            }
            if !format::is_name(property.name()) {
                return Err(Error::invalid_name(property.name()));
            }
            wrote = true;
            self.write_value(
                depth,
                property.name(),
                String::new(),
                &property.generic_type(),
                &value,
            )?;
        }
        Ok(wrote)
    }

    fn write_value(
        &mut self,
        depth: usize,
        tag: &str,
        mut attrs: String,
        declared: &GenericType,
        value: &Value,
    ) -> Result<()> {
        match value {
            Value::Null => {
                format::push_attribute(&mut attrs, NULL, "true")?;
                self.empty_tag(depth, tag, &attrs);
                Ok(())
            }
            Value::Bean(bean) => {
                let runtime = TypeRef::Bean(bean.type_name());
                if self.options.converter.is_convertible(&runtime) {
                    self.write_simple(depth, tag, attrs, declared, value)
                } else {
                    self.write_bean(depth, tag, attrs, &declared.raw, bean)
                }
            }
            _ => {
                let args: &[GenericType] = match value.type_ref() {
                    Some(runtime) if runtime.is_collection() && runtime == declared.raw => {
                        &declared.args
                    }
                    _ => &[],
                };
                let options = self.options;
                match options.adapter.cursor(value, args)? {
                    Some(cursor) => {
                        if args.is_empty() {
                            format::push_attribute(
                                &mut attrs,
                                METATYPE,
                                cursor.meta_type().name(),
                            )?;
                        }
                        self.write_elements(depth, tag, attrs, cursor)
                    }
                    None => self.write_simple(depth, tag, attrs, declared, value),
                }
            }
        }
    }

    fn write_bean(
        &mut self,
        depth: usize,
        tag: &str,
        mut attrs: String,
        declared: &TypeRef,
        bean: &BeanBox,
    ) -> Result<()> {
        let runtime = TypeRef::Bean(bean.type_name());
        if *declared != runtime {
            let name = self.cache.encode(&runtime);
            format::push_attribute(&mut attrs, TYPE, name)?;
        }
        self.open_tag(depth, tag, &attrs);
        let insert_point = self.output.len();
        self.output.push('>');
        self.newline();
        if self.write_properties(&**bean, depth + 1)? {
            self.close_tag(depth, tag);
        } else {
            self.output.truncate(insert_point);
            self.output.push_str("/>");
            self.newline();
        }
        Ok(())
    }

    fn write_elements(
        &mut self,
        depth: usize,
        tag: &str,
        attrs: String,
        cursor: Cursor<'_>,
    ) -> Result<()> {
        if cursor.size() == 0 {
            self.empty_tag(depth, tag, &attrs);
            return Ok(());
        }
        self.open_tag(depth, tag, &attrs);
        self.output.push('>');
        self.newline();
        self.write_entries(depth + 1, cursor)?;
        self.close_tag(depth, tag);
        Ok(())
    }

    fn write_entries(&mut self, depth: usize, cursor: Cursor<'_>) -> Result<()> {
        let key_type = cursor.key_type().cloned().unwrap_or(GenericType::ANY);
        let value_type = cursor.value_type().clone();
        let map_like = cursor.is_map_like();
        let key_mode = match &key_type.raw {
            TypeRef::Any => KeyMode::Erased,
            raw if self.options.converter.is_convertible(raw) => KeyMode::Attribute,
            TypeRef::Bean(_) => KeyMode::Element,
            raw => {
                return Err(Error::invalid_key(format!(
                    "declared key type {} is neither a bean nor a simple type",
                    raw
                )))
            }
        };

        for entry in cursor {
            let mut attrs = String::with_capacity(32);
            let mut element_key = None;
            if let Some(key) = entry.key {
                let as_attribute = match key_mode {
                    KeyMode::Attribute => true,
                    KeyMode::Erased => key.is_string(),
                    KeyMode::Element => false,
                };
                if as_attribute {
                    let text = self.key_text(&key_type, key)?;
                    format::push_attribute(&mut attrs, KEY, &text)?;
                } else {
                    element_key = Some(key);
                }
            }
            if entry.count != 1 {
                format::push_attribute(&mut attrs, COUNT, &entry.count.to_string())?;
            }
            match element_key {
                Some(key) => {
                    self.open_tag(depth, ENTRY, &attrs);
                    self.output.push('>');
                    self.newline();
                    self.write_value(depth + 1, ITEM, String::new(), &key_type, key)?;
                    self.write_value(depth + 1, ITEM, String::new(), &value_type, &entry.value)?;
                    self.close_tag(depth, ENTRY);
                }
                None => {
                    let tag = if map_like { ENTRY } else { ITEM };
                    self.write_value(depth, tag, attrs, &value_type, &entry.value)?;
                }
            }
        }
        Ok(())
    }

    fn key_text(&self, declared: &GenericType, key: &Value) -> Result<String> {
        if let (TypeRef::Leaf(_) | TypeRef::Bean(_), Some(runtime)) =
            (&declared.raw, key.type_ref())
        {
            if runtime != declared.raw {
                return Err(Error::conversion(
                    declared.raw.full_name(),
                    runtime.full_name(),
                    "map key does not match the declared key type",
                ));
            }
        }
        if key.is_bean() && !declared.raw.is_bean() {
            return Err(Error::invalid_key(format!(
                "bean key {} cannot be written as an attribute",
                key.type_name()
            )));
        }
        self.options.converter.convert_to_string(key)
    }

    fn write_simple(
        &mut self,
        depth: usize,
        tag: &str,
        mut attrs: String,
        declared: &GenericType,
        value: &Value,
    ) -> Result<()> {
        let runtime = value
            .type_ref()
            .ok_or_else(|| Error::conversion(declared.raw.full_name(), "null", "null leaf value"))?;
        match &declared.raw {
            TypeRef::Any => {
                if !value.is_string() {
                    let name = self.cache.encode(&runtime);
                    format::push_attribute(&mut attrs, TYPE, name)?;
                }
            }
            raw if !self.options.converter.is_convertible(raw) => {
                let name = self.cache.encode(&runtime);
                format::push_attribute(&mut attrs, TYPE, name)?;
            }
            raw => {
                if *raw != runtime {
                    return Err(Error::conversion(
                        raw.full_name(),
                        runtime.full_name(),
                        "value does not match the declared type",
                    ));
                }
            }
        }
        let text = self.options.converter.convert_to_string(value)?;
        self.open_tag(depth, tag, &attrs);
        self.output.push('>');
        format::escape_text(&text, &mut self.output)?;
        self.output.push_str("</");
        self.output.push_str(tag);
        self.output.push('>');
        self.newline();
        Ok(())
    }
}
