//! # beanxml
//!
//! An introspection-driven object graph serializer with a compact,
//! self-describing XML wire format.
//!
//! ## What does it do?
//!
//! Any type that exposes a schema ([`MetaBean`]) and named property values
//! ([`Bean`]) can be written to XML and read back. Type information is only
//! written where the reader could not recover it from the declared types:
//!
//! - a `type` attribute when a bean's runtime type differs from the declared
//!   property type, or when a leaf value sits in an untyped position;
//! - a `metatype` attribute when a collection's shape or generic arguments
//!   are not known from the declaration;
//! - type names are shortened against the root bean's namespace and a table
//!   of short aliases, and spelled the same way throughout one document.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::{Arc, OnceLock};
//! use beanxml::{
//!     from_str, to_string_pretty, Bean, BeanBox, BeanBuilder, BeanXmlOptions, GenericType,
//!     MetaBean, MetaProperty, Result, Value,
//! };
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Address {
//!     street: Option<String>,
//!     tags: Vec<Value>,
//! }
//!
//! fn address_meta() -> Arc<MetaBean> {
//!     static META: OnceLock<Arc<MetaBean>> = OnceLock::new();
//!     META.get_or_init(|| {
//!         Arc::new(MetaBean::new(
//!             "shop::Address",
//!             [
//!                 MetaProperty::new("street", GenericType::STRING),
//!                 MetaProperty::new("tags", GenericType::list(GenericType::STRING)),
//!             ],
//!             |_| Box::new(Address::default()),
//!         ).unwrap())
//!     }).clone()
//! }
//!
//! impl Bean for Address {
//!     fn meta_bean(&self) -> Arc<MetaBean> { address_meta() }
//!     fn property_value(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "street" => Some(self.street.clone().into()),
//!             "tags" => Some(Value::list(self.tags.clone())),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl BeanBuilder for Address {
//!     fn set(&mut self, property: &MetaProperty, value: Value) -> Result<()> {
//!         match (property.name(), value) {
//!             ("street", Value::String(s)) => self.street = Some(s),
//!             ("tags", Value::Collection(beanxml::Collection::List(items))) => self.tags = items,
//!             (name, _) => return Err(beanxml::Error::custom(format!("bad value for {}", name))),
//!         }
//!         Ok(())
//!     }
//!     fn build(self: Box<Self>) -> Result<BeanBox> { Ok(BeanBox::new(*self)) }
//! }
//!
//! let address = Address {
//!     street: Some("Park Lane".to_string()),
//!     tags: vec![Value::from("home"), Value::Null],
//! };
//!
//! let xml = to_string_pretty(&address).unwrap();
//! assert_eq!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
//! <bean type=\"shop::Address\">
//!  <street>Park Lane</street>
//!  <tags>
//!   <item>home</item>
//!   <item null=\"true\"/>
//!  </tags>
//! </bean>
//! ");
//!
//! let options = BeanXmlOptions::default().with_type(address_meta());
//! let back = from_str(&xml, &options).unwrap();
//! assert_eq!(back.downcast::<Address>().unwrap(), address);
//! ```
//!
//! ## Modules
//!
//! - [`bean`]: the bean capability and schemas
//! - [`collection`]: collection shapes, cursors and the collection adapter
//! - [`convert`]: leaf string conversion
//! - [`encoder`]: type name shortening
//! - [`format`]: wire-format vocabulary and escaping
//! - [`ser`] / [`de`]: the writer and the reader

pub mod bean;
pub mod collection;
pub mod convert;
pub mod de;
pub mod encoder;
pub mod error;
pub mod format;
pub mod macros;
pub mod map_bean;
pub mod options;
pub mod registry;
pub mod ser;
pub mod types;
pub mod value;

pub use bean::{Bean, BeanBox, BeanBuilder, MetaBean, MetaProperty, PropertyStyle};
pub use collection::{Collection, CollectionAdapter, MetaType};
pub use convert::{DefaultConverter, StringConverter};
pub use de::Deserializer;
pub use error::{Error, ErrorKind, Result};
pub use map_bean::MapBean;
pub use options::BeanXmlOptions;
pub use registry::TypeRegistry;
pub use ser::Serializer;
pub use types::{GenericType, LeafType, TypeRef};
pub use value::Value;

use std::io;
use std::sync::Arc;

/// Writes a bean as a compact XML document.
///
/// # Errors
///
/// Returns an error if any value in the graph cannot be written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(bean: &dyn Bean) -> Result<String> {
    to_string_with_options(bean, &BeanXmlOptions::default())
}

/// Writes a bean as an indented XML document.
///
/// # Errors
///
/// Returns an error if any value in the graph cannot be written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty(bean: &dyn Bean) -> Result<String> {
    to_string_with_options(bean, &BeanXmlOptions::pretty())
}

/// Writes a bean with custom options.
///
/// # Examples
///
/// ```rust
/// use beanxml::{map_bean, to_string_with_options, BeanXmlOptions};
///
/// let bean = map_bean! { "name" => "Alice" };
/// let options = BeanXmlOptions::new().with_root_type(false);
/// let xml = to_string_with_options(&bean, &options).unwrap();
/// assert!(xml.ends_with("<bean><name>Alice</name></bean>"));
/// ```
///
/// # Errors
///
/// Returns an error if any value in the graph cannot be written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(bean: &dyn Bean, options: &BeanXmlOptions) -> Result<String> {
    Serializer::new(options).write(bean)
}

/// Writes a bean to an I/O stream.
///
/// # Errors
///
/// Returns an error if writing the document or the stream fails.
pub fn to_writer<W>(mut writer: W, bean: &dyn Bean, options: &BeanXmlOptions) -> Result<()>
where
    W: io::Write,
{
    let xml = to_string_with_options(bean, options)?;
    writer
        .write_all(xml.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Reads a document whose root element names its type.
///
/// Every bean type in the document must be registered in `options`.
///
/// # Errors
///
/// Returns an error for malformed XML, unknown types or properties, and
/// values that cannot be converted.
pub fn from_str(input: &str, options: &BeanXmlOptions) -> Result<BeanBox> {
    de::read_document(input, options, None)
}

/// Reads a document as a bean of type `meta`; the root `type` attribute,
/// if present, takes precedence.
///
/// # Errors
///
/// Returns an error for malformed XML, unknown types or properties, and
/// values that cannot be converted.
pub fn from_str_as(input: &str, options: &BeanXmlOptions, meta: &Arc<MetaBean>) -> Result<BeanBox> {
    de::read_document(input, options, Some(meta))
}

/// Reads a document from UTF-8 bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not UTF-8 or the document cannot be read.
pub fn from_slice(input: &[u8], options: &BeanXmlOptions) -> Result<BeanBox> {
    let s = std::str::from_utf8(input).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s, options)
}

/// Reads a document from an I/O stream.
///
/// # Errors
///
/// Returns an error if reading the stream fails or the document cannot be read.
pub fn from_reader<R>(mut reader: R, options: &BeanXmlOptions) -> Result<BeanBox>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string, options)
}
