//! The bean value model.
//!
//! Any object that wants to be written or read participates through the
//! [`Bean`] capability: it exposes a shared [`MetaBean`] (the schema) and a
//! value for each named property. Reading goes through a [`BeanBuilder`]
//! created by the schema, so immutable beans never expose setters.
//!
//! ## Examples
//!
//! ```rust
//! use std::sync::{Arc, OnceLock};
//! use beanxml::{Bean, BeanBox, BeanBuilder, GenericType, MetaBean, MetaProperty, Result, Value};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! fn point_meta() -> Arc<MetaBean> {
//!     static META: OnceLock<Arc<MetaBean>> = OnceLock::new();
//!     META.get_or_init(|| {
//!         Arc::new(MetaBean::new(
//!             "demo::Point",
//!             [
//!                 MetaProperty::new("x", GenericType::INT),
//!                 MetaProperty::new("y", GenericType::INT),
//!             ],
//!             |_| Box::new(Point::default()),
//!         ).unwrap())
//!     }).clone()
//! }
//!
//! impl Bean for Point {
//!     fn meta_bean(&self) -> Arc<MetaBean> { point_meta() }
//!     fn property_value(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "x" => Some(Value::Int(self.x)),
//!             "y" => Some(Value::Int(self.y)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl BeanBuilder for Point {
//!     fn set(&mut self, property: &MetaProperty, value: Value) -> Result<()> {
//!         match property.name() {
//!             "x" => self.x = i32::try_from(value)?,
//!             _ => self.y = i32::try_from(value)?,
//!         }
//!         Ok(())
//!     }
//!     fn build(self: Box<Self>) -> Result<BeanBox> { Ok(BeanBox::new(*self)) }
//! }
//!
//! let point = Point { x: 1, y: 2 };
//! let xml = beanxml::to_string(&point).unwrap();
//! assert!(xml.contains("<x>1</x><y>2</y>"));
//! ```

use crate::format;
use crate::types::{GenericType, TypeRef};
use crate::{Error, Result, Value};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// How a property may be accessed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PropertyStyle {
    #[default]
    ReadWrite,
    ReadOnly,
    WriteOnly,
    /// Readable, and settable only through the builder.
    Immutable,
    /// Computed from other properties; readable, never set.
    Derived,
}

impl PropertyStyle {
    #[inline]
    #[must_use]
    pub const fn is_readable(self) -> bool {
        !matches!(self, PropertyStyle::WriteOnly)
    }

    /// Returns `true` if a builder accepts values for this property.
    #[inline]
    #[must_use]
    pub const fn is_buildable(self) -> bool {
        matches!(
            self,
            PropertyStyle::ReadWrite | PropertyStyle::WriteOnly | PropertyStyle::Immutable
        )
    }

    /// Returns `true` if the property is emitted when writing.
    #[inline]
    #[must_use]
    pub const fn is_serializable(self) -> bool {
        self.is_readable()
    }
}

/// Metadata for one named property of a bean type.
#[derive(Clone, Debug, PartialEq)]
pub struct MetaProperty {
    name: String,
    property_type: TypeRef,
    type_args: Vec<GenericType>,
    style: PropertyStyle,
}

impl MetaProperty {
    /// Creates a read-write property of the given declared type.
    pub fn new(name: impl Into<String>, declared: GenericType) -> Self {
        MetaProperty {
            name: name.into(),
            property_type: declared.raw,
            type_args: declared.args,
            style: PropertyStyle::default(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: PropertyStyle) -> Self {
        self.style = style;
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn property_type(&self) -> &TypeRef {
        &self.property_type
    }

    /// The captured generic arguments, empty if erased.
    #[inline]
    #[must_use]
    pub fn type_args(&self) -> &[GenericType] {
        &self.type_args
    }

    #[inline]
    #[must_use]
    pub fn style(&self) -> PropertyStyle {
        self.style
    }

    /// The declared type together with its arguments.
    #[must_use]
    pub fn generic_type(&self) -> GenericType {
        GenericType {
            raw: self.property_type.clone(),
            args: self.type_args.clone(),
        }
    }

    /// Reads this property from `bean`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProperty`] if the bean does not expose the property.
    pub fn get(&self, bean: &dyn Bean) -> Result<Value> {
        bean.property_value(&self.name).ok_or_else(|| {
            Error::unknown_property(bean.meta_bean().name(), &self.name)
        })
    }
}

/// Creates the builder used to reconstruct a bean of a given schema.
pub type BuilderFactory = fn(&Arc<MetaBean>) -> Box<dyn BeanBuilder>;

/// The schema of a bean type, shared by all instances.
pub struct MetaBean {
    name: &'static str,
    properties: IndexMap<String, MetaProperty>,
    dynamic: bool,
    factory: BuilderFactory,
}

impl MetaBean {
    /// Creates a fixed schema.
    ///
    /// # Errors
    ///
    /// Fails if the name is not a `::` qualified path, a property name is not
    /// a valid element name, or two properties share a name.
    pub fn new(
        name: &'static str,
        properties: impl IntoIterator<Item = MetaProperty>,
        factory: BuilderFactory,
    ) -> Result<Self> {
        validate_type_name(name)?;
        let mut map = IndexMap::new();
        for property in properties {
            if !format::is_name(property.name()) {
                return Err(Error::invalid_name(property.name()));
            }
            if map.contains_key(property.name()) {
                return Err(Error::duplicate_property(name, property.name()));
            }
            map.insert(property.name.clone(), property);
        }
        Ok(MetaBean {
            name,
            properties: map,
            dynamic: false,
            factory,
        })
    }

    /// Creates a dynamic schema: every listed name is an `Any` property and
    /// any other name is accepted on read.
    pub fn dynamic<I, S>(name: &'static str, names: I, factory: BuilderFactory) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let properties = names
            .into_iter()
            .map(|n| {
                let property = MetaProperty::new(n, GenericType::ANY);
                (property.name.clone(), property)
            })
            .collect();
        MetaBean {
            name,
            properties,
            dynamic: true,
            factory,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The namespace of this type including the trailing `::`, if any.
    #[must_use]
    pub fn module_path(&self) -> Option<&'static str> {
        self.name.rfind("::").map(|idx| &self.name[..idx + 2])
    }

    #[inline]
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Iterates properties in declared order.
    pub fn properties(&self) -> impl Iterator<Item = &MetaProperty> {
        self.properties.values()
    }

    #[inline]
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Looks up a property. Dynamic schemas answer for any name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<Cow<'_, MetaProperty>> {
        match self.properties.get(name) {
            Some(property) => Some(Cow::Borrowed(property)),
            None if self.dynamic => Some(Cow::Owned(MetaProperty::new(name, GenericType::ANY))),
            None => None,
        }
    }

    /// Creates a builder for a new instance of this type.
    #[must_use]
    pub fn create_builder(self: &Arc<Self>) -> Box<dyn BeanBuilder> {
        (self.factory)(self)
    }
}

impl fmt::Debug for MetaBean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaBean")
            .field("name", &self.name)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .field("dynamic", &self.dynamic)
            .finish()
    }
}

fn validate_type_name(name: &str) -> Result<()> {
    let valid = name.contains("::") && name.split("::").all(|segment| !segment.is_empty());
    if valid {
        Ok(())
    } else {
        Err(Error::unsupported_type(&format!(
            "bean type name must be a qualified path: {}",
            name
        )))
    }
}

/// Object-safe plumbing every [`Bean`] gets for free when it is `Clone`.
pub trait DynBean {
    fn clone_bean(&self) -> Box<dyn Bean>;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Bean + Clone> DynBean for T {
    fn clone_bean(&self) -> Box<dyn Bean> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A property-bearing object.
pub trait Bean: DynBean + Send + Sync + 'static {
    /// The schema of this bean's type.
    fn meta_bean(&self) -> Arc<MetaBean>;

    /// The current value of a property, or `None` if there is no such property.
    fn property_value(&self, name: &str) -> Option<Value>;

    /// The fully qualified type name, without building the schema.
    fn type_name(&self) -> &'static str {
        self.meta_bean().name()
    }
}

/// Receives property values while a bean is being read.
pub trait BeanBuilder {
    fn set(&mut self, property: &MetaProperty, value: Value) -> Result<()>;

    fn build(self: Box<Self>) -> Result<BeanBox>;
}

/// An owned, type-erased bean.
pub struct BeanBox(Box<dyn Bean>);

impl BeanBox {
    pub fn new<B: Bean>(bean: B) -> Self {
        BeanBox(Box::new(bean))
    }

    #[must_use]
    pub fn from_box(bean: Box<dyn Bean>) -> Self {
        BeanBox(bean)
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    #[must_use]
    pub fn downcast_ref<T: Bean>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Unwraps the concrete bean.
    ///
    /// # Errors
    ///
    /// Fails if the bean is not a `T`.
    pub fn downcast<T: Bean>(self) -> Result<T> {
        let found = self.type_name();
        self.0
            .into_any()
            .downcast::<T>()
            .map(|bean| *bean)
            .map_err(|_| Error::custom(format!("unexpected bean type {}", found)))
    }
}

impl Deref for BeanBox {
    type Target = dyn Bean;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl Clone for BeanBox {
    fn clone(&self) -> Self {
        BeanBox(self.0.clone_bean())
    }
}

impl PartialEq for BeanBox {
    fn eq(&self, other: &Self) -> bool {
        beans_equal(&*self.0, &*other.0)
    }
}

impl fmt::Debug for BeanBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = self.0.meta_bean();
        let mut out = f.debug_struct(meta.name());
        for property in meta.properties() {
            let value = self.0.property_value(property.name()).unwrap_or_default();
            out.field(property.name(), &value);
        }
        out.finish()
    }
}

impl Serialize for BeanBox {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let meta = self.0.meta_bean();
        let mut map = serializer.serialize_map(None)?;
        for property in meta.properties() {
            if !property.style().is_serializable() {
                continue;
            }
            match self.0.property_value(property.name()) {
                None | Some(Value::Null) => {}
                Some(value) => map.serialize_entry(property.name(), &value)?,
            }
        }
        map.end()
    }
}

/// Compares two beans by type name and property values, treating an absent
/// property as null.
#[must_use]
pub fn beans_equal(a: &dyn Bean, b: &dyn Bean) -> bool {
    if a.type_name() != b.type_name() {
        return false;
    }
    let meta_a = a.meta_bean();
    let meta_b = b.meta_bean();
    let names = meta_a
        .properties()
        .chain(meta_b.properties())
        .map(MetaProperty::name);
    for name in names {
        let left = a.property_value(name).unwrap_or_default();
        let right = b.property_value(name).unwrap_or_default();
        if left != right {
            return false;
        }
    }
    true
}
