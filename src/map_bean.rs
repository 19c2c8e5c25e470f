//! A fully dynamic, map-backed bean.
//!
//! [`MapBean`] stores properties in an [`IndexMap`] so that they serialize in
//! insertion order. Its schema is produced on demand from the current keys,
//! each key being an `Any` property, and reading accepts any property name.
//!
//! ## Examples
//!
//! ```rust
//! use beanxml::{MapBean, Value};
//!
//! let mut bean = MapBean::new();
//! bean.insert("name", Value::from("Alice"));
//! bean.insert("age", Value::from(30));
//!
//! let xml = beanxml::to_string(&bean).unwrap();
//! assert!(xml.contains("<name>Alice</name><age type=\"i32\">30</age>"));
//! ```

use crate::bean::{Bean, BeanBox, BeanBuilder, MetaBean, MetaProperty};
use crate::{Result, Value};
use indexmap::IndexMap;
use std::sync::{Arc, OnceLock};

/// An ordered map of property names to values that acts as a bean.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapBean(IndexMap<String, Value>);

fn builder_factory(_: &Arc<MetaBean>) -> Box<dyn BeanBuilder> {
    Box::new(MapBean::new())
}

impl MapBean {
    /// The registered type name.
    pub const META_NAME: &'static str = "beanxml::MapBean";

    #[must_use]
    pub fn new() -> Self {
        MapBean(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        MapBean(IndexMap::with_capacity(capacity))
    }

    /// The schema used to resolve `beanxml::MapBean` while reading.
    #[must_use]
    pub fn meta() -> Arc<MetaBean> {
        static META: OnceLock<Arc<MetaBean>> = OnceLock::new();
        META.get_or_init(|| {
            Arc::new(MetaBean::dynamic(
                Self::META_NAME,
                std::iter::empty::<String>(),
                builder_factory,
            ))
        })
        .clone()
    }

    /// Inserts a property, returning the previous value of that name.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl Bean for MapBean {
    fn meta_bean(&self) -> Arc<MetaBean> {
        if self.0.is_empty() {
            return Self::meta();
        }
        Arc::new(MetaBean::dynamic(
            Self::META_NAME,
            self.0.keys().cloned(),
            builder_factory,
        ))
    }

    fn type_name(&self) -> &'static str {
        Self::META_NAME
    }

    fn property_value(&self, name: &str) -> Option<Value> {
        self.0.get(name).cloned()
    }
}

impl BeanBuilder for MapBean {
    fn set(&mut self, property: &MetaProperty, value: Value) -> Result<()> {
        self.0.insert(property.name().to_string(), value);
        Ok(())
    }

    fn build(self: Box<Self>) -> Result<BeanBox> {
        Ok(BeanBox::new(*self))
    }
}

impl IntoIterator for MapBean {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapBean {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        MapBean(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<MapBean> for Value {
    fn from(bean: MapBean) -> Self {
        Value::Bean(BeanBox::new(bean))
    }
}
