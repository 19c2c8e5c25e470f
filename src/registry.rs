//! Lookup of bean schemas by type name.
//!
//! The reader only sees type names, so every bean type that may appear in a
//! document must be registered here before reading. [`MapBean`] is always
//! present.

use crate::bean::MetaBean;
use crate::MapBean;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// A set of known bean schemas, keyed by fully qualified name.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    types: HashMap<&'static str, Arc<MetaBean>>,
}

impl TypeRegistry {
    /// Creates a registry holding only [`MapBean`].
    #[must_use]
    pub fn new() -> Self {
        let mut registry = TypeRegistry {
            types: HashMap::new(),
        };
        registry.register(MapBean::meta());
        registry
    }

    /// Registers a schema, replacing any previous one of the same name.
    pub fn register(&mut self, meta: Arc<MetaBean>) {
        trace!(name = meta.name(), "registering bean type");
        self.types.insert(meta.name(), meta);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<MetaBean>> {
        self.types.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
