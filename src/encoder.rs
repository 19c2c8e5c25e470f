//! Type name shortening for `type` attributes.
//!
//! Within one document a type is always spelled the same way: the first
//! encoding of a type is cached and reused. Names are shortened by stripping
//! the base namespace (the root bean's module path, when the root type is
//! written) or by using a well-known alias for leaf types.
//!
//! ## Examples
//!
//! ```rust
//! use beanxml::encoder::TypeNameCache;
//! use beanxml::types::{LeafType, TypeRef};
//!
//! let mut cache = TypeNameCache::new(Some("app::model::"));
//! assert_eq!(cache.encode(&TypeRef::Bean("app::model::Address")), "Address");
//! assert_eq!(cache.encode(&TypeRef::Bean("app::model::geo::Point")), "app::model::geo::Point");
//! assert_eq!(cache.encode(&TypeRef::Leaf(LeafType::String)), "String");
//! ```

use crate::registry::TypeRegistry;
use crate::types::{LeafType, TypeRef};
use std::collections::HashMap;
use tracing::trace;

/// Per-document memo of encoded and decoded type names.
#[derive(Debug, Default)]
pub struct TypeNameCache {
    base: Option<String>,
    encoded: HashMap<TypeRef, String>,
    decoded: HashMap<String, TypeRef>,
}

impl TypeNameCache {
    /// Creates a cache shortening against `base`, which includes the trailing `::`.
    #[must_use]
    pub fn new(base: Option<&str>) -> Self {
        TypeNameCache {
            base: base.map(str::to_string),
            encoded: HashMap::new(),
            decoded: HashMap::new(),
        }
    }

    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Sets the base namespace; only possible before any name was encoded.
    pub fn set_base(&mut self, base: Option<&str>) {
        if self.encoded.is_empty() && self.decoded.is_empty() {
            self.base = base.map(str::to_string);
        }
    }

    /// Returns the name to write for `ty`.
    pub fn encode(&mut self, ty: &TypeRef) -> &str {
        if !self.encoded.contains_key(ty) {
            let name = self.shorten(ty);
            trace!(ty = ty.full_name(), encoded = name.as_str(), "encoded type name");
            self.encoded.insert(ty.clone(), name);
        }
        self.encoded.get(ty).map_or("", String::as_str)
    }

    fn shorten(&self, ty: &TypeRef) -> String {
        let full = ty.full_name();
        if let Some(rest) = self.strip_base(full) {
            return rest.to_string();
        }
        match ty {
            TypeRef::Leaf(leaf) => leaf.short_name().to_string(),
            _ => full.to_string(),
        }
    }

    fn strip_base<'n>(&self, full: &'n str) -> Option<&'n str> {
        let base = self.base.as_deref()?;
        let rest = full.strip_prefix(base)?;
        if rest.is_empty() || rest.contains("::") {
            None
        } else {
            Some(rest)
        }
    }

    /// Resolves a written type name, or `None` if nothing matches.
    pub fn decode(&mut self, name: &str, registry: &TypeRegistry) -> Option<TypeRef> {
        if let Some(ty) = self.decoded.get(name) {
            return Some(ty.clone());
        }
        let ty = self.resolve(name, registry)?;
        trace!(written = name, ty = ty.full_name(), "decoded type name");
        self.decoded.insert(name.to_string(), ty.clone());
        Some(ty)
    }

    fn resolve(&self, name: &str, registry: &TypeRegistry) -> Option<TypeRef> {
        if !name.contains("::") {
            if let Some(base) = self.base.as_deref() {
                let qualified = format!("{}{}", base, name);
                if let Some(meta) = registry.get(&qualified) {
                    return Some(TypeRef::Bean(meta.name()));
                }
            }
            return LeafType::from_short_name(name)
                .or_else(|| LeafType::from_full_name(name))
                .map(TypeRef::Leaf);
        }
        if let Some(leaf) = LeafType::from_full_name(name) {
            return Some(TypeRef::Leaf(leaf));
        }
        registry.get(name).map(|meta| TypeRef::Bean(meta.name()))
    }
}
