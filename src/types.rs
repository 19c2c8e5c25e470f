//! Declared and runtime type descriptions.
//!
//! - [`TypeRef`]: a concrete, non-generic type identity (a leaf type, a bean
//!   type, a collection shape, or the erased "any" type).
//! - [`GenericType`]: a [`TypeRef`] together with its captured type arguments,
//!   such as `Map<String, List<i32>>`. An empty argument list means the
//!   arguments were erased.

use crate::collection::MetaType;
use std::fmt;

/// Leaf types with a built-in string conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeafType {
    String,
    Bool,
    Char,
    Int,
    Long,
    Double,
    DateTime,
    BigInt,
}

impl LeafType {
    pub const ALL: [LeafType; 8] = [
        LeafType::String,
        LeafType::Bool,
        LeafType::Char,
        LeafType::Int,
        LeafType::Long,
        LeafType::Double,
        LeafType::DateTime,
        LeafType::BigInt,
    ];

    /// Returns the fully qualified type name.
    #[must_use]
    pub const fn full_name(self) -> &'static str {
        match self {
            LeafType::String => "alloc::string::String",
            LeafType::Bool => "bool",
            LeafType::Char => "char",
            LeafType::Int => "i32",
            LeafType::Long => "i64",
            LeafType::Double => "f64",
            LeafType::DateTime => "chrono::DateTime<chrono::Utc>",
            LeafType::BigInt => "num_bigint::BigInt",
        }
    }

    /// Returns the well-known short alias.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            LeafType::String => "String",
            LeafType::Bool => "bool",
            LeafType::Char => "char",
            LeafType::Int => "i32",
            LeafType::Long => "i64",
            LeafType::Double => "f64",
            LeafType::DateTime => "DateTime",
            LeafType::BigInt => "BigInt",
        }
    }

    /// Looks up a leaf type by its full name.
    #[must_use]
    pub fn from_full_name(name: &str) -> Option<LeafType> {
        Self::ALL.into_iter().find(|leaf| leaf.full_name() == name)
    }

    /// Looks up a leaf type by its short alias.
    #[must_use]
    pub fn from_short_name(name: &str) -> Option<LeafType> {
        Self::ALL.into_iter().find(|leaf| leaf.short_name() == name)
    }
}

/// A concrete type identity, without type arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// The fully erased type: any value may appear.
    Any,
    Leaf(LeafType),
    /// A bean type, by fully qualified name.
    Bean(&'static str),
    Collection(MetaType),
}

impl TypeRef {
    /// Returns the fully qualified name of the type.
    #[must_use]
    pub fn full_name(&self) -> &str {
        match self {
            TypeRef::Any => "any",
            TypeRef::Leaf(leaf) => leaf.full_name(),
            TypeRef::Bean(name) => name,
            TypeRef::Collection(meta) => meta.name(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, TypeRef::Any)
    }

    #[inline]
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, TypeRef::Collection(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bean(&self) -> bool {
        matches!(self, TypeRef::Bean(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

/// A type with its captured generic arguments.
///
/// # Examples
///
/// ```rust
/// use beanxml::{GenericType, TypeRef};
/// use beanxml::collection::MetaType;
///
/// let ty = GenericType::map(GenericType::STRING, GenericType::list(GenericType::INT));
/// assert_eq!(ty.raw, TypeRef::Collection(MetaType::Map));
/// assert_eq!(ty.to_string(), "Map<alloc::string::String, List<i32>>");
/// assert!(!ty.is_erased());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenericType {
    pub raw: TypeRef,
    pub args: Vec<GenericType>,
}

impl GenericType {
    pub const ANY: GenericType = GenericType::of(TypeRef::Any);
    pub const STRING: GenericType = GenericType::leaf(LeafType::String);
    pub const BOOL: GenericType = GenericType::leaf(LeafType::Bool);
    pub const CHAR: GenericType = GenericType::leaf(LeafType::Char);
    pub const INT: GenericType = GenericType::leaf(LeafType::Int);
    pub const LONG: GenericType = GenericType::leaf(LeafType::Long);
    pub const DOUBLE: GenericType = GenericType::leaf(LeafType::Double);
    pub const DATE_TIME: GenericType = GenericType::leaf(LeafType::DateTime);
    pub const BIG_INT: GenericType = GenericType::leaf(LeafType::BigInt);

    /// A type without arguments.
    #[must_use]
    pub const fn of(raw: TypeRef) -> Self {
        GenericType {
            raw,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub const fn leaf(leaf: LeafType) -> Self {
        Self::of(TypeRef::Leaf(leaf))
    }

    #[must_use]
    pub const fn bean(name: &'static str) -> Self {
        Self::of(TypeRef::Bean(name))
    }

    /// A collection shape with erased arguments.
    #[must_use]
    pub const fn raw_collection(meta: MetaType) -> Self {
        Self::of(TypeRef::Collection(meta))
    }

    #[must_use]
    pub fn list(element: GenericType) -> Self {
        Self::collection(MetaType::List, vec![element])
    }

    #[must_use]
    pub fn set(element: GenericType) -> Self {
        Self::collection(MetaType::Set, vec![element])
    }

    #[must_use]
    pub fn map(key: GenericType, value: GenericType) -> Self {
        Self::collection(MetaType::Map, vec![key, value])
    }

    #[must_use]
    pub fn multiset(element: GenericType) -> Self {
        Self::collection(MetaType::Multiset, vec![element])
    }

    #[must_use]
    pub fn array(element: GenericType) -> Self {
        Self::collection(MetaType::Array, vec![element])
    }

    #[must_use]
    pub fn table(cell: GenericType) -> Self {
        Self::collection(MetaType::Table, vec![cell])
    }

    fn collection(meta: MetaType, args: Vec<GenericType>) -> Self {
        GenericType {
            raw: TypeRef::Collection(meta),
            args,
        }
    }

    /// Returns `true` if no type arguments were captured.
    #[inline]
    #[must_use]
    pub fn is_erased(&self) -> bool {
        self.args.is_empty()
    }

    /// Returns the argument at `index`, or `Any` if it was erased.
    #[must_use]
    pub fn arg(&self, index: usize) -> GenericType {
        self.args.get(index).cloned().unwrap_or(GenericType::ANY)
    }
}

impl From<TypeRef> for GenericType {
    fn from(raw: TypeRef) -> Self {
        GenericType::of(raw)
    }
}

impl From<LeafType> for GenericType {
    fn from(leaf: LeafType) -> Self {
        GenericType::leaf(leaf)
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}
