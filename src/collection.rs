//! Collection shapes and the single-pass cursor used to write them.
//!
//! A [`Collection`] is one of six container shapes. The writer never inspects
//! a collection directly: it asks a [`CollectionAdapter`] for a [`Cursor`],
//! which reports the declared key and value types and yields one [`Entry`]
//! per slot. The reader goes the other way through a [`CollectionBuilder`].

use crate::types::{GenericType, TypeRef};
use crate::{Error, Result, Value};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// The shape of a container, written as the `metatype` attribute when the
/// shape cannot be inferred from the declared type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetaType {
    List,
    Set,
    Map,
    Multiset,
    Array,
    Table,
}

impl MetaType {
    pub const ALL: [MetaType; 6] = [
        MetaType::List,
        MetaType::Set,
        MetaType::Map,
        MetaType::Multiset,
        MetaType::Array,
        MetaType::Table,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            MetaType::List => "List",
            MetaType::Set => "Set",
            MetaType::Map => "Map",
            MetaType::Multiset => "Multiset",
            MetaType::Array => "Array",
            MetaType::Table => "Table",
        }
    }

    /// Parses a meta-type tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanxml::collection::MetaType;
    ///
    /// assert_eq!(MetaType::parse("Multiset"), Some(MetaType::Multiset));
    /// assert_eq!(MetaType::parse("Bag"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<MetaType> {
        Self::ALL.into_iter().find(|meta| meta.name() == name)
    }

    /// Map-like shapes are enumerated as keyed `entry` elements.
    #[inline]
    #[must_use]
    pub const fn is_map_like(self) -> bool {
        matches!(self, MetaType::Map)
    }

    /// Resolves the declared key and value types from generic arguments.
    ///
    /// Erased arguments resolve to `Any`. Table cells are carried in row
    /// sequences, so the value type of a table is a list of its cell type.
    #[must_use]
    pub fn declared_types(self, args: &[GenericType]) -> (Option<GenericType>, GenericType) {
        let arg = |i: usize| args.get(i).cloned().unwrap_or(GenericType::ANY);
        match self {
            MetaType::Map => (Some(arg(0)), arg(1)),
            MetaType::Table => (None, GenericType::list(arg(0))),
            MetaType::List | MetaType::Set | MetaType::Multiset | MetaType::Array => (None, arg(0)),
        }
    }
}

impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An owned container value.
///
/// Sets, maps and multisets keep insertion order for output but compare
/// without regard to order.
///
/// Unordered shapes are plain vectors searched linearly, since [`Value`]
/// holds doubles and has no `Hash` or `Ord`. Building or comparing one with
/// `n` entries costs O(n²) comparisons; that is fine for bean-sized data
/// but large sets and maps should be read into a `List` instead.
#[derive(Clone, Debug)]
pub enum Collection {
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    /// Distinct elements with their occurrence counts.
    Multiset(Vec<(Value, u32)>),
    Array(Vec<Value>),
    /// Rows of cells.
    Table(Vec<Vec<Value>>),
}

impl Collection {
    /// An empty collection of the given shape.
    #[must_use]
    pub fn empty(meta: MetaType) -> Self {
        match meta {
            MetaType::List => Collection::List(Vec::new()),
            MetaType::Set => Collection::Set(Vec::new()),
            MetaType::Map => Collection::Map(Vec::new()),
            MetaType::Multiset => Collection::Multiset(Vec::new()),
            MetaType::Array => Collection::Array(Vec::new()),
            MetaType::Table => Collection::Table(Vec::new()),
        }
    }

    /// Builds a set, keeping the first of any equal elements.
    ///
    /// Duplicates are found by linear search, so this is quadratic in the
    /// number of values.
    #[must_use]
    pub fn set_from(values: Vec<Value>) -> Self {
        let mut set: Vec<Value> = Vec::with_capacity(values.len());
        for value in values {
            if !set.contains(&value) {
                set.push(value);
            }
        }
        Collection::Set(set)
    }

    /// Builds a map; a later entry replaces the value of an equal key.
    ///
    /// Keys are matched by linear search, so this is quadratic in the
    /// number of entries.
    #[must_use]
    pub fn map_from(entries: Vec<(Value, Value)>) -> Self {
        let mut map: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match map.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => map.push((key, value)),
            }
        }
        Collection::Map(map)
    }

    /// Builds a multiset, summing the counts of equal elements.
    ///
    /// Elements are matched by linear search, like [`Collection::set_from`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanxml::collection::Collection;
    /// use beanxml::Value;
    ///
    /// let bag = Collection::multiset_from(vec![
    ///     (Value::from("a"), 2),
    ///     (Value::from("b"), 1),
    ///     (Value::from("a"), 1),
    /// ]);
    /// assert_eq!(bag.count_of(&Value::from("a")), 3);
    /// assert_eq!(bag.len(), 2);
    /// ```
    #[must_use]
    pub fn multiset_from(entries: Vec<(Value, u32)>) -> Self {
        let mut bag: Vec<(Value, u32)> = Vec::with_capacity(entries.len());
        for (value, count) in entries {
            if count == 0 {
                continue;
            }
            match bag.iter_mut().find(|(v, _)| *v == value) {
                Some(slot) => slot.1 = slot.1.saturating_add(count),
                None => bag.push((value, count)),
            }
        }
        Collection::Multiset(bag)
    }

    #[must_use]
    pub fn meta_type(&self) -> MetaType {
        match self {
            Collection::List(_) => MetaType::List,
            Collection::Set(_) => MetaType::Set,
            Collection::Map(_) => MetaType::Map,
            Collection::Multiset(_) => MetaType::Multiset,
            Collection::Array(_) => MetaType::Array,
            Collection::Table(_) => MetaType::Table,
        }
    }

    /// Number of entries a cursor over this collection yields.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Collection::List(v) | Collection::Set(v) | Collection::Array(v) => v.len(),
            Collection::Map(m) => m.len(),
            Collection::Multiset(m) => m.len(),
            Collection::Table(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occurrences of `value`; 0 or 1 for shapes other than multisets.
    #[must_use]
    pub fn count_of(&self, value: &Value) -> u32 {
        match self {
            Collection::Multiset(bag) => bag
                .iter()
                .find(|(v, _)| v == value)
                .map_or(0, |(_, count)| *count),
            Collection::List(v) | Collection::Set(v) | Collection::Array(v) => {
                u32::from(v.contains(value))
            }
            Collection::Map(m) => u32::from(m.iter().any(|(k, _)| k == value)),
            Collection::Table(_) => 0,
        }
    }

    /// Looks up a map value by key.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        match self {
            Collection::Map(m) => m.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

fn same_elements(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().all(|value| b.contains(value))
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Collection::List(a), Collection::List(b)) => a == b,
            (Collection::Array(a), Collection::Array(b)) => a == b,
            (Collection::Table(a), Collection::Table(b)) => a == b,
            (Collection::Set(a), Collection::Set(b)) => same_elements(a, b),
            (Collection::Map(a), Collection::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, value)| {
                        b.iter().any(|(other_key, other_value)| {
                            key == other_key && value == other_value
                        })
                    })
            }
            (Collection::Multiset(a), Collection::Multiset(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(value, count)| {
                        b.iter().any(|(other, other_count)| value == other && count == other_count)
                    })
            }
            _ => false,
        }
    }
}

impl Serialize for Collection {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Collection::List(values) | Collection::Set(values) | Collection::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Collection::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Collection::Multiset(entries) => {
                let mut seq = serializer.serialize_seq(Some(entries.len()))?;
                for (value, count) in entries {
                    seq.serialize_element(&(value, count))?;
                }
                seq.end()
            }
            Collection::Table(rows) => {
                let mut seq = serializer.serialize_seq(Some(rows.len()))?;
                for row in rows {
                    seq.serialize_element(row)?;
                }
                seq.end()
            }
        }
    }
}

/// One slot yielded by a [`Cursor`].
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<'a> {
    /// Present for map-like shapes.
    pub key: Option<&'a Value>,
    pub value: Cow<'a, Value>,
    /// Repetition count; greater than 1 only for multisets.
    pub count: u32,
}

/// A single-pass enumeration over the entries of one collection value.
///
/// A cursor cannot be rewound; ask the adapter again to iterate twice.
pub struct Cursor<'a> {
    meta_type: MetaType,
    key_type: Option<GenericType>,
    value_type: GenericType,
    size: usize,
    entries: Box<dyn Iterator<Item = Entry<'a>> + 'a>,
}

impl<'a> Cursor<'a> {
    pub fn new(
        meta_type: MetaType,
        args: &[GenericType],
        size: usize,
        entries: Box<dyn Iterator<Item = Entry<'a>> + 'a>,
    ) -> Self {
        let (key_type, value_type) = meta_type.declared_types(args);
        Cursor {
            meta_type,
            key_type,
            value_type,
            size,
            entries,
        }
    }

    #[inline]
    #[must_use]
    pub fn meta_type(&self) -> MetaType {
        self.meta_type
    }

    #[inline]
    #[must_use]
    pub fn is_map_like(&self) -> bool {
        self.meta_type.is_map_like()
    }

    /// The declared key type, `None` for sequence-like shapes.
    #[inline]
    #[must_use]
    pub fn key_type(&self) -> Option<&GenericType> {
        self.key_type.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn value_type(&self) -> &GenericType {
        &self.value_type
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("meta_type", &self.meta_type)
            .field("key_type", &self.key_type)
            .field("value_type", &self.value_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Recognizes container values and produces cursors over them.
pub trait CollectionAdapter: Send + Sync {
    /// Returns `Ok(None)` if `value` is not a container.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidKey`] if a key or multiset element is itself a container.
    fn cursor<'a>(&self, value: &'a Value, args: &[GenericType]) -> Result<Option<Cursor<'a>>>;
}

/// Adapter over the built-in [`Collection`] shapes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCollectionAdapter;

fn check_key_type(declared: &GenericType) -> Result<()> {
    if let TypeRef::Collection(meta) = declared.raw {
        return Err(Error::invalid_key(format!(
            "declared key type {} is a container",
            meta
        )));
    }
    Ok(())
}

fn check_key(key: &Value) -> Result<()> {
    match key {
        Value::Collection(c) => Err(Error::invalid_key(format!(
            "container {} cannot be used as a key",
            c.meta_type()
        ))),
        Value::Null => Err(Error::invalid_key("null cannot be used as a key")),
        _ => Ok(()),
    }
}

fn items<'a>(values: &'a [Value]) -> Box<dyn Iterator<Item = Entry<'a>> + 'a> {
    Box::new(values.iter().map(|value| Entry {
        key: None,
        value: Cow::Borrowed(value),
        count: 1,
    }))
}

impl CollectionAdapter for DefaultCollectionAdapter {
    fn cursor<'a>(&self, value: &'a Value, args: &[GenericType]) -> Result<Option<Cursor<'a>>> {
        let collection = match value {
            Value::Collection(collection) => collection,
            _ => return Ok(None),
        };
        let meta = collection.meta_type();
        let size = collection.len();
        let entries: Box<dyn Iterator<Item = Entry<'a>> + 'a> = match collection {
            Collection::List(values) | Collection::Set(values) | Collection::Array(values) => {
                items(values)
            }
            Collection::Map(entries) => {
                if let Some(key_type) = meta.declared_types(args).0 {
                    check_key_type(&key_type)?;
                }
                for (key, _) in entries {
                    check_key(key)?;
                }
                Box::new(entries.iter().map(|(key, value)| Entry {
                    key: Some(key),
                    value: Cow::Borrowed(value),
                    count: 1,
                }))
            }
            Collection::Multiset(entries) => {
                check_key_type(&meta.declared_types(args).1)?;
                for (element, _) in entries {
                    check_key(element)?;
                }
                Box::new(entries.iter().map(|(element, count)| Entry {
                    key: None,
                    value: Cow::Borrowed(element),
                    count: *count,
                }))
            }
            Collection::Table(rows) => Box::new(rows.iter().map(|row| Entry {
                key: None,
                value: Cow::Owned(Value::list(row.clone())),
                count: 1,
            })),
        };
        Ok(Some(Cursor::new(meta, args, size, entries)))
    }
}

/// Accumulates entries read from a document into a [`Collection`].
///
/// Each keyed or set entry is checked against those already added, so
/// filling an unordered shape is quadratic in its size.
#[derive(Debug)]
pub struct CollectionBuilder {
    collection: Collection,
}

impl CollectionBuilder {
    #[must_use]
    pub fn new(meta: MetaType) -> Self {
        CollectionBuilder {
            collection: Collection::empty(meta),
        }
    }

    #[must_use]
    pub fn meta_type(&self) -> MetaType {
        self.collection.meta_type()
    }

    /// Adds an element to a sequence-like collection.
    ///
    /// # Errors
    ///
    /// Fails for a count other than 1 outside a multiset, for a map (which
    /// needs a key), and for a table row that is not a list.
    pub fn push(&mut self, value: Value, count: u32) -> Result<()> {
        let meta = self.meta_type();
        if count != 1 && meta != MetaType::Multiset {
            return Err(Error::custom(format!("count {} is not valid in a {}", count, meta)));
        }
        match &mut self.collection {
            Collection::List(values) | Collection::Array(values) => values.push(value),
            Collection::Set(values) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            Collection::Multiset(bag) => {
                check_key(&value)?;
                if count == 0 {
                    return Err(Error::custom("multiset count must be positive"));
                }
                match bag.iter_mut().find(|(v, _)| *v == value) {
                    Some(slot) => slot.1 = slot.1.saturating_add(count),
                    None => bag.push((value, count)),
                }
            }
            Collection::Table(rows) => match value {
                Value::Collection(Collection::List(row)) => rows.push(row),
                other => {
                    return Err(Error::custom(format!(
                        "table row must be a list, found {}",
                        other.type_name()
                    )))
                }
            },
            Collection::Map(_) => return Err(Error::invalid_key("map entry has no key")),
        }
        Ok(())
    }

    /// Adds a keyed entry to a map; an equal key is replaced.
    ///
    /// # Errors
    ///
    /// Fails if the collection is not a map, the count is not 1, or the key is a container.
    pub fn insert(&mut self, key: Value, value: Value, count: u32) -> Result<()> {
        check_key(&key)?;
        if count != 1 {
            return Err(Error::custom(format!("count {} is not valid in a Map", count)));
        }
        match &mut self.collection {
            Collection::Map(entries) => {
                match entries.iter_mut().find(|(k, _)| *k == key) {
                    Some(slot) => slot.1 = value,
                    None => entries.push((key, value)),
                }
                Ok(())
            }
            other => Err(Error::custom(format!(
                "keyed entry is not valid in a {}",
                other.meta_type()
            ))),
        }
    }

    #[must_use]
    pub fn build(self) -> Collection {
        self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_map_ignore_order() {
        let a = Collection::set_from(vec![Value::from(1), Value::from(2)]);
        let b = Collection::set_from(vec![Value::from(2), Value::from(1), Value::from(2)]);
        assert_eq!(a, b);
        assert_eq!(b.len(), 2);

        let m1 = Collection::map_from(vec![
            (Value::from("a"), Value::from(1)),
            (Value::from("b"), Value::from(2)),
        ]);
        let m2 = Collection::map_from(vec![
            (Value::from("b"), Value::from(2)),
            (Value::from("a"), Value::from(1)),
        ]);
        assert_eq!(m1, m2);
        assert_ne!(
            Collection::List(vec![Value::from(1), Value::from(2)]),
            Collection::List(vec![Value::from(2), Value::from(1)])
        );
    }

    #[test]
    fn test_map_later_key_wins() {
        let map = Collection::map_from(vec![
            (Value::from("a"), Value::from(1)),
            (Value::from("a"), Value::from(9)),
        ]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&Value::from("a")), Some(&Value::from(9)));
    }

    #[test]
    fn test_cursor_reports_declared_types() {
        let value = Value::map(vec![(Value::from("k"), Value::from(1))]);
        let args = [GenericType::STRING, GenericType::INT];
        let cursor = DefaultCollectionAdapter.cursor(&value, &args).unwrap().unwrap();
        assert!(cursor.is_map_like());
        assert_eq!(cursor.key_type(), Some(&GenericType::STRING));
        assert_eq!(cursor.value_type(), &GenericType::INT);
        assert_eq!(cursor.size(), 1);
        let entries: Vec<_> = cursor.collect();
        assert_eq!(entries[0].key, Some(&Value::from("k")));
        assert_eq!(entries[0].count, 1);
    }

    #[test]
    fn test_erased_cursor_is_any() {
        let value = Value::list(vec![Value::from(1)]);
        let cursor = DefaultCollectionAdapter.cursor(&value, &[]).unwrap().unwrap();
        assert_eq!(cursor.key_type(), None);
        assert_eq!(cursor.value_type(), &GenericType::ANY);
    }

    #[test]
    fn test_non_collection_has_no_cursor() {
        let value = Value::from("leaf");
        assert!(DefaultCollectionAdapter.cursor(&value, &[]).unwrap().is_none());
    }

    #[test]
    fn test_empty_cursor() {
        let value = Value::Collection(Collection::empty(MetaType::Set));
        let mut cursor = DefaultCollectionAdapter.cursor(&value, &[]).unwrap().unwrap();
        assert_eq!(cursor.size(), 0);
        assert_eq!(cursor.meta_type(), MetaType::Set);
        assert!(cursor.next().is_none());
    }

    #[test]
    fn test_container_key_rejected() {
        let value = Value::map(vec![(Value::list(vec![]), Value::from(1))]);
        let err = DefaultCollectionAdapter.cursor(&value, &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));

        let value = Value::map(vec![]);
        let args = [GenericType::list(GenericType::INT), GenericType::INT];
        assert!(DefaultCollectionAdapter.cursor(&value, &args).is_err());
    }

    #[test]
    fn test_table_rows_are_lists() {
        let value = Value::Collection(Collection::Table(vec![
            vec![Value::from(1), Value::from(2)],
            vec![Value::from(3)],
        ]));
        let cursor = DefaultCollectionAdapter
            .cursor(&value, &[GenericType::INT])
            .unwrap()
            .unwrap();
        assert_eq!(cursor.value_type(), &GenericType::list(GenericType::INT));
        let rows: Vec<_> = cursor.map(|entry| entry.value.into_owned()).collect();
        assert_eq!(rows[1], Value::list(vec![Value::from(3)]));
    }

    #[test]
    fn test_builder_multiset_counts() {
        let mut builder = CollectionBuilder::new(MetaType::Multiset);
        builder.push(Value::from("x"), 3).unwrap();
        builder.push(Value::from("x"), 1).unwrap();
        let bag = builder.build();
        assert_eq!(bag.count_of(&Value::from("x")), 4);
    }

    #[test]
    fn test_builder_rejects_count_outside_multiset() {
        let mut builder = CollectionBuilder::new(MetaType::List);
        assert!(builder.push(Value::from(1), 2).is_err());
        let mut builder = CollectionBuilder::new(MetaType::Map);
        assert!(builder.push(Value::from(1), 1).is_err());
        assert!(builder.insert(Value::from(1), Value::Null, 1).is_ok());
    }

    #[test]
    fn test_serialize_map_to_json() {
        let value = Value::map(vec![(Value::from("a"), Value::from(true))]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "{\"a\":true}");
    }
}
