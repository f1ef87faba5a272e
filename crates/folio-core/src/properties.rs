//! Construction from a loosely typed property bag.
//!
//! A [`PropertyBag`] maps field names to [`PropertyValue`]s. Applying a bag
//! walks its entries in insertion order and routes each one through the
//! entity's [`Properties::set_property`], which calls the same validated
//! setter ordinary code uses. Setter errors are returned as-is.
//!
//! Application is not transactional: if a later entry fails, entries
//! applied before it stay applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{EntityError, Result};
use crate::format;

/// A loosely typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Bytes(Vec<u8>),
    Instant(DateTime<Utc>),
    /// Properties of a nested entity.
    Bag(PropertyBag),
    /// Elements of a collection field.
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Short name of the value's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Instant(_) => "instant",
            Self::Bag(_) => "bag",
            Self::List(_) => "list",
        }
    }

    fn mismatch(&self, name: &str, expected: &str) -> EntityError {
        EntityError::invalid(name, format!("expected {expected}, got {}", self.kind()))
    }

    /// Converts to optional text; `Null` clears.
    pub fn into_text(self, name: &str) -> Result<Option<String>> {
        match self {
            Self::Null => Ok(None),
            Self::Text(text) => Ok(Some(text)),
            other => Err(other.mismatch(name, "text")),
        }
    }

    /// Converts to required text; `Null` is `InvalidArgument`.
    pub fn into_required_text(self, name: &str) -> Result<String> {
        self.into_text(name)?.ok_or_else(|| EntityError::missing(name))
    }

    pub fn into_bool(self, name: &str) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(b),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| EntityError::invalid(name, format!("{text:?} is not a boolean"))),
            Self::Null => Err(EntityError::missing(name)),
            other => Err(other.mismatch(name, "bool")),
        }
    }

    pub fn into_int(self, name: &str) -> Result<i64> {
        match self {
            Self::Int(n) => Ok(n),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| EntityError::invalid(name, format!("{text:?} is not an integer"))),
            Self::Null => Err(EntityError::missing(name)),
            other => Err(other.mismatch(name, "integer")),
        }
    }

    /// Converts to an instant; text is parsed as RFC 1123.
    pub fn into_instant(self, name: &str) -> Result<DateTime<Utc>> {
        match self {
            Self::Instant(t) => Ok(t),
            Self::Text(text) => format::parse_instant(name, &text),
            Self::Null => Err(EntityError::missing(name)),
            other => Err(other.mismatch(name, "instant")),
        }
    }

    /// Converts to bytes; text is decoded as base64.
    pub fn into_bytes(self, name: &str) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Text(text) => format::decode_bytes(name, &text),
            Self::Null => Err(EntityError::missing(name)),
            other => Err(other.mismatch(name, "bytes")),
        }
    }

    /// Converts to an optional nested bag; `Null` clears.
    pub fn into_bag(self, name: &str) -> Result<Option<PropertyBag>> {
        match self {
            Self::Null => Ok(None),
            Self::Bag(bag) => Ok(Some(bag)),
            other => Err(other.mismatch(name, "bag")),
        }
    }

    /// Converts to collection elements; `Null` is empty.
    pub fn into_list(self, name: &str) -> Result<Vec<PropertyValue>> {
        match self {
            Self::Null => Ok(Vec::new()),
            Self::List(items) => Ok(items),
            other => Err(other.mismatch(name, "list")),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<u32> for PropertyValue {
    fn from(n: u32) -> Self {
        Self::Int(n.into())
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Instant(t)
    }
}

impl From<PropertyBag> for PropertyValue {
    fn from(bag: PropertyBag) -> Self {
        Self::Bag(bag)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(items: Vec<PropertyValue>) -> Self {
        Self::List(items)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Text(n.to_string()),
            },
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Bag(map.into_iter().collect()),
        }
    }
}

/// An ordered mapping from field names to values.
///
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`PropertyBag::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (name, value) in iter {
            bag.insert(name, value);
        }
        bag
    }
}

impl IntoIterator for PropertyBag {
    type Item = (String, PropertyValue);
    type IntoIter = std::vec::IntoIter<(String, PropertyValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl TryFrom<serde_json::Value> for PropertyBag {
    type Error = EntityError;

    /// Only JSON objects convert; any other shape is `InvalidArgument`.
    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            _ => Err(EntityError::missing("properties")),
        }
    }
}

/// How [`apply`] treats names the entity does not recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    /// Skip unknown names, so callers may pass supersets.
    #[default]
    Ignore,
    /// Fail with `InvalidValue` naming the key.
    Reject,
}

/// Outcome of routing one property to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Applied,
    Unknown,
}

/// Entities that accept named property assignments.
///
/// Implementations match their own field names, call the matching validated
/// setter, and hand any other name to their ancestor. The root of the chain
/// answers [`Assignment::Unknown`].
pub trait Properties {
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<Assignment>;

    /// Checks that every required field has been assigned. Called on values
    /// built from nested bags, which start from `Default` and may leave
    /// required fields unset.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Applies every entry of `bag` to `entity`, in order.
///
/// An absent bag fails with `InvalidArgument`.
pub fn apply<E: Properties + ?Sized>(
    entity: &mut E,
    bag: Option<&PropertyBag>,
    unknown: UnknownKeys,
) -> Result<()> {
    let bag = bag.ok_or_else(|| EntityError::missing("properties"))?;
    for (name, value) in bag.iter() {
        if entity.set_property(name, value.clone())? == Assignment::Unknown {
            match unknown {
                UnknownKeys::Ignore => trace!(property = name, "ignoring unknown property"),
                UnknownKeys::Reject => return Err(EntityError::invalid(name, "unknown property")),
            }
        }
    }
    Ok(())
}

/// Builds a default entity and applies `bag` to it.
pub fn construct<E: Properties + Default>(bag: Option<&PropertyBag>, unknown: UnknownKeys) -> Result<E> {
    let mut entity = E::default();
    apply(&mut entity, bag, unknown)?;
    Ok(entity)
}

/// Builds a nested entity from `bag` and checks its required fields.
///
/// Nested bags always ignore unknown names.
pub fn construct_nested<E: Properties + Default>(bag: &PropertyBag) -> Result<E> {
    let entity: E = construct(Some(bag), UnknownKeys::Ignore)?;
    entity.validate()?;
    Ok(entity)
}
