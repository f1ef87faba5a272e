//! The XML codec contract.
//!
//! Each entity type writes and reads its own fields. A subtype composes its
//! codec from its ancestor's: it calls the ancestor's `write_fields` first and
//! then appends its own elements, and it reconstructs ancestor state by
//! handing the same node to the ancestor's `read_fields`. Readers look up
//! only the element names they own, so a subtype node is a valid superset of
//! its ancestor's node.
//!
//! Field order within a node: identifier, ancestor fields, own scalar
//! fields, then nested entities and collections.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{EntityError, Result};
use crate::format;
use crate::node::Element;
use crate::xml::{self, WriteOptions};

/// Per-type XML serialization satisfying the round-trip law:
/// `T::from_xml(Some(&value.to_xml()))` equals `value`.
pub trait XmlCodec: Sized {
    /// Element name of the type's root node.
    const TAG: &'static str;

    /// Appends this value's elements (ancestor elements first) to `node`.
    fn write_fields(&self, node: &mut Element);

    /// Reconstructs a value from the elements of `node`.
    fn read_fields(node: &Element) -> Result<Self>;

    /// Serializes to an element named [`XmlCodec::TAG`].
    fn to_xml(&self) -> Element {
        self.to_xml_as(Self::TAG)
    }

    /// Serializes to an element with a caller-chosen name, for embedding
    /// under a field name such as `Parent`.
    fn to_xml_as(&self, name: &str) -> Element {
        let mut node = Element::new(name);
        self.write_fields(&mut node);
        node
    }

    /// Parses a value. An absent node fails with
    /// [`EntityError::InvalidArgument`].
    fn from_xml(node: Option<&Element>) -> Result<Self> {
        let node = node.ok_or_else(|| EntityError::missing("xml"))?;
        Self::read_fields(node)
    }
}

/// Serializes a value to XML text.
pub fn to_xml_string<T: XmlCodec>(value: &T, options: &WriteOptions) -> xml::Result<String> {
    xml::to_string(&value.to_xml(), options)
}

/// Parses a value from XML text.
pub fn from_xml_str<T: XmlCodec>(input: &str) -> xml::Result<T> {
    let root = xml::from_str(input)?;
    Ok(T::from_xml(Some(&root))?)
}

// -- element readers --------------------------------------------------------

/// Reads a required text element: missing is `InvalidArgument`, empty is
/// `InvalidValue`.
pub fn required_text(node: &Element, name: &str) -> Result<String> {
    let text = node.child_text(name).ok_or_else(|| EntityError::missing(name))?;
    if text.is_empty() {
        return Err(EntityError::invalid(name, "must not be empty"));
    }
    Ok(text.to_owned())
}

/// Reads an optional text element. A missing element is `None`; an empty
/// element is `Some("")`.
pub fn optional_text(node: &Element, name: &str) -> Option<String> {
    node.child_text(name).map(str::to_owned)
}

/// Reads a required element parsed with [`FromStr`].
pub fn required_parse<T>(node: &Element, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let text = node.child_text(name).ok_or_else(|| EntityError::missing(name))?;
    parse_text(name, text)
}

/// Reads an optional element parsed with [`FromStr`].
pub fn optional_parse<T>(node: &Element, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    node.child_text(name)
        .map(|text| parse_text(name, text))
        .transpose()
}

fn parse_text<T>(name: &str, text: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.trim()
        .parse()
        .map_err(|e| EntityError::invalid(name, format!("{text:?}: {e}")))
}

/// Reads an optional RFC 1123 timestamp element.
pub fn optional_instant(node: &Element, name: &str) -> Result<Option<DateTime<Utc>>> {
    node.child_text(name)
        .map(|text| format::parse_instant(name, text))
        .transpose()
}

/// Reads a required base64 payload element.
pub fn required_bytes(node: &Element, name: &str) -> Result<Vec<u8>> {
    let text = node.child_text(name).ok_or_else(|| EntityError::missing(name))?;
    format::decode_bytes(name, text)
}

/// Reads a required nested entity stored under `name`.
pub fn required_entity<T: XmlCodec>(node: &Element, name: &str) -> Result<T> {
    let child = node.child(name).ok_or_else(|| EntityError::missing(name))?;
    T::read_fields(child)
}

/// Reads an optional nested entity stored under `name`.
pub fn optional_entity<T: XmlCodec>(node: &Element, name: &str) -> Result<Option<T>> {
    node.child(name).map(T::read_fields).transpose()
}

/// Reads a collection stored as a wrapper element whose children are
/// entities. A missing wrapper is an empty collection.
pub fn entity_list<T: XmlCodec>(node: &Element, name: &str) -> Result<Vec<T>> {
    match node.child(name) {
        Some(list) => list.children().iter().map(T::read_fields).collect(),
        None => Ok(Vec::new()),
    }
}

// -- element writers --------------------------------------------------------

/// Appends a timestamp element.
pub fn push_instant(node: &mut Element, name: &str, instant: &DateTime<Utc>) {
    node.push_leaf(name, format::format_instant(instant));
}

/// Appends a collection wrapper, omitted when the collection is empty.
pub fn push_entity_list<'a, T, I>(node: &mut Element, name: &str, items: I)
where
    T: XmlCodec + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut list = Element::new(name);
    for item in items {
        list.push(item.to_xml());
    }
    if !list.is_leaf() {
        node.push(list);
    }
}
