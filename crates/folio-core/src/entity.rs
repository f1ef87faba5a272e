//! The identified entity abstraction.

use crate::codec::XmlCodec;
use crate::error::Result;
use crate::id::EntityId;
use crate::identity::Identity;
use crate::node::Element;
use crate::properties::{Properties, PropertyValue};

/// Element and property name of the identifier.
pub const ID: &str = "Id";

/// An object with an identifier, identity-based equality and an XML
/// round-trip contract.
pub trait Entity: Identity + XmlCodec + Properties {
    type Id: EntityId;

    fn id(&self) -> &Self::Id;

    fn set_id(&mut self, id: Self::Id);

    /// Returns `true` while the identifier is still the unset sentinel.
    fn is_transient(&self) -> bool {
        self.id().is_unset()
    }
}

/// Writes the `Id` element, omitted when the identifier is unset.
pub fn write_id<I: EntityId>(node: &mut Element, id: &I) {
    node.push_leaf_opt(ID, id.to_text().as_deref());
}

/// Reads the `Id` element; a missing element is the unset sentinel.
pub fn read_id<I: EntityId>(node: &Element) -> Result<I> {
    match node.child_text(ID) {
        Some(text) => I::parse_text(ID, text),
        None => Ok(I::default()),
    }
}

/// Converts an `Id` property value.
pub fn id_property<I: EntityId>(value: PropertyValue) -> Result<I> {
    I::from_value(ID, value)
}
