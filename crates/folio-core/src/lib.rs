//! Entity base layer for the folio system.
//!
//! This crate provides the machinery shared by every domain entity:
//! identifiers ([`id`], [`entity`]), construction from loosely typed property
//! bags ([`properties`]), identity-based equality and hashing ([`identity`]),
//! XML round-tripping ([`codec`], [`node`], [`xml`]) and the generic
//! self-referential [`category`] tree.

pub mod category;
pub mod codec;
pub mod entity;
pub mod error;
pub mod format;
pub mod id;
pub mod identity;
pub mod node;
pub mod properties;
pub mod validation;
pub mod xml;

pub use category::{Categorized, Category, CategoryKind};
pub use codec::XmlCodec;
pub use entity::Entity;
pub use error::{EntityError, Result};
pub use id::EntityId;
pub use identity::{FieldValue, Identity, IdentityField};
pub use node::Element;
pub use properties::{Properties, PropertyBag, PropertyValue, UnknownKeys};
