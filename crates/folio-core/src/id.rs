//! Identifier kinds.
//!
//! Entity families pick their own identifier representation: numeric
//! surrogate keys (`i64`, where `0` means unset) or externally assigned
//! string keys (`Option<String>`, where `None` means unset). Both render to
//! the same `Id` element text and are parsed back by the codec.

use std::fmt;
use std::hash::Hash;

use crate::error::{EntityError, Result};
use crate::properties::PropertyValue;

/// An entity identifier with an explicit "unset" sentinel.
///
/// `Default` must produce the sentinel: a freshly constructed entity never
/// carries a generated identifier.
pub trait EntityId: Clone + Default + PartialEq + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Returns `true` if this is the unset sentinel.
    fn is_unset(&self) -> bool;

    /// Returns the textual form, or `None` for the sentinel.
    fn to_text(&self) -> Option<String>;

    /// Parses the textual form written by [`EntityId::to_text`].
    fn parse_text(name: &str, text: &str) -> Result<Self>;

    /// Converts a loosely typed property value. `Null` resets to the sentinel.
    fn from_value(name: &str, value: PropertyValue) -> Result<Self>;
}

impl EntityId for i64 {
    fn is_unset(&self) -> bool {
        *self == 0
    }

    fn to_text(&self) -> Option<String> {
        (*self != 0).then(|| self.to_string())
    }

    fn parse_text(name: &str, text: &str) -> Result<Self> {
        text.trim()
            .parse()
            .map_err(|e| EntityError::invalid(name, format!("{text:?} is not a numeric id: {e}")))
    }

    fn from_value(name: &str, value: PropertyValue) -> Result<Self> {
        match value {
            PropertyValue::Null => Ok(0),
            PropertyValue::Int(n) => Ok(n),
            PropertyValue::Text(text) => Self::parse_text(name, &text),
            other => Err(EntityError::invalid(
                name,
                format!("expected a numeric id, got {}", other.kind()),
            )),
        }
    }
}

impl EntityId for Option<String> {
    fn is_unset(&self) -> bool {
        self.is_none()
    }

    fn to_text(&self) -> Option<String> {
        self.clone()
    }

    fn parse_text(name: &str, text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(EntityError::invalid(name, "must not be empty"));
        }
        Ok(Some(text.to_owned()))
    }

    fn from_value(name: &str, value: PropertyValue) -> Result<Self> {
        match value {
            PropertyValue::Null => Ok(None),
            PropertyValue::Text(text) => Self::parse_text(name, &text),
            other => Err(EntityError::invalid(
                name,
                format!("expected a string id, got {}", other.kind()),
            )),
        }
    }
}
