//! Field validation rules shared by entity setters.

use crate::error::{EntityError, Result};

/// Validates a required text value: it must be present and non-empty.
///
/// An absent value yields [`EntityError::InvalidArgument`], an empty one
/// [`EntityError::InvalidValue`].
pub fn required_text(name: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(text) => non_empty(name, text),
        None => Err(EntityError::missing(name)),
    }
}

/// Validates that a text value is non-empty.
pub fn non_empty(name: &str, value: String) -> Result<String> {
    if value.is_empty() {
        return Err(EntityError::invalid(name, "must not be empty"));
    }
    Ok(value)
}

/// Checks that a required text field has been set. An empty value means the
/// field was never assigned and yields [`EntityError::InvalidArgument`].
pub fn filled(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(EntityError::missing(name));
    }
    Ok(())
}

/// Validates that a mandatory value is present.
pub fn required<T>(name: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| EntityError::missing(name))
}
