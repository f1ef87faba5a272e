//! Entity error types.

/// Error raised while constructing, mutating or parsing an entity.
///
/// Every violation aborts the current operation and is returned to the
/// caller unchanged; nothing is retried or recovered internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    /// A value that is mandatory was absent (missing XML node, missing
    /// property bag, missing required field).
    #[error("{name} is required")]
    InvalidArgument {
        /// The field or argument that was missing.
        name: String,
    },

    /// A value was present but empty or malformed.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue {
        /// The field or argument that was rejected.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result alias for entity operations.
pub type Result<T> = std::result::Result<T, EntityError>;

impl EntityError {
    /// Creates an [`EntityError::InvalidArgument`] for a missing value.
    pub fn missing(name: impl Into<String>) -> Self {
        Self::InvalidArgument { name: name.into() }
    }

    /// Creates an [`EntityError::InvalidValue`] for a rejected value.
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidArgument { name } | Self::InvalidValue { name, .. } => name,
        }
    }

    /// Returns `true` for [`EntityError::InvalidArgument`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
