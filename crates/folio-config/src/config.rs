//! Configuration types and loading for the folio system.
//!
//! The main entry point is [`FolioConfig`], which represents the contents of
//! a `folio.yaml` file. Configuration is loaded with [`load_config`] and saved
//! with [`save_config`].

use std::path::Path;

use folio_core::properties::UnknownKeys;
use folio_core::xml::WriteOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// XML output section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlConfig {
    /// Spaces per nesting level; `0` writes compact single-line documents.
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Whether documents start with an `<?xml ...?>` declaration.
    #[serde(default)]
    pub declaration: bool,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            declaration: false,
        }
    }
}

fn default_indent() -> usize {
    2
}

/// Property-bag construction section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PropertiesConfig {
    /// Treatment of bag keys an entity does not know: `ignore` | `reject`.
    #[serde(default, rename = "unknown-keys")]
    pub unknown_keys: UnknownKeys,
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full folio configuration, corresponding to `folio.yaml`.
///
/// Every field has a serde default, so a partial file fills the rest in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FolioConfig {
    #[serde(default)]
    pub xml: XmlConfig,

    #[serde(default)]
    pub properties: PropertiesConfig,
}

impl FolioConfig {
    /// Options for rendering XML text documents.
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            indent: self.xml.indent,
            declaration: self.xml.declaration,
        }
    }

    /// Policy for unknown property-bag keys.
    pub fn unknown_keys(&self) -> UnknownKeys {
        self.properties.unknown_keys
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from the given file.
///
/// If the file does not exist or is empty, a default [`FolioConfig`] is
/// returned.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
/// or [`ConfigError::ParseError`] if it contains invalid YAML.
pub fn load_config(path: &Path) -> Result<FolioConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(FolioConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(FolioConfig::default());
    }

    let config: FolioConfig = serde_yaml::from_str(&content)?;
    debug!(path = %path.display(), indent = config.xml.indent, "loaded config");
    Ok(config)
}

/// Save configuration to the given file, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] on I/O failure or
/// [`ConfigError::ParseError`] if serialization fails.
pub fn save_config(path: &Path, config: &FolioConfig) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
