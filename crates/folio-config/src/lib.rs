//! Configuration management for the folio system.
//!
//! This crate loads and saves `folio.yaml` files and converts their settings
//! into the option types understood by `folio-core`.

pub mod config;

pub use config::{ConfigError, FolioConfig, load_config, save_config};
