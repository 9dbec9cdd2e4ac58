//! Parsing and validation of `hashlit.toml` configuration files.
//!
//! The file tunes index construction and literal naming. Every table is
//! optional; a missing file means [`HashlitConfig::default`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
