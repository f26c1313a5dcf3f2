//! Parsing and validation of `resforge.toml` task configuration files.
//!
//! This crate reads the task configuration file and produces a strongly-typed
//! [`TaskConfig`]. [`resolve_task`] then anchors every relative path at the
//! project directory and parses the textual settings into a [`ResolvedTask`]
//! ready to be merged with command-line overrides.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_task, ResolvedStronglyTyped, ResolvedTask};
pub use types::*;
