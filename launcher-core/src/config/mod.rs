//! Configuration management for the launcher core.
//!
//! - [`types`]: the schema ([`CoreConfig`], [`LoggingConfig`], [`LauncherConfig`]).
//! - [`defaults`]: default values used when fields are missing.
//! - [`loader`]: [`ConfigLoader`], which reads, parses and validates `config.toml`.

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{CoreConfig, LauncherConfig, LoggingConfig};
