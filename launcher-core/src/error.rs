//! Error handling for the launcher core layer.
//!
//! This module defines the error types shared by everything built on top of
//! `launcher-core`. They are declared with `thiserror`.
//!
//! The main error type is [`CoreError`], which wraps the more specific
//! [`ConfigError`] and [`LoggingError`].
//!
//! # Examples
//!
//! ```rust
//! use launcher_core::error::CoreError;
//!
//! fn check_delay(delay_ms: u64) -> Result<(), CoreError> {
//!     if delay_ms == 0 {
//!         return Err(CoreError::InvalidInput("delay must be positive".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_delay(0).is_err());
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for the launcher.
///
/// Higher layers usually wrap this in their own error enum via `#[from]`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised while setting up the logging system.
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    /// Filesystem failures with the path that was being touched.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General I/O errors not covered by other specific variants.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input provided to a function or method.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    /// Catch-all for unexpected internal errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if this error stems from a file or directory that does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            CoreError::Filesystem { source, .. } => source.kind() == io::ErrorKind::NotFound,
            CoreError::Io(source) => source.kind() == io::ErrorKind::NotFound,
            CoreError::Config(ConfigError::ReadError { source, .. }) => {
                source.kind() == io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

/// Error type for configuration-related operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file exists but could not be read.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Parsed values are out of range or inconsistent.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A required base directory (config, data, state) could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for logging-related operations.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The global subscriber could not be installed or the configuration was rejected.
    #[error("Failed to initialize logging: {0}")]
    InitializationFailure(String),

    /// Failed to parse a log filter directive.
    #[error("Failed to set log filter: {0}")]
    FilterError(String),

    /// An I/O error occurred while preparing log output.
    #[error("Logging I/O error: {0}")]
    IoError(#[from] io::Error),
}
