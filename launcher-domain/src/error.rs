//! Error types for the launcher domain layer.

use launcher_core::CoreError;
use thiserror::Error;

/// A general Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// The primary error type for the domain layer.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Favorites(#[from] FavoritesError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Domain error: {0}")]
    Other(String),
}

/// Failures of the durable key-value layer.
///
/// Sources are kept as strings so the error stays `Clone`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("Persistence I/O failed during '{operation}' for key '{key}': {message}")]
    Io {
        operation: String,
        key: String,
        message: String,
    },

    #[error("Failed to serialize value for key '{key}': {message}")]
    Serialization { key: String, message: String },

    #[error("Failed to deserialize value for key '{key}': {message}")]
    Deserialization { key: String, message: String },
}

impl PersistenceError {
    pub fn io(operation: impl Into<String>, key: impl Into<String>, core_error: &CoreError) -> Self {
        PersistenceError::Io {
            operation: operation.into(),
            key: key.into(),
            message: core_error.to_string(),
        }
    }

    pub fn serialization(key: impl Into<String>, source: impl std::fmt::Display) -> Self {
        PersistenceError::Serialization {
            key: key.into(),
            message: source.to_string(),
        }
    }

    pub fn deserialization(key: impl Into<String>, source: impl std::fmt::Display) -> Self {
        PersistenceError::Deserialization {
            key: key.into(),
            message: source.to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FavoritesError {
    #[error("Invalid favorite: {0}")]
    InvalidFavorite(String),

    #[error("Failed to persist favorites: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Failed to persist settings: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Failures reported by host platform collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Platform query failed: {0}")]
    QueryFailed(String),

    #[error("Failed to register platform listener: {0}")]
    ListenerRegistration(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::path::PathBuf;

    #[test]
    fn test_persistence_error_io_keeps_core_message() {
        let core = CoreError::Filesystem {
            message: "write failed".to_string(),
            path: PathBuf::from("/data/favorites_list"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let err = PersistenceError::io("put", "favorites_list", &core);
        let display = err.to_string();
        assert!(display.contains("'put'"));
        assert!(display.contains("favorites_list"));
        assert!(display.contains("write failed"));
    }

    #[test]
    fn test_domain_error_is_transparent_over_favorites() {
        let err: DomainError = FavoritesError::InvalidFavorite("blank label".to_string()).into();
        assert_eq!(err.to_string(), "Invalid favorite: blank label");
    }

    #[test]
    fn test_favorites_error_source_is_persistence() {
        let err = FavoritesError::from(PersistenceError::serialization("favorites_list", "bad"));
        assert!(err.source().unwrap().is::<PersistenceError>());
    }
}
