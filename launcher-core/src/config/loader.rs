//! Configuration loading for the launcher core.
//!
//! [`ConfigLoader::load`] reads `config.toml` from the application config
//! directory, falls back to defaults when the file does not exist, and then
//! validates the result. Validation normalizes the log level and format,
//! bounds the auto-launch delay and resolves a relative log file path against
//! the application state directory.
//!
//! ```rust,ignore
//! use launcher_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("auto-launch after {} ms", config.launcher.auto_launch_delay_ms),
//!     Err(e) => {
//!         launcher_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration loading failed: {}", e);
//!     }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::defaults::{MAX_AUTO_LAUNCH_DELAY_MS, MIN_AUTO_LAUNCH_DELAY_MS};
use super::CoreConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs as launcher_fs;
use crate::utils::paths::{get_app_config_dir, get_app_state_dir};

/// Name of the configuration file inside the application config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Namespace for loading and validating [`CoreConfig`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `config.toml` from the application config directory.
    ///
    /// A missing or empty file yields the default configuration. Any other
    /// read failure is reported as [`ConfigError::ReadError`].
    pub fn load() -> Result<CoreConfig, CoreError> {
        let config_path = get_app_config_dir()?.join(CONFIG_FILE_NAME);
        Self::load_from_path(&config_path)
    }

    /// Loads and validates the configuration stored at `path`.
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No configuration file at {:?}, using defaults", path);
                String::new()
            }
            Err(e) => {
                return Err(CoreError::Config(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                }));
            }
        };
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<CoreConfig, CoreError> {
        let mut config: CoreConfig = if content.trim().is_empty() {
            CoreConfig::default()
        } else {
            toml::from_str(content).map_err(ConfigError::ParseError)?
        };
        Self::validate_config(&mut config, get_app_state_dir)?;
        Ok(config)
    }

    /// Validates `config` in place.
    ///
    /// `state_dir` is only consulted when a relative log file path has to be
    /// resolved.
    pub(crate) fn validate_config<F>(config: &mut CoreConfig, state_dir: F) -> Result<(), CoreError>
    where
        F: FnOnce() -> Result<PathBuf, CoreError>,
    {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {
                config.logging.level = level_lower;
            }
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))));
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => {
                config.logging.format = format_lower;
            }
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))));
            }
        }

        if let Some(log_path) = &config.logging.file_path {
            let absolute_path = if log_path.is_absolute() {
                log_path.clone()
            } else {
                state_dir()?.join(log_path)
            };
            if let Some(parent_dir) = absolute_path.parent() {
                if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                    launcher_fs::ensure_dir_exists(parent_dir)?;
                }
            }
            config.logging.file_path = Some(absolute_path);
        }

        let delay = config.launcher.auto_launch_delay_ms;
        if !(MIN_AUTO_LAUNCH_DELAY_MS..=MAX_AUTO_LAUNCH_DELAY_MS).contains(&delay) {
            return Err(CoreError::Config(ConfigError::ValidationError(format!(
                "Invalid auto_launch_delay_ms: {}. Must be between {} and {}.",
                delay, MIN_AUTO_LAUNCH_DELAY_MS, MAX_AUTO_LAUNCH_DELAY_MS
            ))));
        }

        if config.launcher.time_format.trim().is_empty() {
            return Err(CoreError::Config(ConfigError::ValidationError(
                "launcher.time_format must not be empty.".to_string(),
            )));
        }
        if config.launcher.date_format.trim().is_empty() {
            return Err(CoreError::Config(ConfigError::ValidationError(
                "launcher.date_format must not be empty.".to_string(),
            )));
        }

        if let Some(own) = &config.launcher.own_package_id {
            let trimmed = own.trim();
            config.launcher.own_package_id = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn no_state_dir() -> Result<PathBuf, CoreError> {
        Err(CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: "App State".to_string(),
        }))
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_from_path(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn test_load_from_path_success() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
            [logging]
            level = "DEBUG"
            format = "Json"

            [launcher]
            auto_launch_delay_ms = 250
            own_package_id = "  com.example.launcher  "
            "#,
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.launcher.auto_launch_delay_ms, 250);
        assert_eq!(config.launcher.own_package_id.as_deref(), Some("com.example.launcher"));
    }

    #[test]
    fn test_load_from_path_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "this is not valid toml").unwrap();

        match ConfigLoader::load_from_path(&path) {
            Err(CoreError::Config(ConfigError::ParseError(_))) => {}
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_path_read_error_for_directory() {
        let dir = TempDir::new().unwrap();
        match ConfigLoader::load_from_path(dir.path()) {
            Err(CoreError::Config(ConfigError::ReadError { path, .. })) => assert_eq!(path, dir.path()),
            other => panic!("Expected ReadError, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_config_invalid_log_level() {
        let mut config = CoreConfig::default();
        config.logging.level = "verbose".to_string();
        let result = ConfigLoader::validate_config(&mut config, no_state_dir);
        assert!(matches!(result, Err(CoreError::Config(ConfigError::ValidationError(_)))));
    }

    #[test]
    fn test_validate_config_invalid_log_format() {
        let mut config = CoreConfig::default();
        config.logging.format = "xml".to_string();
        let result = ConfigLoader::validate_config(&mut config, no_state_dir);
        assert!(matches!(result, Err(CoreError::Config(ConfigError::ValidationError(_)))));
    }

    #[test]
    fn test_validate_config_delay_out_of_range() {
        for delay in [0, MAX_AUTO_LAUNCH_DELAY_MS + 1] {
            let mut config = CoreConfig::default();
            config.launcher.auto_launch_delay_ms = delay;
            let result = ConfigLoader::validate_config(&mut config, no_state_dir);
            assert!(matches!(result, Err(CoreError::Config(ConfigError::ValidationError(_)))));
        }
    }

    #[test]
    fn test_validate_config_empty_time_format() {
        let mut config = CoreConfig::default();
        config.launcher.time_format = "  ".to_string();
        assert!(ConfigLoader::validate_config(&mut config, no_state_dir).is_err());
    }

    #[test]
    fn test_validate_config_absolute_log_path_creates_parent() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("logs").join("launcher.log");
        let mut config = CoreConfig::default();
        config.logging.file_path = Some(log_path.clone());

        ConfigLoader::validate_config(&mut config, no_state_dir).unwrap();
        assert_eq!(config.logging.file_path, Some(log_path));
        assert!(dir.path().join("logs").is_dir());
    }

    #[test]
    fn test_validate_config_relative_log_path_resolves_against_state_dir() {
        let dir = TempDir::new().unwrap();
        let state = dir.path().to_path_buf();
        let mut config = CoreConfig::default();
        config.logging.file_path = Some(PathBuf::from("launcher.log"));

        ConfigLoader::validate_config(&mut config, || Ok(state.clone())).unwrap();
        assert_eq!(config.logging.file_path, Some(dir.path().join("launcher.log")));
    }

    #[test]
    fn test_validate_config_relative_log_path_without_state_dir_fails() {
        let mut config = CoreConfig::default();
        config.logging.file_path = Some(PathBuf::from("launcher.log"));
        let result = ConfigLoader::validate_config(&mut config, no_state_dir);
        assert!(matches!(
            result,
            Err(CoreError::Config(ConfigError::DirectoryUnavailable { .. }))
        ));
    }
}
