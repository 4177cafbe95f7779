//! Configuration data structures for the launcher core.
//!
//! These structs are populated by deserializing `config.toml`. Missing fields
//! fall back to the functions in [`super::defaults`], and unknown fields are
//! rejected via `#[serde(deny_unknown_fields)]`.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use launcher_core::config::LoggingConfig;
/// use std::path::PathBuf;
///
/// let toml_str = r#"
/// level = "debug"
/// file_path = "/var/log/launcher.log"
/// format = "json"
/// "#;
/// let log_config: LoggingConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, Some(PathBuf::from("/var/log/launcher.log")));
/// assert_eq!(log_config.format, "json");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level: "trace", "debug", "info", "warn" or "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// Format for file output: "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Tunables for the launcher home screen.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LauncherConfig {
    /// Quiet period before a lone search result is launched automatically.
    #[serde(default = "defaults::default_auto_launch_delay_ms")]
    pub auto_launch_delay_ms: u64,
    /// `chrono` format string used for the clock line.
    #[serde(default = "defaults::default_time_format")]
    pub time_format: String,
    /// `chrono` format string used for the date line.
    #[serde(default = "defaults::default_date_format")]
    pub date_format: String,
    /// Package id of the launcher itself, hidden from the app list.
    #[serde(default)]
    pub own_package_id: Option<String>,
    /// Overrides where favorites, settings and usage data are stored.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl LauncherConfig {
    pub fn auto_launch_delay(&self) -> Duration {
        Duration::from_millis(self.auto_launch_delay_ms)
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        defaults::default_launcher_config()
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use launcher_core::config::CoreConfig;
///
/// let toml_str = r#"
/// [logging]
/// level = "warn"
///
/// [launcher]
/// auto_launch_delay_ms = 450
/// "#;
/// let config: CoreConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(config.logging.level, "warn");
/// assert_eq!(config.logging.format, "text");
/// assert_eq!(config.launcher.auto_launch_delay_ms, 450);
/// assert_eq!(config.launcher.time_format, "%H:%M");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_launcher_config")]
    pub launcher: LauncherConfig,
}
