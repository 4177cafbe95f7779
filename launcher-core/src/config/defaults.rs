//! Default configuration values for the launcher core.
//!
//! These functions are referenced by `serde`'s `default` attribute in the
//! configuration structures.

use super::types::{LauncherConfig, LoggingConfig};
use std::path::PathBuf;

/// Lower bound accepted for the auto-launch debounce delay.
pub const MIN_AUTO_LAUNCH_DELAY_MS: u64 = 1;
/// Upper bound accepted for the auto-launch debounce delay.
pub const MAX_AUTO_LAUNCH_DELAY_MS: u64 = 5_000;

pub(crate) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(crate) fn default_log_format() -> String {
    "text".to_string()
}

pub(crate) fn default_launcher_config() -> LauncherConfig {
    LauncherConfig {
        auto_launch_delay_ms: default_auto_launch_delay_ms(),
        time_format: default_time_format(),
        date_format: default_date_format(),
        own_package_id: None,
        data_dir: None,
    }
}

/// Returns the default auto-launch debounce delay (300 ms).
pub(crate) fn default_auto_launch_delay_ms() -> u64 {
    300
}

/// 24-hour clock, e.g. `14:05`.
pub(crate) fn default_time_format() -> String {
    "%H:%M".to_string()
}

/// Short weekday and month, e.g. `Mon, Jan 15`.
pub(crate) fn default_date_format() -> String {
    "%a, %b %d".to_string()
}
