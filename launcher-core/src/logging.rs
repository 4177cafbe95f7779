//! Logging setup for the launcher, built on the `tracing` ecosystem.
//!
//! [`init_logging`] installs a console layer and, when configured, a daily
//! rolling file layer written through a non-blocking appender. The appender's
//! [`WorkerGuard`] is kept in a process-wide slot so buffered lines are flushed
//! when it is replaced or the process exits.
//!
//! [`init_minimal_logging`] is the fallback used before configuration is
//! available, or when loading it failed.

use crate::config::LoggingConfig;
use crate::error::{CoreError, LoggingError};
use crate::utils;

use once_cell::sync::Lazy;
use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Installs an `INFO` level stderr subscriber, honouring `RUST_LOG` if set.
///
/// Calling this more than once is harmless.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

/// Installs a subscriber that writes through the libtest capture.
///
/// Meant for `#[test]` functions in this workspace; repeated calls are no-ops.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::DEBUG.to_string()));
    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn parse_level(level: &str) -> Result<Level, LoggingError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        invalid_level => Err(LoggingError::InitializationFailure(format!(
            "Invalid log level in config: {}",
            invalid_level
        ))),
    }
}

fn create_file_layer(log_path: &Path, format: &str) -> Result<(BoxedLayer, WorkerGuard), CoreError> {
    let parent = log_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    utils::fs::ensure_dir_exists(parent)?;

    let file_name = log_path
        .file_name()
        .ok_or_else(|| LoggingError::InitializationFailure(format!("Log path has no file name: {:?}", log_path)))?;

    let file_appender = tracing_appender::rolling::daily(parent, file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let layer: BoxedLayer = match format.to_lowercase().as_str() {
        "json" => fmt::layer().json().with_writer(non_blocking_writer).with_ansi(false).boxed(),
        _ => fmt::layer().with_writer(non_blocking_writer).with_ansi(false).boxed(),
    };
    Ok((layer, guard))
}

/// Initializes global logging from `config`.
///
/// With `is_reload` set, a subscriber that is already installed is not an
/// error; the file guard is still swapped so a new file path takes effect for
/// flushing.
pub fn init_logging(config: &LoggingConfig, is_reload: bool) -> Result<(), CoreError> {
    let level = parse_level(&config.level)?;

    let stdout_filter = EnvFilter::new(level.to_string());
    let stdout_layer: BoxedLayer = match config.format.to_lowercase().as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(stdout)
            .with_ansi(false)
            .with_filter(stdout_filter)
            .boxed(),
        _ => fmt::layer()
            .with_writer(stdout)
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_filter(stdout_filter)
            .boxed(),
    };

    let mut layers: Vec<BoxedLayer> = vec![stdout_layer];
    let mut new_file_guard: Option<WorkerGuard> = None;
    if let Some(log_path) = &config.file_path {
        let (file_layer, guard) = create_file_layer(log_path, &config.format)?;
        new_file_guard = Some(guard);
        layers.push(file_layer.with_filter(EnvFilter::new(level.to_string())).boxed());
    }

    let result = Registry::default().with(layers).try_init();

    match LOG_WORKER_GUARD.lock() {
        Ok(mut guard_slot) => {
            // Dropping the previous guard flushes its buffered lines.
            *guard_slot = new_file_guard;
        }
        Err(e) => {
            eprintln!("[ERROR] Failed to lock LOG_WORKER_GUARD to update: {}. Log flushing may be affected.", e);
        }
    }

    match result {
        Ok(()) => {
            tracing::debug!(level = %level, format = %config.format, "Logging initialized");
            Ok(())
        }
        Err(e) if is_reload => {
            tracing::info!("Re-initializing logging attempted; previous subscriber stays active: {}", e);
            Ok(())
        }
        Err(e) => Err(LoggingError::InitializationFailure(format!(
            "Failed to set global tracing subscriber. Was it already initialized? Error: {}",
            e
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_minimal_logging_runs_twice_without_panic() {
        init_minimal_logging();
        init_minimal_logging();
        tracing::info!("Minimal logging test message");
    }

    #[test]
    fn test_parse_level_is_case_insensitive() {
        assert_eq!(parse_level("WARN").unwrap(), Level::WARN);
        assert_eq!(parse_level("trace").unwrap(), Level::TRACE);
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn test_create_file_layer_ensures_parent_dir_exists() {
        let temp_dir = TempDir::new().unwrap();
        let nested_log_path = temp_dir.path().join("new_parent_dir/launcher.log");
        assert!(!nested_log_path.parent().unwrap().exists());

        for format in ["text", "json"] {
            let result = create_file_layer(&nested_log_path, format);
            assert!(result.is_ok(), "create_file_layer failed for {}: {:?}", format, result.err());
        }
        assert!(nested_log_path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_create_file_layer_fails_when_parent_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let result = create_file_layer(&blocker.join("launcher.log"), "text");
        assert!(matches!(result, Err(CoreError::Filesystem { .. })));
    }

    #[test]
    fn test_init_logging_invalid_level_returns_error() {
        let config = LoggingConfig {
            level: "supertrace".to_string(),
            file_path: None,
            format: "text".to_string(),
        };
        match init_logging(&config, false).unwrap_err() {
            CoreError::Logging(LoggingError::InitializationFailure(msg)) => {
                assert!(msg.contains("Invalid log level in config: supertrace"));
            }
            other_error => panic!("Unexpected error type: {:?}", other_error),
        }
    }

    #[test]
    fn test_init_logging_reload_swaps_file_guard() {
        let temp_dir = TempDir::new().unwrap();
        let with_file = LoggingConfig {
            level: "info".to_string(),
            file_path: Some(temp_dir.path().join("launcher.log")),
            format: "text".to_string(),
        };
        // Another test may have installed a subscriber first, so always reload.
        init_logging(&with_file, true).unwrap();
        assert!(LOG_WORKER_GUARD.lock().unwrap().is_some());

        let console_only = LoggingConfig { file_path: None, ..with_file };
        init_logging(&console_only, true).unwrap();
        assert!(LOG_WORKER_GUARD.lock().unwrap().is_none());
    }
}
