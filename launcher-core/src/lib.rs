//! # Launcher core (`launcher-core`)
//!
//! Infrastructure shared by the launcher crates:
//!
//! - **Error handling**: [`CoreError`] with the more specific [`ConfigError`] and [`LoggingError`].
//! - **Configuration**: TOML loading with defaults and validation via [`ConfigLoader`].
//! - **Logging**: `tracing` based console and file output, see [`logging`].
//! - **Utilities**: filesystem helpers, application paths and async helpers in [`utils`].
//!
//! ```rust,ignore
//! use launcher_core::{ConfigLoader, CoreError};
//! use launcher_core::logging::init_logging;
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load()?;
//!     init_logging(&config.logging, false)?;
//!     tracing::info!("Launcher core initialized.");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::{ConfigLoader, CoreConfig, LauncherConfig, LoggingConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_logging, init_minimal_logging};
pub use utils::{run_blocking, spawn_task};
