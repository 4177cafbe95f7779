//! General utilities for the launcher core.
//!
//! - [`async_utils`]: task spawning and blocking I/O offloading.
//! - [`fs`]: directory creation plus file reads and writes that report the path on failure.
//! - [`paths`]: application config, data and state directories.

pub mod async_utils;
pub mod fs;
pub mod paths;

pub use async_utils::{run_blocking, spawn_task};
