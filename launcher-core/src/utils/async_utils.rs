//! Asynchronous helpers on top of the `tokio` runtime.

use std::future::Future;
use tokio::task::{spawn, spawn_blocking, JoinHandle};

use crate::error::CoreError;

/// Spawns a future onto the current runtime.
pub fn spawn_task<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    spawn(future)
}

/// Runs blocking I/O on the blocking pool and flattens the join error.
///
/// A panicking closure is reported as [`CoreError::Internal`].
pub async fn run_blocking<F, T>(f: F) -> Result<T, CoreError>
where
    F: FnOnce() -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    spawn_blocking(f)
        .await
        .map_err(|e| CoreError::Internal(format!("Blocking task failed: {}", e)))?
}
