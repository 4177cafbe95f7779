use async_trait::async_trait;
use tokio::sync::watch;

use super::types::LauncherSettings;
use crate::error::PersistenceError;

/// Durable storage for [`LauncherSettings`].
#[async_trait]
pub trait SettingsPersistence: Send + Sync {
    /// Live view of the stored settings, starting at the current value.
    fn read(&self) -> watch::Receiver<LauncherSettings>;

    async fn write(&self, settings: &LauncherSettings) -> Result<(), PersistenceError>;

    /// Removes stored settings so every field reads as its default.
    async fn clear(&self) -> Result<(), PersistenceError>;

    /// `false` while [`SettingsPersistence::read`] shows a fallback because
    /// the stored record could not be read.
    fn is_loaded(&self) -> bool {
        true
    }

    /// Reads the stored record again.
    async fn reload(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}
