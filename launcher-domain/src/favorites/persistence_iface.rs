use async_trait::async_trait;

use super::types::FavoriteApp;
use crate::error::PersistenceError;

/// Durable storage for the ordered favorites list.
#[async_trait]
pub trait FavoritesPersistence: Send + Sync {
    /// Loads the stored list. Corrupt data reads as an empty list.
    async fn load(&self) -> Result<Vec<FavoriteApp>, PersistenceError>;

    /// Replaces the stored list.
    async fn save(&self, favorites: &[FavoriteApp]) -> Result<(), PersistenceError>;

    async fn clear(&self) -> Result<(), PersistenceError>;
}
