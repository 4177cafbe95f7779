use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::persistence_iface::FavoritesPersistence;
use super::types::FavoriteApp;
use crate::error::PersistenceError;
use crate::storage::KeyValueStore;

pub const FAVORITES_KEY: &str = "favorites_list";

/// [`FavoritesPersistence`] storing the list as a JSON array under
/// [`FAVORITES_KEY`].
pub struct KvFavoritesPersistence {
    store: Arc<dyn KeyValueStore>,
}

impl KvFavoritesPersistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl FavoritesPersistence for KvFavoritesPersistence {
    async fn load(&self) -> Result<Vec<FavoriteApp>, PersistenceError> {
        let Some(raw) = self.store.get(FAVORITES_KEY).await? else {
            return Ok(Vec::new());
        };

        let decoded: Vec<FavoriteApp> = match serde_json::from_str(&raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("Stored favorites are corrupt, resetting: {}", e);
                if let Err(clear_err) = self.store.remove(FAVORITES_KEY).await {
                    warn!("Failed to clear corrupt favorites: {}", clear_err);
                }
                return Ok(Vec::new());
            }
        };

        let favorites: Vec<FavoriteApp> = decoded
            .into_iter()
            .filter(|favorite| match favorite.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Dropping stored favorite: {}", e);
                    false
                }
            })
            .collect();
        debug!(count = favorites.len(), "Favorites loaded");
        Ok(favorites)
    }

    async fn save(&self, favorites: &[FavoriteApp]) -> Result<(), PersistenceError> {
        let encoded =
            serde_json::to_string(favorites).map_err(|e| PersistenceError::serialization(FAVORITES_KEY, e))?;
        self.store.put(FAVORITES_KEY, &encoded).await
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        self.store.remove(FAVORITES_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<FavoriteApp> {
        vec![
            FavoriteApp::new("com.example.maps", "Maps", 1_700_000_000_001, 0).unwrap(),
            FavoriteApp::new("com.example.mail", "Mail", 1_700_000_000_002, 1).unwrap(),
        ]
    }

    #[tokio::test]
    async fn save_then_load_preserves_order_and_fields() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let persistence = KvFavoritesPersistence::new(store);

        persistence.save(&sample()).await.unwrap();
        let once = persistence.load().await.unwrap();
        persistence.save(&once).await.unwrap();
        let twice = persistence.load().await.unwrap();

        assert_eq!(once, sample());
        assert_eq!(twice, once);
    }

    #[tokio::test]
    async fn missing_key_loads_empty() {
        let persistence = KvFavoritesPersistence::new(Arc::new(InMemoryKeyValueStore::new()));
        assert!(persistence.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_data_is_cleared_and_reads_empty() {
        let store = Arc::new(InMemoryKeyValueStore::with_entry(FAVORITES_KEY, "{not json"));
        let persistence = KvFavoritesPersistence::new(store.clone());

        assert!(persistence.load().await.unwrap().is_empty());
        assert_eq!(store.snapshot(FAVORITES_KEY), None);
    }

    #[tokio::test]
    async fn invalid_entries_are_dropped_on_load() {
        let raw = r#"[
            {"packageId":"com.example.maps","label":"Maps","addedTimestamp":10,"position":0},
            {"packageId":"","label":"Ghost","addedTimestamp":10,"position":1},
            {"packageId":"com.example.mail","label":"Mail","addedTimestamp":0,"position":2}
        ]"#;
        let store = Arc::new(InMemoryKeyValueStore::with_entry(FAVORITES_KEY, raw));
        let persistence = KvFavoritesPersistence::new(store);

        let loaded = persistence.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].package_id.as_str(), "com.example.maps");
    }

    #[tokio::test]
    async fn clear_removes_key() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let persistence = KvFavoritesPersistence::new(store.clone());
        persistence.save(&sample()).await.unwrap();
        persistence.clear().await.unwrap();
        assert_eq!(store.snapshot(FAVORITES_KEY), None);
    }
}
