use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::types::UsageRecord;
use crate::error::PersistenceError;
use crate::storage::KeyValueStore;

pub const USAGE_KEY: &str = "usage_data";

/// Durable storage for the daily usage record.
#[async_trait]
pub trait UsagePersistence: Send + Sync {
    /// Returns `None` if nothing usable is stored.
    async fn load(&self) -> Result<Option<UsageRecord>, PersistenceError>;

    async fn save(&self, record: &UsageRecord) -> Result<(), PersistenceError>;

    async fn clear(&self) -> Result<(), PersistenceError>;
}

/// [`UsagePersistence`] storing the record as JSON under [`USAGE_KEY`].
pub struct KvUsagePersistence {
    store: Arc<dyn KeyValueStore>,
}

impl KvUsagePersistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UsagePersistence for KvUsagePersistence {
    async fn load(&self) -> Result<Option<UsageRecord>, PersistenceError> {
        let Some(raw) = self.store.get(USAGE_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!("Stored usage data is corrupt, starting fresh: {}", e);
                Ok(None)
            }
        }
    }

    async fn save(&self, record: &UsageRecord) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(record).map_err(|e| PersistenceError::serialization(USAGE_KEY, e))?;
        self.store.put(USAGE_KEY, &encoded).await
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        self.store.remove(USAGE_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;
    use crate::usage::types::AppUsage;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record() -> UsageRecord {
        let mut record = UsageRecord::for_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        record.unlock_count = 3;
        record.last_unlock_timestamp = 1_705_320_000_000;
        record.app_launches.insert(
            "com.example.maps".to_string(),
            AppUsage {
                launch_count: 2,
                last_launch_timestamp: 1_705_320_100_000,
            },
        );
        record
    }

    #[tokio::test]
    async fn save_then_load() {
        let persistence = KvUsagePersistence::new(Arc::new(InMemoryKeyValueStore::new()));
        persistence.save(&record()).await.unwrap();
        assert_eq!(persistence.load().await.unwrap(), Some(record()));
    }

    #[tokio::test]
    async fn corrupt_record_reads_as_absent() {
        let store = Arc::new(InMemoryKeyValueStore::with_entry(USAGE_KEY, "[1, 2"));
        let persistence = KvUsagePersistence::new(store);
        assert_eq!(persistence.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_counters_default_to_zero() {
        let store = Arc::new(InMemoryKeyValueStore::with_entry(USAGE_KEY, r#"{"currentDate":"2024-01-15"}"#));
        let loaded = KvUsagePersistence::new(store).load().await.unwrap().unwrap();
        assert_eq!(loaded.unlock_count, 0);
        assert!(loaded.app_launches.is_empty());
    }

    #[tokio::test]
    async fn clear_removes_key() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let persistence = KvUsagePersistence::new(store.clone());
        persistence.save(&record()).await.unwrap();
        persistence.clear().await.unwrap();
        assert_eq!(store.snapshot(USAGE_KEY), None);
    }
}
