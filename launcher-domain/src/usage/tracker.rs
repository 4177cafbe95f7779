//! Daily unlock and per-app launch counters.
//!
//! Counters belong to the local calendar day. The first access on a new day
//! replaces the stored record with an empty one.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::persistence::UsagePersistence;
use super::types::{
    format_relative_time, AppLaunchSummary, AppStats, AppUsage, DailyUnlockSummary, HomeStats, UsageRecord,
};
use crate::error::{DomainError, DomainResult, PersistenceError};
use crate::platform::WallClock;

pub struct UsageTracker {
    persistence: Arc<dyn UsagePersistence>,
    clock: Arc<dyn WallClock>,
    lock: Mutex<()>,
}

impl UsageTracker {
    pub fn new(persistence: Arc<dyn UsagePersistence>, clock: Arc<dyn WallClock>) -> Self {
        Self {
            persistence,
            clock,
            lock: Mutex::new(()),
        }
    }

    /// Counts one unlock of the device.
    pub async fn record_unlock(&self) -> DomainResult<DailyUnlockSummary> {
        let _guard = self.lock.lock().await;
        let mut record = self.todays_record().await?;
        record.unlock_count = record.unlock_count.saturating_add(1);
        record.last_unlock_timestamp = self.clock.now_millis();
        self.persistence.save(&record).await?;
        debug!(count = record.unlock_count, "Unlock recorded");
        Ok(record.unlock_summary())
    }

    /// Counts one launch of `package`.
    pub async fn record_app_launch(&self, package: &str) -> DomainResult<AppLaunchSummary> {
        if package.trim().is_empty() {
            return Err(DomainError::InvalidInput("package name must not be empty".to_string()));
        }
        let _guard = self.lock.lock().await;
        let mut record = self.todays_record().await?;
        let now = self.clock.now_millis();
        let usage = record.app_launches.entry(package.to_string()).or_insert_with(AppUsage::default);
        usage.launch_count = usage.launch_count.saturating_add(1);
        usage.last_launch_timestamp = now;
        self.persistence.save(&record).await?;
        debug!(package, "App launch recorded");
        Ok(record.launch_summary(package))
    }

    pub async fn daily_unlock_summary(&self) -> DomainResult<DailyUnlockSummary> {
        let _guard = self.lock.lock().await;
        Ok(self.todays_record().await?.unlock_summary())
    }

    pub async fn app_launch_summary(&self, package: &str) -> DomainResult<AppLaunchSummary> {
        let _guard = self.lock.lock().await;
        Ok(self.todays_record().await?.launch_summary(package))
    }

    pub async fn clear(&self) -> DomainResult<()> {
        let _guard = self.lock.lock().await;
        self.persistence.clear().await?;
        info!("Usage data cleared");
        Ok(())
    }

    /// Today's unlock count and when the last unlock happened. Zero on failure.
    pub async fn home_stats(&self) -> HomeStats {
        match self.daily_unlock_summary().await {
            Ok(summary) => HomeStats {
                unlock_count: summary.unlock_count,
                last_unlock_time_ago: format_relative_time(summary.last_unlock_timestamp, self.clock.now_millis()),
            },
            Err(e) => {
                warn!("Failed to read unlock stats: {}", e);
                HomeStats::default()
            }
        }
    }

    pub async fn app_stats(&self, package: &str) -> AppStats {
        match self.app_launch_summary(package).await {
            Ok(summary) => AppStats {
                launch_count: summary.launch_count,
                last_launch_time_ago: format_relative_time(summary.last_launch_timestamp, self.clock.now_millis()),
            },
            Err(e) => {
                warn!(package, "Failed to read launch stats: {}", e);
                AppStats::default()
            }
        }
    }

    // Caller holds `lock`.
    async fn todays_record(&self) -> Result<UsageRecord, PersistenceError> {
        let today = self.clock.now_local().date();
        match self.persistence.load().await? {
            Some(record) if record.is_for(today) => Ok(record),
            Some(stale) => {
                let fresh = UsageRecord::for_date(today);
                info!(previous = %stale.current_date, today = %fresh.current_date, "New day, resetting usage counters");
                self.persistence.save(&fresh).await?;
                Ok(fresh)
            }
            None => Ok(UsageRecord::for_date(today)),
        }
    }
}
