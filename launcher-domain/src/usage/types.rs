use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Format of [`UsageRecord::current_date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Launch counters for a single package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUsage {
    pub launch_count: u32,
    pub last_launch_timestamp: i64,
}

/// Usage counters for one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub current_date: String,
    #[serde(default)]
    pub unlock_count: u32,
    #[serde(default)]
    pub last_unlock_timestamp: i64,
    #[serde(default)]
    pub app_launches: BTreeMap<String, AppUsage>,
}

impl UsageRecord {
    /// An empty record for `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            current_date: date.format(DATE_FORMAT).to_string(),
            unlock_count: 0,
            last_unlock_timestamp: 0,
            app_launches: BTreeMap::new(),
        }
    }

    pub fn is_for(&self, date: NaiveDate) -> bool {
        NaiveDate::parse_from_str(&self.current_date, DATE_FORMAT)
            .map(|stored| stored == date)
            .unwrap_or(false)
    }

    pub fn unlock_summary(&self) -> DailyUnlockSummary {
        DailyUnlockSummary {
            date: self.current_date.clone(),
            unlock_count: self.unlock_count,
            last_unlock_timestamp: self.last_unlock_timestamp,
        }
    }

    pub fn launch_summary(&self, package: &str) -> AppLaunchSummary {
        let usage = self.app_launches.get(package).copied().unwrap_or_default();
        AppLaunchSummary {
            package: package.to_string(),
            launch_count: usage.launch_count,
            last_launch_timestamp: usage.last_launch_timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyUnlockSummary {
    pub date: String,
    pub unlock_count: u32,
    pub last_unlock_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLaunchSummary {
    pub package: String,
    pub launch_count: u32,
    pub last_launch_timestamp: i64,
}

/// Unlock counters ready for display on the home screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeStats {
    pub unlock_count: u32,
    pub last_unlock_time_ago: Option<String>,
}

/// Launch counters for one app, ready for display in its context menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppStats {
    pub launch_count: u32,
    pub last_launch_time_ago: Option<String>,
}

/// Renders how long ago `timestamp_ms` was, for anything within the last day.
///
/// A zero timestamp means "never" and yields `None`, as does anything a day
/// or more old.
pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> Option<String> {
    if timestamp_ms == 0 {
        return None;
    }
    let elapsed = now_ms.saturating_sub(timestamp_ms);
    if elapsed < MINUTE_MS {
        Some("just now".to_string())
    } else if elapsed < HOUR_MS {
        Some(format!("{}m ago", elapsed / MINUTE_MS))
    } else if elapsed < DAY_MS {
        Some(format!("{}h ago", elapsed / HOUR_MS))
    } else {
        None
    }
}
