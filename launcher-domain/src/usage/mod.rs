//! Usage tracking: how often the device was unlocked today and how often each app was launched.

pub mod persistence;
pub mod tracker;
pub mod types;

pub use persistence::{KvUsagePersistence, UsagePersistence, USAGE_KEY};
pub use tracker::UsageTracker;
pub use types::{
    format_relative_time, AppLaunchSummary, AppStats, AppUsage, DailyUnlockSummary, HomeStats, UsageRecord,
};
