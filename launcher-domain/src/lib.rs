//! Domain layer of the minimalist launcher.
//!
//! The host shell implements the traits in [`platform`] and hands them to
//! [`launcher::LauncherStateAggregator`], which merges the installed apps,
//! clock, battery, favorites and settings into one [`launcher::LauncherState`]
//! and drives the debounced single-result auto-launch.

pub use launcher_core as core;

pub mod app_catalog;
pub mod auto_launch;
pub mod device_status;
pub mod error;
pub mod favorites;
pub mod launcher;
pub mod live;
pub mod platform;
pub mod search;
pub mod settings;
pub mod shared_types;
pub mod storage;
pub mod usage;

#[cfg(test)]
mod test_support;

pub use app_catalog::InstalledAppCatalog;
pub use device_status::{BatteryMonitor, BatteryStatus, ClockTicker, DeviceStatus};
pub use error::{DomainError, DomainResult};
pub use favorites::{AddFavoriteOutcome, FavoriteApp, FavoritesStore, MAX_FAVORITES};
pub use launcher::{
    LauncherDependencies, LauncherEvent, LauncherServices, LauncherState, LauncherStateAggregator, PlatformServices,
    SearchState,
};
pub use live::{LiveSequence, Subscription};
pub use search::search_apps;
pub use settings::{BatteryThresholdMode, LauncherSettings, QuickActionConfig, QuickActionSlot, SettingsService};
pub use shared_types::{App, LaunchHandle, PackageId};
pub use usage::UsageTracker;
