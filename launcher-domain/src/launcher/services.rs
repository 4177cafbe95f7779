//! Wiring of the persistent stores behind the aggregator.

use std::sync::Arc;

use launcher_core::config::LauncherConfig;
use tracing::info;

use super::aggregator::LauncherDependencies;
use crate::app_catalog::InstalledAppCatalog;
use crate::device_status::{BatteryMonitor, ClockTicker};
use crate::error::DomainResult;
use crate::favorites::{FavoritesStore, KvFavoritesPersistence};
use crate::platform::{BatteryPlatform, LaunchGateway, PackagePlatform, WallClock};
use crate::settings::{KvSettingsPersistence, SettingsService};
use crate::storage::{FileKeyValueStore, KeyValueStore};
use crate::usage::{KvUsagePersistence, UsageTracker};

/// The host's platform implementations.
pub struct PlatformServices {
    pub clock: Arc<dyn WallClock>,
    pub battery: Arc<dyn BatteryPlatform>,
    pub packages: Arc<dyn PackagePlatform>,
    pub gateway: Arc<dyn LaunchGateway>,
}

/// Favorites, settings and usage, opened over one key-value store.
pub struct LauncherServices {
    pub favorites: Arc<FavoritesStore>,
    pub settings: Arc<SettingsService>,
    pub usage: Arc<UsageTracker>,
}

impl LauncherServices {
    /// Opens the stores in the configured data directory.
    pub async fn open(config: &LauncherConfig, clock: Arc<dyn WallClock>) -> DomainResult<Self> {
        let store = FileKeyValueStore::for_config(config)?;
        info!(dir = ?store.dir(), "Opening launcher data");
        Self::open_with_store(Arc::new(store), clock).await
    }

    /// Opens the stores over `store` and loads persisted favorites.
    pub async fn open_with_store(store: Arc<dyn KeyValueStore>, clock: Arc<dyn WallClock>) -> DomainResult<Self> {
        let favorites = Arc::new(FavoritesStore::new(
            Arc::new(KvFavoritesPersistence::new(Arc::clone(&store))),
            Arc::clone(&clock),
        ));
        favorites.initialize().await?;

        let settings_persistence = KvSettingsPersistence::open(Arc::clone(&store), Arc::clone(&clock)).await;
        let settings = Arc::new(SettingsService::new(Arc::new(settings_persistence)));
        let usage = Arc::new(UsageTracker::new(Arc::new(KvUsagePersistence::new(store)), clock));

        Ok(Self {
            favorites,
            settings,
            usage,
        })
    }

    /// Builds the live sources from `platform` and pairs them with these stores.
    pub fn dependencies(&self, config: &LauncherConfig, platform: PlatformServices) -> LauncherDependencies {
        LauncherDependencies {
            catalog: InstalledAppCatalog::new(platform.packages, config.own_package_id.clone()),
            time: ClockTicker::time(Arc::clone(&platform.clock), config.time_format.clone()),
            date: ClockTicker::date(platform.clock, config.date_format.clone()),
            battery: BatteryMonitor::new(platform.battery),
            favorites: Arc::clone(&self.favorites),
            settings: Arc::clone(&self.settings),
            usage: Arc::clone(&self.usage),
            gateway: platform.gateway,
        }
    }
}
