//! Interfaces to the host platform.
//!
//! The launcher never talks to the OS directly. The host shell implements
//! these traits and hands them to [`crate::launcher::LauncherStateAggregator`].

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::PlatformError;
use crate::shared_types::{App, PackageId};

/// Identifies a registered platform listener so it can be unregistered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(Uuid);

impl ListenerToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of wall-clock time.
pub trait WallClock: Send + Sync {
    /// Current local date and time.
    fn now_local(&self) -> NaiveDateTime;
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// [`WallClock`] backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now_local(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Charging state as reported by the battery driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChargeState {
    Charging,
    Discharging,
    NotCharging,
    Full,
    #[default]
    Unknown,
}

/// A raw battery reading: `level` out of `scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBatteryReading {
    pub level: i32,
    pub scale: i32,
    pub state: ChargeState,
}

#[async_trait]
pub trait BatteryPlatform: Send + Sync {
    /// Reads the battery state right now.
    async fn read_status(&self) -> Result<RawBatteryReading, PlatformError>;

    /// Starts delivering a reading on every battery change broadcast.
    async fn register_listener(
        &self,
        sender: mpsc::UnboundedSender<RawBatteryReading>,
    ) -> Result<ListenerToken, PlatformError>;

    async fn unregister_listener(&self, token: ListenerToken);
}

/// An install, uninstall or update of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageChange {
    Added(PackageId),
    Removed(PackageId),
    Changed(PackageId),
}

#[async_trait]
pub trait PackagePlatform: Send + Sync {
    /// Lists every app that has a launcher entry point.
    async fn query_launchable_apps(&self) -> Result<Vec<App>, PlatformError>;

    /// Starts delivering package change broadcasts.
    async fn register_listener(
        &self,
        sender: mpsc::UnboundedSender<PackageChange>,
    ) -> Result<ListenerToken, PlatformError>;

    async fn unregister_listener(&self, token: ListenerToken);
}

/// Asks the OS to start an app.
#[async_trait]
pub trait LaunchGateway: Send + Sync {
    /// Returns `true` if the launch request was accepted.
    async fn launch(&self, app: &App) -> bool;
}
