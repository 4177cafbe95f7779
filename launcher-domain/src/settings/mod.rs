//! Launcher settings: auto-launch toggle, quick actions and battery indicator mode.

pub mod persistence;
pub mod persistence_iface;
pub mod service;
pub mod types;


pub use persistence::{KvSettingsPersistence, SETTINGS_KEY};
pub use persistence_iface::SettingsPersistence;
pub use service::SettingsService;
pub use types::{
    validate_quick_actions, BatteryThresholdMode, LauncherSettings, QuickActionConfig, QuickActionSlot,
};
