//! Settings stored as a flat TOML table in a key-value store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::persistence_iface::SettingsPersistence;
use super::types::{BatteryThresholdMode, LauncherSettings, QuickActionConfig, QuickActionSlot};
use crate::error::PersistenceError;
use crate::platform::WallClock;
use crate::storage::KeyValueStore;

pub const SETTINGS_KEY: &str = "launcher_settings";

/// On-disk shape. Every key is optional so partial records still load.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_launch_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    left_package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    left_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right_package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    battery_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<i64>,
}

fn decode_quick_action(slot: QuickActionSlot, package: Option<String>, label: Option<String>) -> QuickActionConfig {
    match package.filter(|p| !p.trim().is_empty()) {
        Some(package_id) => {
            let label = label
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| QuickActionConfig::default_for(slot).label);
            QuickActionConfig {
                package_id,
                label,
                is_default: false,
            }
        }
        None => QuickActionConfig::default_for(slot),
    }
}

impl From<StoredSettings> for LauncherSettings {
    fn from(stored: StoredSettings) -> Self {
        let defaults = LauncherSettings::default();
        LauncherSettings {
            auto_launch_enabled: stored.auto_launch_enabled.unwrap_or(defaults.auto_launch_enabled),
            left_quick_action: decode_quick_action(QuickActionSlot::Left, stored.left_package, stored.left_label),
            right_quick_action: decode_quick_action(QuickActionSlot::Right, stored.right_package, stored.right_label),
            battery_indicator_mode: stored
                .battery_mode
                .as_deref()
                .map(BatteryThresholdMode::from_stored)
                .unwrap_or(defaults.battery_indicator_mode),
            last_modified: stored.last_modified.unwrap_or(0),
        }
    }
}

impl From<&LauncherSettings> for StoredSettings {
    fn from(settings: &LauncherSettings) -> Self {
        // Default quick actions are left out so they keep reading as defaults.
        let (left_package, left_label) = encode_quick_action(&settings.left_quick_action);
        let (right_package, right_label) = encode_quick_action(&settings.right_quick_action);
        StoredSettings {
            auto_launch_enabled: Some(settings.auto_launch_enabled),
            left_package,
            left_label,
            right_package,
            right_label,
            battery_mode: Some(settings.battery_indicator_mode.as_str().to_string()),
            last_modified: Some(settings.last_modified),
        }
    }
}

fn encode_quick_action(action: &QuickActionConfig) -> (Option<String>, Option<String>) {
    if action.is_default {
        (None, None)
    } else {
        (Some(action.package_id.clone()), Some(action.label.clone()))
    }
}

/// Decodes a stored record. Corrupt records read as defaults.
pub(crate) fn decode_settings(raw: &str) -> LauncherSettings {
    match toml::from_str::<StoredSettings>(raw) {
        Ok(stored) => stored.into(),
        Err(e) => {
            warn!("Stored settings are corrupt, using defaults: {}", e);
            LauncherSettings::default()
        }
    }
}

pub(crate) fn encode_settings(settings: &LauncherSettings) -> Result<String, PersistenceError> {
    toml::to_string(&StoredSettings::from(settings)).map_err(|e| PersistenceError::serialization(SETTINGS_KEY, e))
}

/// [`SettingsPersistence`] over a [`KeyValueStore`] under [`SETTINGS_KEY`].
pub struct KvSettingsPersistence {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn WallClock>,
    current: watch::Sender<LauncherSettings>,
    loaded: AtomicBool,
}

async fn read_stored(store: &dyn KeyValueStore) -> Result<LauncherSettings, PersistenceError> {
    Ok(match store.get(SETTINGS_KEY).await? {
        Some(raw) => decode_settings(&raw),
        None => LauncherSettings::default(),
    })
}

impl KvSettingsPersistence {
    /// Reads the stored record once.
    ///
    /// A read failure shows defaults and leaves the persistence unloaded
    /// until [`SettingsPersistence::reload`] succeeds.
    pub async fn open(store: Arc<dyn KeyValueStore>, clock: Arc<dyn WallClock>) -> Self {
        let (initial, loaded) = match read_stored(store.as_ref()).await {
            Ok(settings) => (settings, true),
            Err(e) => {
                warn!("Failed to read settings, showing defaults: {}", e);
                (LauncherSettings::default(), false)
            }
        };
        debug!(?initial, loaded, "Settings opened");
        let (current, _) = watch::channel(initial);
        Self {
            store,
            clock,
            current,
            loaded: AtomicBool::new(loaded),
        }
    }
}

#[async_trait]
impl SettingsPersistence for KvSettingsPersistence {
    fn read(&self) -> watch::Receiver<LauncherSettings> {
        self.current.subscribe()
    }

    async fn write(&self, settings: &LauncherSettings) -> Result<(), PersistenceError> {
        let stamped = LauncherSettings {
            last_modified: self.clock.now_millis(),
            ..settings.clone()
        };
        let encoded = encode_settings(&stamped)?;
        self.store.put(SETTINGS_KEY, &encoded).await?;
        self.current.send_replace(stamped);
        self.loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        self.store.remove(SETTINGS_KEY).await?;
        self.current.send_replace(LauncherSettings::default());
        self.loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    async fn reload(&self) -> Result<(), PersistenceError> {
        let settings = read_stored(self.store.as_ref()).await?;
        self.current.send_replace(settings);
        self.loaded.store(true, Ordering::SeqCst);
        debug!("Settings reloaded");
        Ok(())
    }
}
