use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{error, info};

use super::persistence_iface::SettingsPersistence;
use super::types::{validate_quick_actions, BatteryThresholdMode, LauncherSettings, QuickActionConfig, QuickActionSlot};
use crate::error::SettingsError;

/// Reads and updates [`LauncherSettings`].
///
/// Updates are read-modify-write and serialized, so two concurrent changes to
/// different fields do not overwrite each other. A single-field change is
/// refused while the stored record cannot be read.
pub struct SettingsService {
    persistence: Arc<dyn SettingsPersistence>,
    update_lock: Mutex<()>,
}

impl SettingsService {
    pub fn new(persistence: Arc<dyn SettingsPersistence>) -> Self {
        Self {
            persistence,
            update_lock: Mutex::new(()),
        }
    }

    /// Stored settings as last written, without install checks.
    pub fn stored(&self) -> LauncherSettings {
        self.persistence.read().borrow().clone()
    }

    /// Current settings with quick actions checked against `installed`.
    pub fn current(&self, installed: &HashSet<String>) -> LauncherSettings {
        validate_quick_actions(self.stored(), installed)
    }

    pub fn observe(&self) -> watch::Receiver<LauncherSettings> {
        self.persistence.read()
    }

    /// Validates and writes `settings`.
    pub async fn update(&self, settings: LauncherSettings) -> Result<(), SettingsError> {
        let _guard = self.update_lock.lock().await;
        self.write_validated(&settings).await
    }

    pub async fn set_auto_launch_enabled(&self, enabled: bool) -> Result<(), SettingsError> {
        self.modify(|settings| settings.auto_launch_enabled = enabled).await
    }

    pub async fn set_battery_indicator_mode(&self, mode: BatteryThresholdMode) -> Result<(), SettingsError> {
        self.modify(|settings| settings.battery_indicator_mode = mode).await
    }

    pub async fn set_quick_action(&self, slot: QuickActionSlot, action: QuickActionConfig) -> Result<(), SettingsError> {
        self.modify(|settings| *settings.quick_action_mut(slot) = action).await
    }

    pub async fn reset_to_defaults(&self) -> Result<(), SettingsError> {
        let _guard = self.update_lock.lock().await;
        self.persistence.clear().await.map_err(|e| {
            error!("Failed to reset settings: {}", e);
            SettingsError::from(e)
        })?;
        info!("Settings reset to defaults");
        Ok(())
    }

    async fn modify<F>(&self, change: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut LauncherSettings),
    {
        let _guard = self.update_lock.lock().await;
        // Changing one field of a fallback view would overwrite the real record.
        if !self.persistence.is_loaded() {
            self.persistence.reload().await.map_err(|e| {
                error!("Stored settings are unreadable, refusing to change them: {}", e);
                SettingsError::from(e)
            })?;
        }
        let mut settings = self.stored();
        change(&mut settings);
        self.write_validated(&settings).await
    }

    async fn write_validated(&self, settings: &LauncherSettings) -> Result<(), SettingsError> {
        for slot in [QuickActionSlot::Left, QuickActionSlot::Right] {
            let action = settings.quick_action(slot);
            if action.package_id.trim().is_empty() || action.label.trim().is_empty() {
                return Err(SettingsError::Invalid(format!(
                    "{:?} quick action needs a package and a label",
                    slot
                )));
            }
        }
        self.persistence.write(settings).await.map_err(|e| {
            error!("Failed to save settings: {}", e);
            SettingsError::from(e)
        })?;
        info!(
            auto_launch = settings.auto_launch_enabled,
            battery_mode = %settings.battery_indicator_mode,
            "Settings saved"
        );
        Ok(())
    }
}
