use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LEFT_PACKAGE: &str = "com.google.android.dialer";
pub const DEFAULT_LEFT_LABEL: &str = "Phone";
pub const DEFAULT_RIGHT_PACKAGE: &str = "com.google.android.GoogleCamera";
pub const DEFAULT_RIGHT_LABEL: &str = "Camera";

/// When the battery indicator is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatteryThresholdMode {
    Always,
    #[default]
    #[serde(rename = "BELOW_50")]
    Below50,
    #[serde(rename = "BELOW_20")]
    Below20,
    Never,
}

impl BatteryThresholdMode {
    pub fn should_show(&self, percentage: u8) -> bool {
        match self {
            BatteryThresholdMode::Always => true,
            BatteryThresholdMode::Below50 => percentage < 50,
            BatteryThresholdMode::Below20 => percentage < 20,
            BatteryThresholdMode::Never => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatteryThresholdMode::Always => "ALWAYS",
            BatteryThresholdMode::Below50 => "BELOW_50",
            BatteryThresholdMode::Below20 => "BELOW_20",
            BatteryThresholdMode::Never => "NEVER",
        }
    }

    /// Parses a stored name. Unknown names fall back to the default mode.
    pub fn from_stored(name: &str) -> Self {
        match name {
            "ALWAYS" => BatteryThresholdMode::Always,
            "BELOW_50" => BatteryThresholdMode::Below50,
            "BELOW_20" => BatteryThresholdMode::Below20,
            "NEVER" => BatteryThresholdMode::Never,
            _ => BatteryThresholdMode::default(),
        }
    }
}

impl fmt::Display for BatteryThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two quick-action shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickActionSlot {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickActionConfig {
    pub package_id: String,
    pub label: String,
    /// `true` when the user never picked an app for this slot.
    pub is_default: bool,
}

impl QuickActionConfig {
    pub fn custom(package_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            label: label.into(),
            is_default: false,
        }
    }

    pub fn default_for(slot: QuickActionSlot) -> Self {
        let (package_id, label) = match slot {
            QuickActionSlot::Left => (DEFAULT_LEFT_PACKAGE, DEFAULT_LEFT_LABEL),
            QuickActionSlot::Right => (DEFAULT_RIGHT_PACKAGE, DEFAULT_RIGHT_LABEL),
        };
        Self {
            package_id: package_id.to_string(),
            label: label.to_string(),
            is_default: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherSettings {
    pub auto_launch_enabled: bool,
    pub left_quick_action: QuickActionConfig,
    pub right_quick_action: QuickActionConfig,
    pub battery_indicator_mode: BatteryThresholdMode,
    /// Epoch milliseconds of the last write, 0 if never written.
    pub last_modified: i64,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            auto_launch_enabled: true,
            left_quick_action: QuickActionConfig::default_for(QuickActionSlot::Left),
            right_quick_action: QuickActionConfig::default_for(QuickActionSlot::Right),
            battery_indicator_mode: BatteryThresholdMode::default(),
            last_modified: 0,
        }
    }
}

impl LauncherSettings {
    pub fn quick_action(&self, slot: QuickActionSlot) -> &QuickActionConfig {
        match slot {
            QuickActionSlot::Left => &self.left_quick_action,
            QuickActionSlot::Right => &self.right_quick_action,
        }
    }

    pub fn quick_action_mut(&mut self, slot: QuickActionSlot) -> &mut QuickActionConfig {
        match slot {
            QuickActionSlot::Left => &mut self.left_quick_action,
            QuickActionSlot::Right => &mut self.right_quick_action,
        }
    }
}

/// Replaces each quick action whose package is not installed with its default.
pub fn validate_quick_actions(mut settings: LauncherSettings, installed: &HashSet<String>) -> LauncherSettings {
    for slot in [QuickActionSlot::Left, QuickActionSlot::Right] {
        let action = settings.quick_action_mut(slot);
        if !installed.contains(&action.package_id) {
            *action = QuickActionConfig::default_for(slot);
        }
    }
    settings
}
