use crate::device_status::DeviceStatus;
use crate::favorites::FavoriteApp;
use crate::settings::LauncherSettings;
use crate::shared_types::{App, PackageId};

/// The search overlay. Results are empty while inactive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
    pub results: Vec<App>,
}

/// Everything the home screen renders, merged from every source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LauncherState {
    pub search: SearchState,
    pub device_status: DeviceStatus,
    pub favorites: Vec<FavoriteApp>,
    /// Stored settings with quick actions checked against the installed apps.
    pub settings: LauncherSettings,
    pub show_battery_indicator: bool,
    pub context_menu_app: Option<App>,
}

/// Side effects the host reacts to, e.g. with a toast.
#[derive(Debug, Clone, PartialEq)]
pub enum LauncherEvent {
    AppLaunched { app: App, automatic: bool },
    LaunchFailed { package: PackageId },
    FavoriteAdded { package: PackageId },
    FavoriteRemoved { package: PackageId },
    FavoritesReconciled { removed: Vec<PackageId> },
}

/// Inputs of the auto-launch decision. A timer is re-armed only when this changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AutoLaunchKey {
    pub(crate) query: String,
    pub(crate) result_count: usize,
    pub(crate) search_active: bool,
    pub(crate) enabled: bool,
}
