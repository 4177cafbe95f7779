//! The home screen's single merge point.
//!
//! Every source (catalog, clock, date, battery, favorites, settings) feeds a
//! forwarding task that stores the source's latest value and recomputes the
//! whole [`LauncherState`]. Nothing is queued: a burst of upstream changes
//! only guarantees that the final state reflects the newest value of each
//! source.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use launcher_core::config::LauncherConfig;
use launcher_core::utils::spawn_task;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use super::state::{AutoLaunchKey, LauncherEvent, LauncherState, SearchState};
use crate::app_catalog::InstalledAppCatalog;
use crate::auto_launch;
use crate::device_status::{BatteryMonitor, BatteryStatus, ClockTicker, DeviceStatus};
use crate::error::{DomainResult, FavoritesError};
use crate::favorites::{AddFavoriteOutcome, FavoriteApp, FavoritesStore};
use crate::live::Subscription;
use crate::platform::LaunchGateway;
use crate::search::search_apps;
use crate::settings::{validate_quick_actions, LauncherSettings, QuickActionConfig, QuickActionSlot, SettingsService};
use crate::shared_types::{App, PackageId};
use crate::usage::{DailyUnlockSummary, UsageTracker};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Everything the aggregator merges and drives.
pub struct LauncherDependencies {
    pub catalog: InstalledAppCatalog,
    pub time: ClockTicker,
    pub date: ClockTicker,
    pub battery: BatteryMonitor,
    pub favorites: Arc<FavoritesStore>,
    pub settings: Arc<SettingsService>,
    pub usage: Arc<UsageTracker>,
    pub gateway: Arc<dyn LaunchGateway>,
}

/// Latest value of every source plus the UI-owned search and menu state.
#[derive(Default)]
struct Sources {
    apps: Vec<App>,
    installed: HashSet<String>,
    catalog_loaded: bool,
    time: String,
    date: String,
    battery: BatteryStatus,
    favorites: Vec<FavoriteApp>,
    settings: LauncherSettings,
    search_active: bool,
    query: String,
    context_menu_app: Option<App>,
}

impl Sources {
    fn settings_view(&self) -> LauncherSettings {
        // Before the first catalog emission nothing is known to be missing.
        if self.catalog_loaded {
            validate_quick_actions(self.settings.clone(), &self.installed)
        } else {
            self.settings.clone()
        }
    }

    fn search_results(&self) -> Vec<App> {
        if self.search_active {
            search_apps(&self.apps, &self.query)
        } else {
            Vec::new()
        }
    }
}

struct Inner {
    sources: Mutex<Sources>,
    state: watch::Sender<LauncherState>,
    events: broadcast::Sender<LauncherEvent>,
    auto_launch: Debouncer<AutoLaunchKey>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    favorites: Arc<FavoritesStore>,
    settings: Arc<SettingsService>,
    usage: Arc<UsageTracker>,
    gateway: Arc<dyn LaunchGateway>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    fn update_sources<F>(self: &Arc<Self>, change: F)
    where
        F: FnOnce(&mut Sources),
    {
        let mut sources = lock(&self.sources);
        change(&mut sources);
        self.publish(&sources);
    }

    // Runs with `sources` locked so timer updates happen in state order.
    fn publish(self: &Arc<Self>, sources: &Sources) {
        let settings = sources.settings_view();
        let results = sources.search_results();

        let key = AutoLaunchKey {
            query: sources.query.clone(),
            result_count: results.len(),
            search_active: sources.search_active,
            enabled: settings.auto_launch_enabled,
        };
        let eligible = auto_launch::is_eligible(key.enabled, key.search_active, &key.query, key.result_count);

        let next = LauncherState {
            search: SearchState {
                active: sources.search_active,
                query: sources.query.clone(),
                results,
            },
            device_status: DeviceStatus::combine(&sources.time, &sources.date, sources.battery),
            favorites: sources.favorites.clone(),
            show_battery_indicator: settings.battery_indicator_mode.should_show(sources.battery.percentage),
            settings,
            context_menu_app: sources.context_menu_app.clone(),
        };
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        let weak = Arc::downgrade(self);
        self.auto_launch.update(key, eligible, move |key| async move {
            if let Some(inner) = weak.upgrade() {
                inner.fire_auto_launch(key).await;
            }
        });
    }

    async fn fire_auto_launch(self: Arc<Self>, key: AutoLaunchKey) {
        if !self.auto_launch.claim(&key) {
            return;
        }
        let candidate = {
            let sources = lock(&self.sources);
            let mut results = sources.search_results();
            if results.len() == 1 {
                results.pop()
            } else {
                None
            }
        };
        let Some(app) = candidate else {
            return;
        };

        info!(package = %app.package_id, query = %key.query, "Auto-launching sole search result");
        self.launch(&app, true).await;
        self.deactivate_search();
    }

    async fn launch(self: &Arc<Self>, app: &App, automatic: bool) -> bool {
        if !self.gateway.launch(app).await {
            warn!(package = %app.package_id, "Launch request rejected");
            let _ = self.events.send(LauncherEvent::LaunchFailed {
                package: app.package_id.clone(),
            });
            return false;
        }

        if let Err(e) = self.usage.record_app_launch(app.package_id.as_str()).await {
            warn!(package = %app.package_id, "Failed to record launch: {}", e);
        }
        let _ = self.events.send(LauncherEvent::AppLaunched {
            app: app.clone(),
            automatic,
        });
        true
    }

    fn deactivate_search(self: &Arc<Self>) {
        self.auto_launch.cancel();
        self.update_sources(|sources| {
            sources.search_active = false;
            sources.query.clear();
        });
    }

    fn sync_favorites(self: &Arc<Self>) {
        let favorites = self.favorites.snapshot();
        self.update_sources(|sources| sources.favorites = favorites);
    }

    async fn on_catalog(self: &Arc<Self>, apps: Vec<App>) {
        let installed: HashSet<String> = apps.iter().map(|app| app.package_id.to_string()).collect();
        debug!(count = apps.len(), "Catalog changed");
        self.update_sources(|sources| {
            sources.apps = apps;
            sources.installed = installed.clone();
            sources.catalog_loaded = true;
        });

        match self.favorites.validate(&installed).await {
            Ok(removed) if removed.is_empty() => {}
            Ok(removed) => {
                let _ = self.events.send(LauncherEvent::FavoritesReconciled { removed });
            }
            Err(e) => warn!("Failed to persist favorites reconciliation: {}", e),
        }
        self.sync_favorites();
    }

    fn shutdown(&self) {
        self.auto_launch.cancel();
        for task in lock(&self.tasks).drain(..) {
            task.abort();
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Forwards every value of `subscription` to `apply` until either side goes away.
fn forward<T, F, Fut>(inner: &Arc<Inner>, mut subscription: Subscription<T>, apply: F) -> JoinHandle<()>
where
    T: Send + 'static,
    F: Fn(Arc<Inner>, T) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let weak = Arc::downgrade(inner);
    spawn_task(async move {
        while let Some(value) = subscription.next().await {
            let Some(inner) = weak.upgrade() else {
                break;
            };
            apply(inner, value).await;
        }
    })
}

/// Forwards a `watch` channel, starting with its current value.
fn forward_watch<T, F>(inner: &Arc<Inner>, mut receiver: watch::Receiver<T>, apply: F) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&Arc<Inner>, T) + Send + 'static,
{
    let weak: Weak<Inner> = Arc::downgrade(inner);
    spawn_task(async move {
        loop {
            let value = receiver.borrow_and_update().clone();
            match weak.upgrade() {
                Some(inner) => apply(&inner, value),
                None => break,
            }
            if receiver.changed().await.is_err() {
                break;
            }
        }
    })
}

/// Merges the launcher's sources into one [`LauncherState`] and drives
/// auto-launch.
///
/// Dropping the aggregator (or calling [`LauncherStateAggregator::shutdown`])
/// cancels the debounce timer and every forwarding task, which releases the
/// platform listeners behind the live sources.
pub struct LauncherStateAggregator {
    inner: Arc<Inner>,
}

impl LauncherStateAggregator {
    /// Subscribes to every source and starts merging. Must be called from
    /// within a tokio runtime.
    pub fn start(deps: LauncherDependencies, config: &LauncherConfig) -> Self {
        let delay: Duration = config.auto_launch_delay();
        let sources = Sources {
            favorites: deps.favorites.snapshot(),
            settings: deps.settings.stored(),
            ..Sources::default()
        };
        let (state, _) = watch::channel(LauncherState::default());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let inner = Arc::new(Inner {
            sources: Mutex::new(sources),
            state,
            events,
            auto_launch: Debouncer::new(delay),
            tasks: Mutex::new(Vec::new()),
            favorites: Arc::clone(&deps.favorites),
            settings: Arc::clone(&deps.settings),
            usage: deps.usage,
            gateway: deps.gateway,
        });
        {
            let sources = lock(&inner.sources);
            inner.publish(&sources);
        }

        let tasks = vec![
            forward(&inner, deps.catalog.observe(), |inner, apps| async move {
                inner.on_catalog(apps).await;
            }),
            forward(&inner, deps.time.observe(), |inner, time| async move {
                inner.update_sources(|sources| sources.time = time);
            }),
            forward(&inner, deps.date.observe(), |inner, date| async move {
                inner.update_sources(|sources| sources.date = date);
            }),
            forward(&inner, deps.battery.observe(), |inner, battery| async move {
                inner.update_sources(|sources| sources.battery = battery);
            }),
            forward_watch(&inner, deps.favorites.observe(), |inner, favorites| {
                inner.update_sources(|sources| sources.favorites = favorites);
            }),
            forward_watch(&inner, deps.settings.observe(), |inner, settings| {
                inner.update_sources(|sources| sources.settings = settings);
            }),
        ];
        *lock(&inner.tasks) = tasks;

        info!(auto_launch_delay_ms = delay.as_millis() as u64, "Launcher state aggregator started");
        Self { inner }
    }

    pub fn state(&self) -> LauncherState {
        self.inner.state.borrow().clone()
    }

    /// Live view of the merged state, starting at the current value.
    pub fn observe(&self) -> watch::Receiver<LauncherState> {
        self.inner.state.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<LauncherEvent> {
        self.inner.events.subscribe()
    }

    pub fn activate_search(&self) {
        debug!("Search activated");
        self.inner.update_sources(|sources| sources.search_active = true);
    }

    /// Closes search, clears the query and cancels any pending auto-launch.
    pub fn deactivate_search(&self) {
        debug!("Search deactivated");
        self.inner.deactivate_search();
    }

    pub fn update_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.inner.update_sources(|sources| sources.query = query);
    }

    pub fn show_context_menu(&self, app: App) {
        self.inner.update_sources(|sources| sources.context_menu_app = Some(app));
    }

    pub fn hide_context_menu(&self) {
        self.inner.update_sources(|sources| sources.context_menu_app = None);
    }

    /// Pins `app`. Closes the context menu whatever the outcome.
    pub async fn add_favorite(&self, app: &App) -> Result<AddFavoriteOutcome, FavoritesError> {
        let result = self.inner.favorites.try_add(app).await;
        self.hide_context_menu();
        match &result {
            Ok(AddFavoriteOutcome::Added) => {
                self.inner.sync_favorites();
                let _ = self.inner.events.send(LauncherEvent::FavoriteAdded {
                    package: app.package_id.clone(),
                });
            }
            Ok(outcome) => debug!(package = %app.package_id, ?outcome, "Favorite not added"),
            Err(e) => warn!(package = %app.package_id, "Failed to add favorite: {}", e),
        }
        result
    }

    /// Unpins `package_id`. Closes the context menu whatever the outcome.
    pub async fn remove_favorite(&self, package_id: &str) -> Result<bool, FavoritesError> {
        let result = self.inner.favorites.remove(package_id).await;
        self.hide_context_menu();
        match &result {
            Ok(true) => {
                self.inner.sync_favorites();
                let _ = self.inner.events.send(LauncherEvent::FavoriteRemoved {
                    package: PackageId::new(package_id),
                });
            }
            Ok(false) => {}
            Err(e) => warn!(package = package_id, "Failed to remove favorite: {}", e),
        }
        result
    }

    pub fn is_favorite(&self, app: &App) -> bool {
        self.inner.favorites.contains(app.package_id.as_str())
    }

    /// Launches `app`; on success search is closed and the launch counted.
    pub async fn launch_app(&self, app: &App) -> bool {
        let launched = self.inner.launch(app, false).await;
        if launched {
            self.inner.deactivate_search();
        }
        launched
    }

    /// Launches the installed app behind `favorite`. A favorite whose app is
    /// no longer installed is not launched. Search is left as it is.
    pub async fn launch_favorite(&self, favorite: &FavoriteApp) -> bool {
        let app = lock(&self.inner.sources)
            .apps
            .iter()
            .find(|app| app.package_id == favorite.package_id)
            .cloned();
        match app {
            Some(app) => self.inner.launch(&app, false).await,
            None => {
                warn!(package = %favorite.package_id, "Favorite is not installed, not launching");
                false
            }
        }
    }

    /// Launches the app behind a quick-action shortcut.
    ///
    /// The shortcut is resolved after install checks, so a custom app that was
    /// uninstalled resolves to the slot's default. If a custom app rejects the
    /// launch, the slot's default app is tried instead.
    pub async fn launch_quick_action(&self, slot: QuickActionSlot) -> bool {
        let (action, app, fallback) = {
            let sources = lock(&self.inner.sources);
            let action = sources.settings_view().quick_action(slot).clone();
            let installed = |package: &str| {
                sources
                    .apps
                    .iter()
                    .find(|app| app.package_id.as_str() == package)
                    .cloned()
            };
            let app = installed(&action.package_id);
            let fallback = if action.is_default {
                None
            } else {
                installed(&QuickActionConfig::default_for(slot).package_id)
            };
            (action, app, fallback)
        };

        let Some(app) = app else {
            warn!(?slot, package = %action.package_id, "Quick action app is not installed, not launching");
            return false;
        };
        if self.inner.launch(&app, false).await {
            return true;
        }
        match fallback {
            Some(default_app) => {
                info!(?slot, package = %default_app.package_id, "Quick action failed, launching default app");
                self.inner.launch(&default_app, false).await
            }
            None => false,
        }
    }

    /// Installed apps sorted by label.
    pub fn all_apps(&self) -> Vec<App> {
        lock(&self.inner.sources).apps.clone()
    }

    pub async fn record_unlock(&self) -> DomainResult<DailyUnlockSummary> {
        self.inner.usage.record_unlock().await
    }

    pub fn favorites(&self) -> &Arc<FavoritesStore> {
        &self.inner.favorites
    }

    pub fn settings(&self) -> &Arc<SettingsService> {
        &self.inner.settings
    }

    pub fn usage(&self) -> &Arc<UsageTracker> {
        &self.inner.usage
    }

    /// `true` while an auto-launch is waiting for its debounce delay.
    pub fn auto_launch_pending(&self) -> bool {
        self.inner.auto_launch.is_pending()
    }

    /// Stops every forwarding task and the debounce timer.
    pub fn shutdown(&self) {
        info!("Launcher state aggregator shutting down");
        self.inner.shutdown();
    }
}
