// Shared fakes for the launcher-domain integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use launcher_core::config::LauncherConfig;
use launcher_domain::error::PlatformError;
use launcher_domain::platform::{
    BatteryPlatform, ChargeState, LaunchGateway, ListenerToken, PackageChange, PackagePlatform, RawBatteryReading,
    WallClock,
};
use launcher_domain::storage::{InMemoryKeyValueStore, KeyValueStore};
use launcher_domain::{App, LauncherServices, LauncherState, LauncherStateAggregator, PackageId, PlatformServices};
use tokio::sync::{mpsc, watch};

/// Wall clock that follows tokio's (pausable) clock from a fixed starting point.
pub struct VirtualClock {
    base_local: NaiveDateTime,
    start: tokio::time::Instant,
}

impl VirtualClock {
    pub fn starting_at(base_local: NaiveDateTime) -> Self {
        Self {
            base_local,
            start: tokio::time::Instant::now(),
        }
    }

    fn elapsed(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.start.elapsed()).unwrap()
    }
}

impl WallClock for VirtualClock {
    fn now_local(&self) -> NaiveDateTime {
        self.base_local + self.elapsed()
    }

    fn now_millis(&self) -> i64 {
        (self.base_local + self.elapsed()).and_utc().timestamp_millis()
    }
}

pub fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
}

#[derive(Default)]
pub struct FakePackages {
    apps: Mutex<Vec<App>>,
    listeners: Mutex<HashMap<ListenerToken, mpsc::UnboundedSender<PackageChange>>>,
    fail_queries: AtomicBool,
}

impl FakePackages {
    pub fn with_apps(apps: Vec<App>) -> Self {
        Self {
            apps: Mutex::new(apps),
            ..Self::default()
        }
    }

    pub fn install(&self, app: App) {
        let id = app.package_id.clone();
        self.apps.lock().unwrap().push(app);
        self.broadcast(PackageChange::Added(id));
    }

    pub fn uninstall(&self, package_id: &str) {
        self.apps.lock().unwrap().retain(|app| app.package_id.as_str() != package_id);
        self.broadcast(PackageChange::Removed(PackageId::new(package_id)));
    }

    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    fn broadcast(&self, change: PackageChange) {
        for tx in self.listeners.lock().unwrap().values() {
            let _ = tx.send(change.clone());
        }
    }
}

#[async_trait]
impl PackagePlatform for FakePackages {
    async fn query_launchable_apps(&self) -> Result<Vec<App>, PlatformError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(PlatformError::QueryFailed("package service unavailable".to_string()));
        }
        Ok(self.apps.lock().unwrap().clone())
    }

    async fn register_listener(
        &self,
        sender: mpsc::UnboundedSender<PackageChange>,
    ) -> Result<ListenerToken, PlatformError> {
        let token = ListenerToken::new();
        self.listeners.lock().unwrap().insert(token, sender);
        Ok(token)
    }

    async fn unregister_listener(&self, token: ListenerToken) {
        self.listeners.lock().unwrap().remove(&token);
    }
}

pub struct FakeBattery {
    reading: Mutex<RawBatteryReading>,
    listeners: Mutex<HashMap<ListenerToken, mpsc::UnboundedSender<RawBatteryReading>>>,
}

impl FakeBattery {
    pub fn at(level: i32, state: ChargeState) -> Self {
        Self {
            reading: Mutex::new(RawBatteryReading { level, scale: 100, state }),
            listeners: Mutex::new(HashMap::new()),
        }
    }

    pub fn set(&self, level: i32, state: ChargeState) {
        let reading = RawBatteryReading { level, scale: 100, state };
        *self.reading.lock().unwrap() = reading;
        for tx in self.listeners.lock().unwrap().values() {
            let _ = tx.send(reading);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

#[async_trait]
impl BatteryPlatform for FakeBattery {
    async fn read_status(&self) -> Result<RawBatteryReading, PlatformError> {
        Ok(*self.reading.lock().unwrap())
    }

    async fn register_listener(
        &self,
        sender: mpsc::UnboundedSender<RawBatteryReading>,
    ) -> Result<ListenerToken, PlatformError> {
        let token = ListenerToken::new();
        self.listeners.lock().unwrap().insert(token, sender);
        Ok(token)
    }

    async fn unregister_listener(&self, token: ListenerToken) {
        self.listeners.lock().unwrap().remove(&token);
    }
}

/// Records launch requests; accepts them unless told otherwise.
pub struct RecordingGateway {
    launched: Mutex<Vec<PackageId>>,
    reject: AtomicBool,
    rejected_packages: Mutex<Vec<String>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            launched: Mutex::new(Vec::new()),
            reject: AtomicBool::new(false),
            rejected_packages: Mutex::new(Vec::new()),
        }
    }

    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().unwrap().iter().map(|id| id.to_string()).collect()
    }

    pub fn set_reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    /// Rejects launches of `package_id` only.
    pub fn reject_package(&self, package_id: &str) {
        self.rejected_packages.lock().unwrap().push(package_id.to_string());
    }
}

#[async_trait]
impl LaunchGateway for RecordingGateway {
    async fn launch(&self, app: &App) -> bool {
        if self.reject.load(Ordering::SeqCst) {
            return false;
        }
        if self.rejected_packages.lock().unwrap().iter().any(|id| id == app.package_id.as_str()) {
            return false;
        }
        self.launched.lock().unwrap().push(app.package_id.clone());
        true
    }
}

pub fn app(id: &str, label: &str) -> App {
    App::new(id, label)
}

pub fn sample_apps() -> Vec<App> {
    vec![
        app("com.example.maps", "Maps"),
        app("com.example.mail", "Mail"),
        app("com.example.music", "Music"),
        app("com.example.camera", "Camera"),
        app("com.example.calendar", "Calendar"),
    ]
}

pub struct Harness {
    pub aggregator: LauncherStateAggregator,
    pub services: LauncherServices,
    pub packages: Arc<FakePackages>,
    pub battery: Arc<FakeBattery>,
    pub gateway: Arc<RecordingGateway>,
    pub store: Arc<InMemoryKeyValueStore>,
    pub clock: Arc<VirtualClock>,
    pub config: LauncherConfig,
}

impl Harness {
    pub async fn start(apps: Vec<App>) -> Self {
        Self::start_with_store(apps, Arc::new(InMemoryKeyValueStore::new())).await
    }

    pub async fn start_with_store(apps: Vec<App>, store: Arc<InMemoryKeyValueStore>) -> Self {
        launcher_core::logging::init_test_logging();
        let clock = Arc::new(VirtualClock::starting_at(local(2024, 1, 15, 9, 30, 20)));
        let packages = Arc::new(FakePackages::with_apps(apps));
        let battery = Arc::new(FakeBattery::at(80, ChargeState::Discharging));
        let gateway = Arc::new(RecordingGateway::new());
        let config = LauncherConfig::default();

        let kv: Arc<dyn KeyValueStore> = store.clone();
        let services = LauncherServices::open_with_store(kv, clock.clone()).await.unwrap();
        let deps = services.dependencies(
            &config,
            PlatformServices {
                clock: clock.clone(),
                battery: battery.clone(),
                packages: packages.clone(),
                gateway: gateway.clone(),
            },
        );
        let aggregator = LauncherStateAggregator::start(deps, &config);

        let harness = Self {
            aggregator,
            services,
            packages,
            battery,
            gateway,
            store,
            clock,
            config,
        };
        harness.settle().await;
        harness
    }

    /// Lets spawned forwarding tasks run without advancing the clock far.
    pub async fn settle(&self) {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
    }

    pub fn observe(&self) -> watch::Receiver<LauncherState> {
        self.aggregator.observe()
    }
}

/// Waits (in virtual time) until `predicate` holds for the published state.
pub async fn wait_for<F>(receiver: &mut watch::Receiver<LauncherState>, predicate: F) -> LauncherState
where
    F: Fn(&LauncherState) -> bool,
{
    let state = tokio::time::timeout(Duration::from_secs(5), receiver.wait_for(|state| predicate(state)))
        .await
        .expect("state condition not reached in time")
        .expect("aggregator stopped");
    state.clone()
}
