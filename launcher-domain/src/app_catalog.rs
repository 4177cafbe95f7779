//! The live list of launchable apps.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::live::{Emitter, LiveSequence, Producer, Subscription};
use crate::platform::PackagePlatform;
use crate::shared_types::App;

/// Drops the launcher's own entry and duplicate packages (first wins), then
/// sorts by label, ignoring case.
pub fn normalize_catalog(apps: Vec<App>, own_package_id: Option<&str>) -> Vec<App> {
    let mut seen = HashSet::new();
    let mut apps: Vec<App> = apps
        .into_iter()
        .filter(|app| own_package_id != Some(app.package_id.as_str()))
        .filter(|app| seen.insert(app.package_id.clone()))
        .collect();
    apps.sort_by_cached_key(App::sort_key);
    apps
}

struct CatalogProducer {
    platform: Arc<dyn PackagePlatform>,
    own_package_id: Option<String>,
}

impl CatalogProducer {
    /// Returns `false` once the sequence no longer accepts values.
    async fn refresh(&self, emitter: &Emitter<Vec<App>>) -> bool {
        match self.platform.query_launchable_apps().await {
            Ok(apps) => {
                let apps = normalize_catalog(apps, self.own_package_id.as_deref());
                debug!(count = apps.len(), "App catalog refreshed");
                emitter.emit(apps)
            }
            Err(e) => {
                warn!("Failed to query launchable apps, keeping previous list: {}", e);
                true
            }
        }
    }
}

#[async_trait]
impl Producer<Vec<App>> for CatalogProducer {
    async fn produce(&self, emitter: Emitter<Vec<App>>, mut stop: oneshot::Receiver<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let token = match self.platform.register_listener(tx).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Package listener registration failed: {}", e);
                return;
            }
        };

        if self.refresh(&emitter).await {
            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    change = rx.recv() => match change {
                        Some(change) => {
                            debug!(?change, "Package change received");
                            if !self.refresh(&emitter).await {
                                break;
                            }
                        }
                        None => break,
                    },
                }
            }
        }

        self.platform.unregister_listener(token).await;
        debug!(?token, "Package listener unregistered");
    }
}

/// Live sequence of installed, launchable apps, refreshed on every
/// install, uninstall or update broadcast.
#[derive(Clone)]
pub struct InstalledAppCatalog {
    sequence: LiveSequence<Vec<App>>,
}

impl InstalledAppCatalog {
    pub fn new(platform: Arc<dyn PackagePlatform>, own_package_id: Option<String>) -> Self {
        Self {
            sequence: LiveSequence::new(
                "app_catalog",
                CatalogProducer {
                    platform,
                    own_package_id,
                },
            ),
        }
    }

    pub fn observe(&self) -> Subscription<Vec<App>> {
        self.sequence.subscribe()
    }

    /// The most recent list, if the catalog is being observed.
    pub fn latest(&self) -> Option<Vec<App>> {
        self.sequence.latest()
    }

    pub fn is_active(&self) -> bool {
        self.sequence.is_active()
    }
}
