//! The single owner of the favorites list.
//!
//! Mutations are serialized through an async mutex and written to persistence
//! before they become visible. Reads never wait for a mutation: they look at
//! the last committed list held in a `watch` channel.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::persistence_iface::FavoritesPersistence;
use super::types::{renumber, AddFavoriteOutcome, FavoriteApp, MAX_FAVORITES};
use crate::error::FavoritesError;
use crate::platform::WallClock;
use crate::shared_types::{App, PackageId};

pub struct FavoritesStore {
    persistence: Arc<dyn FavoritesPersistence>,
    clock: Arc<dyn WallClock>,
    committed: watch::Sender<Vec<FavoriteApp>>,
    mutation_lock: Mutex<()>,
}

impl FavoritesStore {
    /// Creates an empty store. Call [`FavoritesStore::initialize`] to load
    /// persisted favorites.
    pub fn new(persistence: Arc<dyn FavoritesPersistence>, clock: Arc<dyn WallClock>) -> Self {
        let (committed, _) = watch::channel(Vec::new());
        Self {
            persistence,
            clock,
            committed,
            mutation_lock: Mutex::new(()),
        }
    }

    /// Loads persisted favorites, ordering them by stored position, dropping
    /// duplicates and anything past [`MAX_FAVORITES`], then renumbering.
    ///
    /// The cleaned list is written back if it differs from what was stored.
    pub async fn initialize(&self) -> Result<usize, FavoritesError> {
        let _guard = self.mutation_lock.lock().await;
        let stored = self.persistence.load().await?;

        let mut ordered = stored.clone();
        ordered.sort_by_key(|favorite| favorite.position);
        let mut seen = HashSet::new();
        ordered.retain(|favorite| seen.insert(favorite.package_id.clone()));
        ordered.truncate(MAX_FAVORITES);
        let cleaned = renumber(ordered);

        if cleaned != stored {
            warn!(stored = stored.len(), kept = cleaned.len(), "Repairing stored favorites");
            self.persistence.save(&cleaned).await?;
        }
        let count = cleaned.len();
        self.committed.send_replace(cleaned);
        info!(count, "Favorites initialized");
        Ok(count)
    }

    /// Live view of the favorites. The receiver starts at the current list.
    pub fn observe(&self) -> watch::Receiver<Vec<FavoriteApp>> {
        self.committed.subscribe()
    }

    pub fn snapshot(&self) -> Vec<FavoriteApp> {
        self.committed.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.committed.borrow().len()
    }

    pub fn contains(&self, package_id: &str) -> bool {
        self.committed
            .borrow()
            .iter()
            .any(|favorite| favorite.package_id.as_str() == package_id)
    }

    pub fn can_add(&self) -> bool {
        self.count() < MAX_FAVORITES
    }

    /// Pins `app` in the next free slot.
    ///
    /// Duplicates and a full list are reported as outcomes and write nothing.
    pub async fn try_add(&self, app: &App) -> Result<AddFavoriteOutcome, FavoritesError> {
        let _guard = self.mutation_lock.lock().await;
        let current = self.snapshot();

        if current.iter().any(|favorite| favorite.package_id == app.package_id) {
            debug!(package = %app.package_id, "Already a favorite");
            return Ok(AddFavoriteOutcome::AlreadyFavorite);
        }
        if current.len() >= MAX_FAVORITES {
            debug!(package = %app.package_id, "Favorites full");
            return Ok(AddFavoriteOutcome::CapacityReached);
        }

        let favorite = FavoriteApp::new(
            app.package_id.clone(),
            app.label.clone(),
            self.clock.now_millis(),
            current.len(),
        )?;
        let mut next = current;
        next.push(favorite);

        self.persistence.save(&next).await?;
        self.committed.send_replace(next);
        info!(package = %app.package_id, "Favorite added");
        Ok(AddFavoriteOutcome::Added)
    }

    /// Boolean form of [`FavoritesStore::try_add`]; persistence failures read as `false`.
    pub async fn add(&self, app: &App) -> bool {
        match self.try_add(app).await {
            Ok(outcome) => outcome.is_added(),
            Err(e) => {
                warn!(package = %app.package_id, "Failed to add favorite: {}", e);
                false
            }
        }
    }

    /// Unpins `package_id` and closes the gap. Returns `false` if it was not pinned.
    pub async fn remove(&self, package_id: &str) -> Result<bool, FavoritesError> {
        let _guard = self.mutation_lock.lock().await;
        let current = self.snapshot();
        if !current.iter().any(|favorite| favorite.package_id.as_str() == package_id) {
            return Ok(false);
        }

        let next = renumber(
            current
                .into_iter()
                .filter(|favorite| favorite.package_id.as_str() != package_id)
                .collect(),
        );
        self.persistence.save(&next).await?;
        self.committed.send_replace(next);
        info!(package = package_id, "Favorite removed");
        Ok(true)
    }

    /// Drops every favorite whose package is not in `installed`.
    ///
    /// Returns the removed package ids. The pruned list is committed even if
    /// writing it fails, so an uninstalled app never stays visible; the write
    /// failure is still returned.
    pub async fn validate(&self, installed: &HashSet<String>) -> Result<Vec<PackageId>, FavoritesError> {
        let _guard = self.mutation_lock.lock().await;
        let current = self.snapshot();
        let (kept, removed): (Vec<FavoriteApp>, Vec<FavoriteApp>) = current
            .into_iter()
            .partition(|favorite| installed.contains(favorite.package_id.as_str()));

        if removed.is_empty() {
            return Ok(Vec::new());
        }

        let next = renumber(kept);
        let removed: Vec<PackageId> = removed.into_iter().map(|favorite| favorite.package_id).collect();
        self.committed.send_replace(next.clone());
        info!(removed = ?removed, "Removed favorites for uninstalled apps");

        self.persistence.save(&next).await?;
        Ok(removed)
    }

    /// Removes all favorites.
    pub async fn clear(&self) -> Result<(), FavoritesError> {
        let _guard = self.mutation_lock.lock().await;
        self.persistence.clear().await?;
        self.committed.send_replace(Vec::new());
        info!("Favorites cleared");
        Ok(())
    }
}
