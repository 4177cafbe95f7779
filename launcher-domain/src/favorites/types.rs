use serde::{Deserialize, Serialize};

use crate::error::FavoritesError;
use crate::shared_types::PackageId;

/// Maximum number of favorites shown on the home screen.
pub const MAX_FAVORITES: usize = 5;

/// A pinned app. Serialized as `{packageId, label, addedTimestamp, position}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteApp {
    pub package_id: PackageId,
    pub label: String,
    /// Epoch milliseconds, always positive.
    pub added_timestamp: i64,
    /// Slot in `0..MAX_FAVORITES`.
    pub position: usize,
}

impl FavoriteApp {
    pub fn new(
        package_id: impl Into<PackageId>,
        label: impl Into<String>,
        added_timestamp: i64,
        position: usize,
    ) -> Result<Self, FavoritesError> {
        let favorite = Self {
            package_id: package_id.into(),
            label: label.into(),
            added_timestamp,
            position,
        };
        favorite.validate()?;
        Ok(favorite)
    }

    pub fn validate(&self) -> Result<(), FavoritesError> {
        if self.package_id.is_blank() {
            return Err(FavoritesError::InvalidFavorite("package id must not be blank".to_string()));
        }
        if self.label.trim().is_empty() {
            return Err(FavoritesError::InvalidFavorite(format!(
                "label for '{}' must not be blank",
                self.package_id
            )));
        }
        if self.added_timestamp <= 0 {
            return Err(FavoritesError::InvalidFavorite(format!(
                "timestamp for '{}' must be positive, got {}",
                self.package_id, self.added_timestamp
            )));
        }
        if self.position >= MAX_FAVORITES {
            return Err(FavoritesError::InvalidFavorite(format!(
                "position {} for '{}' is outside 0..{}",
                self.position, self.package_id, MAX_FAVORITES
            )));
        }
        Ok(())
    }
}

/// Result of trying to pin an app. Rejections are outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddFavoriteOutcome {
    Added,
    AlreadyFavorite,
    CapacityReached,
}

impl AddFavoriteOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddFavoriteOutcome::Added)
    }
}

/// Assigns positions `0..len` in current order.
pub(crate) fn renumber(favorites: Vec<FavoriteApp>) -> Vec<FavoriteApp> {
    favorites
        .into_iter()
        .enumerate()
        .map(|(position, favorite)| FavoriteApp { position, ..favorite })
        .collect()
}
