//! Favorites: up to [`MAX_FAVORITES`] pinned apps in a fixed, gap-free order.

pub mod persistence;
pub mod persistence_iface;
pub mod store;
pub mod types;


pub use persistence::{KvFavoritesPersistence, FAVORITES_KEY};
pub use persistence_iface::FavoritesPersistence;
pub use store::FavoritesStore;
pub use types::{AddFavoriteOutcome, FavoriteApp, MAX_FAVORITES};
