//! The launcher state aggregator and its wiring.

pub mod aggregator;
mod debounce;
pub mod services;
pub mod state;

pub use aggregator::{LauncherDependencies, LauncherStateAggregator};
pub use services::{LauncherServices, PlatformServices};
pub use state::{LauncherEvent, LauncherState, SearchState};
