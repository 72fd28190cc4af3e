//! Application state for the web layer.

use std::sync::Arc;

use crate::engine::TripRegistry;
use crate::stations::StationSearch;

/// Shared application state.
///
/// Contains the trip registry and the cached station search. Generic over
/// the journey/station source so tests can serve stub data.
pub struct AppState<S> {
    /// Running trips and their published entities
    pub registry: Arc<TripRegistry<S>>,

    /// Cached stop-area search for the setup surface
    pub stations: Arc<StationSearch<S>>,
}

impl<S> AppState<S> {
    /// Create a new app state.
    pub fn new(registry: Arc<TripRegistry<S>>, stations: Arc<StationSearch<S>>) -> Self {
        Self { registry, stations }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            stations: self.stations.clone(),
        }
    }
}
