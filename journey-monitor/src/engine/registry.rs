//! Trip registry.
//!
//! Maps trip identity to a running refresh engine and its view publisher,
//! with an explicit create/replace/remove lifecycle. Each trip's polling
//! and publishing tasks are owned here and aborted on removal (and on
//! drop), so no scheduled wake-up can ever fire against a torn-down engine.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::TripConfig;
use crate::navitia::JourneySource;
use crate::views::TripPublisher;

use super::refresh::{EngineStatus, RefreshEngine};
use super::snapshot::Snapshot;

/// Identifier for one configured trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripId(String);

impl TripId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A running trip: engine, publisher, and their tasks.
struct TripEntry<S> {
    engine: Arc<RefreshEngine<S>>,
    publisher: Arc<TripPublisher>,
    poll_task: JoinHandle<()>,
    publish_task: JoinHandle<()>,
}

impl<S> Drop for TripEntry<S> {
    fn drop(&mut self) {
        self.poll_task.abort();
        self.publish_task.abort();
    }
}

/// Owns every running trip for one journey source.
pub struct TripRegistry<S> {
    source: Arc<S>,
    trips: RwLock<HashMap<TripId, TripEntry<S>>>,
}

impl<S: JourneySource + Send + Sync + 'static> TripRegistry<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            trips: RwLock::new(HashMap::new()),
        }
    }

    /// Start polling a trip.
    ///
    /// If the id is already registered the old engine is torn down first
    /// and replaced wholesale: reconfiguration never mutates a running
    /// engine in place.
    pub async fn insert(&self, id: TripId, config: TripConfig) {
        let engine = Arc::new(RefreshEngine::new(config.clone(), self.source.clone()));
        let publisher = Arc::new(TripPublisher::new(config, engine.subscribe()));

        let poll_task = tokio::spawn(engine.clone().run());
        let publish_task = tokio::spawn(publisher.clone().run());

        let entry = TripEntry {
            engine,
            publisher,
            poll_task,
            publish_task,
        };

        let replaced = self.trips.write().await.insert(id.clone(), entry);
        if replaced.is_some() {
            // The old entry's tasks are aborted by its Drop impl
            info!(trip = %id, "replaced running trip");
        } else {
            info!(trip = %id, "registered trip");
        }
    }

    /// Stop polling a trip and retire its entities.
    ///
    /// Returns false when the id was not registered.
    pub async fn remove(&self, id: &TripId) -> bool {
        let removed = self.trips.write().await.remove(id);
        if removed.is_some() {
            info!(trip = %id, "removed trip");
        }
        removed.is_some()
    }

    /// Registered trip ids, sorted.
    pub async fn ids(&self) -> Vec<TripId> {
        let mut ids: Vec<_> = self.trips.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// The view publisher for a trip.
    pub async fn publisher(&self, id: &TripId) -> Option<Arc<TripPublisher>> {
        self.trips.read().await.get(id).map(|e| e.publisher.clone())
    }

    /// The engine health for a trip.
    pub async fn status(&self, id: &TripId) -> Option<EngineStatus> {
        self.trips
            .read()
            .await
            .get(id)
            .map(|e| *e.engine.status().borrow())
    }

    /// The current snapshot for a trip.
    pub async fn snapshot(&self, id: &TripId) -> Option<Snapshot> {
        self.trips.read().await.get(id).map(|e| e.engine.snapshot())
    }

    /// Trigger an immediate refresh of every registered trip.
    ///
    /// Safe to call at any time: trips with a refresh already in flight
    /// coalesce instead of queueing.
    pub async fn refresh_all(&self) {
        let engines: Vec<_> = {
            let trips = self.trips.read().await;
            trips.values().map(|e| e.engine.clone()).collect()
        };

        futures::future::join_all(engines.iter().map(|e| e.refresh())).await;
    }
}
