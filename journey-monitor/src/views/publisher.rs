//! Snapshot-change observer.
//!
//! One `TripPublisher` per trip subscribes to the engine's snapshot channel
//! and recomputes the published entities synchronously on every change
//! notification. Readers (the web surface, the host) only ever see the
//! published state; they never reach into the engine.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::{RwLock, watch};
use tracing::debug;

use crate::config::TripConfig;
use crate::engine::Snapshot;

use super::calendar::{self, CalendarEvent};
use super::summary::{TripSummary, project_summary};
use super::trains::{TrainBoard, TrainEntity};

struct Published {
    summary: TripSummary,
    board: TrainBoard,
}

/// Publishes the view entities for one trip.
pub struct TripPublisher {
    config: TripConfig,
    snapshot_rx: watch::Receiver<Snapshot>,
    published: RwLock<Published>,
}

impl TripPublisher {
    /// Create a publisher over an engine's snapshot channel.
    ///
    /// The initial entities are projected from whatever the channel
    /// currently holds, so a publisher attached to a fresh engine starts
    /// out unavailable rather than stale.
    pub fn new(config: TripConfig, snapshot_rx: watch::Receiver<Snapshot>) -> Self {
        let snapshot = snapshot_rx.borrow().clone();

        let mut board = TrainBoard::new(config.max_trains);
        board.apply(&config, &snapshot);
        let summary = project_summary(&config, &snapshot);

        Self {
            config,
            snapshot_rx,
            published: RwLock::new(Published { summary, board }),
        }
    }

    /// Observer loop: recompute on every snapshot change.
    ///
    /// Returns when the engine side of the channel is dropped.
    pub async fn run(self: Arc<Self>) {
        let mut rx = self.snapshot_rx.clone();

        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            self.apply(&snapshot).await;
        }
    }

    /// Recompute the published entities from a snapshot.
    pub async fn apply(&self, snapshot: &Snapshot) {
        let mut published = self.published.write().await;
        published.board.apply(&self.config, snapshot);
        published.summary = project_summary(&self.config, snapshot);

        debug!(
            route = %self.config.route_label(),
            trains = published.board.len(),
            success = snapshot.last_update_success,
            "published entities recomputed"
        );
    }

    pub fn config(&self) -> &TripConfig {
        &self.config
    }

    /// The current trip-summary entity.
    pub async fn summary(&self) -> TripSummary {
        self.published.read().await.summary.clone()
    }

    /// The current per-train entities.
    pub async fn trains(&self) -> Vec<TrainEntity> {
        self.published.read().await.board.entities().to_vec()
    }

    fn latest_snapshot(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Calendar events whose start falls within `[start, end]`.
    pub fn events_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<CalendarEvent> {
        calendar::events_between(&self.config, &self.latest_snapshot(), start, end)
    }

    /// The calendar event whose start is closest to `now`.
    pub fn current_event(&self, now: NaiveDateTime) -> Option<CalendarEvent> {
        calendar::current_event(&self.config, &self.latest_snapshot(), now)
    }
}
