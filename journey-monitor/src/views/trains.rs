//! Per-train entity projection.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::config::TripConfig;
use crate::domain::NormalizedJourney;
use crate::engine::Snapshot;

/// Flat attribute map exposed on one per-train entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainAttributes {
    pub departure_time: String,
    pub arrival_time: String,
    pub base_departure_time: String,
    pub base_arrival_time: String,
    pub delay_minutes: i64,
    pub duration_minutes: i64,
    pub has_delay: bool,
    pub cancelled: bool,
    pub departure_stop_id: String,
    pub arrival_stop_id: String,
    pub direction: String,
    pub physical_mode: String,
    pub commercial_mode: String,
    pub train_num: String,
}

fn attributes_for(config: &TripConfig, journey: &NormalizedJourney) -> TrainAttributes {
    TrainAttributes {
        departure_time: journey.departure_display(),
        arrival_time: journey.arrival_display(),
        base_departure_time: journey.scheduled_departure_display(),
        base_arrival_time: journey.scheduled_arrival_display(),
        delay_minutes: journey.delay_minutes,
        duration_minutes: journey.duration_minutes,
        has_delay: journey.has_delay(),
        cancelled: journey.cancelled,
        departure_stop_id: config.origin.as_str().to_string(),
        arrival_stop_id: config.destination.as_str().to_string(),
        direction: journey.direction.clone(),
        physical_mode: journey.physical_mode.clone(),
        commercial_mode: journey.commercial_mode.clone(),
        train_num: journey.train_number.clone(),
    }
}

/// One per-train entity.
///
/// The primary state is the journey's real departure instant. When the
/// snapshot no longer has a journey at this entity's index, the entity
/// clears to an unavailable state instead of keeping stale data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainEntity {
    /// Zero-based position within the snapshot.
    pub index: usize,
    /// Display name, `Train 1` onwards.
    pub name: String,
    /// Real departure of the journey at `index`; `None` when unavailable.
    pub state: Option<NaiveDateTime>,
    pub attributes: Option<TrainAttributes>,
}

impl TrainEntity {
    fn new(index: usize) -> Self {
        Self {
            index,
            name: format!("Train {}", index + 1),
            state: None,
            attributes: None,
        }
    }

    /// Recompute from the snapshot, clearing when the index is out of range.
    pub fn apply(&mut self, config: &TripConfig, snapshot: &Snapshot) {
        match snapshot.journeys.get(self.index) {
            Some(journey) => {
                self.state = journey.departure;
                self.attributes = Some(attributes_for(config, journey));
            }
            None => {
                self.state = None;
                self.attributes = None;
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.state.is_some()
    }
}

/// The per-train entity fan-out for one trip.
///
/// After every [`apply`] the board holds exactly
/// `min(snapshot.journeys.len(), max_trains)` entities: it grows when more
/// trains appear and retires entities when the snapshot shrinks or a
/// reconfiguration lowers the cap.
///
/// [`apply`]: TrainBoard::apply
#[derive(Debug)]
pub struct TrainBoard {
    max_trains: usize,
    entities: Vec<TrainEntity>,
}

impl TrainBoard {
    pub fn new(max_trains: usize) -> Self {
        Self {
            max_trains,
            entities: Vec::new(),
        }
    }

    /// Resize to the published count and recompute every entity.
    pub fn apply(&mut self, config: &TripConfig, snapshot: &Snapshot) {
        let target = snapshot.journeys.len().min(self.max_trains);

        if self.entities.len() > target {
            debug!(
                route = %config.route_label(),
                retired = self.entities.len() - target,
                "retiring per-train entities"
            );
            self.entities.truncate(target);
        }
        while self.entities.len() < target {
            self.entities.push(TrainEntity::new(self.entities.len()));
        }

        for entity in &mut self.entities {
            entity.apply(config, snapshot);
        }
    }

    pub fn entities(&self) -> &[TrainEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
