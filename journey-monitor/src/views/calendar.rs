//! Calendar projection.
//!
//! Exposes each journey as a calendar event. An event spans the journey's
//! real departure to its real arrival (the granularity choice is fixed
//! here, not configurable); journeys missing either timestamp yield no
//! event. Range queries filter on event start, inclusive at both ends.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::TripConfig;
use crate::domain::NormalizedJourney;
use crate::engine::Snapshot;

/// One train exposed as a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    /// Section id of the journey, when the upstream provided one.
    pub uid: Option<String>,
    /// Route label, with the delay embedded when the train is late.
    pub summary: String,
    /// Real departure.
    pub start: NaiveDateTime,
    /// Real arrival.
    pub end: NaiveDateTime,
    /// Name of the boarding stop.
    pub location: Option<String>,
}

/// Project the snapshot to calendar events, capped at the configured
/// per-train count.
pub fn events(config: &TripConfig, snapshot: &Snapshot) -> Vec<CalendarEvent> {
    snapshot
        .journeys
        .iter()
        .take(config.max_trains)
        .filter_map(|journey| event_for(config, journey))
        .collect()
}

/// Events whose start falls within `[start, end]`.
pub fn events_between(
    config: &TripConfig,
    snapshot: &Snapshot,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Vec<CalendarEvent> {
    events(config, snapshot)
        .into_iter()
        .filter(|event| start <= event.start && event.start <= end)
        .collect()
}

/// The event whose start is closest to `now`, past or future.
pub fn current_event(
    config: &TripConfig,
    snapshot: &Snapshot,
    now: NaiveDateTime,
) -> Option<CalendarEvent> {
    events(config, snapshot)
        .into_iter()
        .min_by_key(|event| (event.start - now).num_seconds().abs())
}

fn event_for(config: &TripConfig, journey: &NormalizedJourney) -> Option<CalendarEvent> {
    let start = journey.departure?;
    let end = journey.arrival?;

    Some(CalendarEvent {
        uid: journey.section_id.clone(),
        summary: summary_for(config, journey),
        start,
        end,
        location: journey.origin_name.clone(),
    })
}

fn summary_for(config: &TripConfig, journey: &NormalizedJourney) -> String {
    let route = config.route_label();
    if journey.cancelled {
        format!("{route} (cancelled)")
    } else if journey.has_delay() {
        format!("{route} (delayed {} min)", journey.delay_minutes)
    } else {
        route
    }
}
