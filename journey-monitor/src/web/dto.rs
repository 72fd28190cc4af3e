//! Request and response DTOs for the web layer.

use serde::{Deserialize, Serialize};

use crate::engine::EngineStatus;
use crate::stations::StationMatch;
use crate::views::{CalendarEvent, TrainEntity, TripSummary};

/// Error payload returned with non-success status codes.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wire label for an engine status.
pub fn status_label(status: EngineStatus) -> &'static str {
    match status {
        EngineStatus::Running => "running",
        EngineStatus::AuthRequired => "reauthentication_required",
    }
}

/// One entry in the trips listing.
#[derive(Debug, Serialize)]
pub struct TripListEntry {
    pub id: String,
    pub route: String,
    pub status: &'static str,
}

/// Trip summary with its id and engine status.
#[derive(Debug, Serialize)]
pub struct TripSummaryResponse {
    pub id: String,
    pub status: &'static str,
    #[serde(flatten)]
    pub summary: TripSummary,
}

/// Per-train entities for one trip.
#[derive(Debug, Serialize)]
pub struct TrainsResponse {
    pub trains: Vec<TrainEntity>,
}

/// Calendar events for one trip.
#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub events: Vec<CalendarEvent>,
}

/// Query parameters for the calendar range endpoint, in Navitia datetime
/// format (`%Y%m%dT%H%M%S`).
#[derive(Debug, Deserialize)]
pub struct CalendarRangeParams {
    pub start: String,
    pub end: String,
}

/// Query parameters for station search.
#[derive(Debug, Deserialize)]
pub struct StationSearchParams {
    pub q: String,
}

/// Stop areas matching a search query.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationMatch>,
}
