//! Navitia API response DTOs.
//!
//! These types map directly to the Navitia v1 JSON responses. They use
//! `Option` liberally because Navitia omits fields rather than sending
//! nulls, and real payloads are routinely missing timestamps or display
//! metadata.

use serde::Deserialize;

/// Response from `GET /journeys`.
#[derive(Debug, Clone, Deserialize)]
pub struct JourneysResponse {
    /// Absent entirely when the query matches nothing.
    pub journeys: Option<Vec<RawJourney>>,
}

/// One journey as returned by the API.
///
/// A journey with more than one section requires a transfer; only
/// single-section ("direct") journeys are of interest downstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJourney {
    /// Real-time departure, `%Y%m%dT%H%M%S`.
    pub departure_date_time: Option<String>,

    /// Real-time arrival, `%Y%m%dT%H%M%S`.
    pub arrival_date_time: Option<String>,

    /// Commercial train number, when present at the journey level.
    pub trip_short_name: Option<String>,

    /// Journey status, e.g. `cancelled` during disruption.
    pub status: Option<String>,

    /// Legs of the journey. Empty or multiple means not a direct train.
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl RawJourney {
    /// True when the journey is a single train with no transfers.
    pub fn is_direct(&self) -> bool {
        self.sections.len() == 1
    }
}

/// One leg of a journey.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Section {
    pub id: Option<String>,

    /// Timetabled ("base") departure, `%Y%m%dT%H%M%S`.
    pub base_departure_date_time: Option<String>,

    /// Timetabled ("base") arrival, `%Y%m%dT%H%M%S`.
    pub base_arrival_date_time: Option<String>,

    pub display_informations: Option<DisplayInformations>,

    /// Boarding stop of this section.
    #[serde(rename = "from")]
    pub origin: Option<Place>,
}

/// Display metadata attached to a section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayInformations {
    pub direction: Option<String>,
    pub physical_mode: Option<String>,
    pub commercial_mode: Option<String>,
    pub trip_short_name: Option<String>,
    /// Numeric train identifier; fallback when `trip_short_name` is absent.
    pub num: Option<String>,
    pub headsign: Option<String>,
}

/// A stop or place reference embedded in a section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Place {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Response from `GET /places`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub places: Vec<PlaceEntry>,
}

/// One match from a places search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceEntry {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Present when the match is a stop area (the only kind requested).
    pub stop_area: Option<StopAreaDto>,
}

/// Stop-area payload inside a place entry.
#[derive(Debug, Clone, Deserialize)]
pub struct StopAreaDto {
    pub id: String,
    pub name: Option<String>,
}
