//! Mock Navitia client for testing without API access.
//!
//! Serves journeys from a JSON fixture file (or directly from memory) as if
//! they were live API responses.

use std::path::Path;

use chrono::NaiveDateTime;

use crate::domain::StopAreaId;

use super::error::NavitiaError;
use super::types::{JourneysResponse, PlaceEntry, RawJourney};
use super::{JourneySource, StationSource};

/// Mock Navitia client backed by a fixed set of journeys.
///
/// Useful for development and testing without real API credentials. Query
/// parameters are ignored; the same journeys are returned for every search.
#[derive(Debug, Clone)]
pub struct MockNavitiaClient {
    journeys: Vec<RawJourney>,
    stations: Vec<PlaceEntry>,
}

impl MockNavitiaClient {
    /// Create a mock client serving the given journeys.
    pub fn with_journeys(journeys: Vec<RawJourney>) -> Self {
        Self {
            journeys,
            stations: Vec::new(),
        }
    }

    /// Create a mock client from a JSON fixture file.
    ///
    /// The file must contain a full journeys response, i.e.
    /// `{"journeys": [...]}`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NavitiaError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|e| NavitiaError::Api {
            status: 0,
            message: format!("Failed to read {:?}: {}", path, e),
        })?;

        let response: JourneysResponse =
            serde_json::from_str(&json).map_err(|e| NavitiaError::Json {
                message: e.to_string(),
                body: Some(json.chars().take(500).collect()),
            })?;

        Ok(Self {
            journeys: response.journeys.unwrap_or_default(),
            stations: Vec::new(),
        })
    }

    /// Set the station search results the mock serves.
    pub fn with_stations(mut self, stations: Vec<PlaceEntry>) -> Self {
        self.stations = stations;
        self
    }
}

impl JourneySource for MockNavitiaClient {
    async fn search_journeys(
        &self,
        _origin: &StopAreaId,
        _destination: &StopAreaId,
        _departure_after: NaiveDateTime,
        count: u8,
    ) -> Result<Option<Vec<RawJourney>>, NavitiaError> {
        Ok(Some(
            self.journeys
                .iter()
                .take(count as usize)
                .cloned()
                .collect(),
        ))
    }
}

impl StationSource for MockNavitiaClient {
    async fn search_stations(&self, query: &str) -> Result<Vec<PlaceEntry>, NavitiaError> {
        let query = query.to_lowercase();
        Ok(self
            .stations
            .iter()
            .filter(|p| {
                p.name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&query))
            })
            .cloned()
            .collect())
    }
}
