//! SNCF/Navitia API client layer.
//!
//! Talks to the Navitia v1 coverage API: journey search between two stop
//! areas and stop-area lookup for the setup surface. The [`JourneySource`]
//! and [`StationSource`] traits are the seams the rest of the crate depends
//! on; [`NavitiaClient`] is the real implementation and
//! [`MockNavitiaClient`] serves fixtures for tests and development.

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{NavitiaClient, NavitiaConfig};
pub use convert::normalize;
pub use error::NavitiaError;
pub use mock::MockNavitiaClient;
pub use types::{
    DisplayInformations, JourneysResponse, Place, PlaceEntry, PlacesResponse, RawJourney, Section,
    StopAreaDto,
};

use std::future::Future;

use chrono::NaiveDateTime;

use crate::domain::StopAreaId;

/// Source of journey data for the refresh engine.
///
/// `departure_after` is the forward-looking anchor computed by the window
/// policy; implementations must return the raw upstream records without
/// filtering so normalization stays in one place.
///
/// `Ok(None)` means the upstream answered without journey data at all —
/// distinct from `Ok(Some(vec![]))`, a well-formed empty result.
pub trait JourneySource {
    fn search_journeys(
        &self,
        origin: &StopAreaId,
        destination: &StopAreaId,
        departure_after: NaiveDateTime,
        count: u8,
    ) -> impl Future<Output = Result<Option<Vec<RawJourney>>, NavitiaError>> + Send;
}

/// Source of stop-area search results for the setup surface.
pub trait StationSource {
    fn search_stations(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<PlaceEntry>, NavitiaError>> + Send;
}
