//! Refresh snapshots.

use chrono::NaiveDateTime;

use crate::domain::NormalizedJourney;

/// The current set of normalized journeys for one trip.
///
/// Replaced atomically on every successful refresh. On a failed refresh the
/// journeys and fetch time are retained unchanged and only the success tag
/// flips (last-known-good): the journey list is never partially updated.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Direct journeys, in upstream departure order.
    pub journeys: Vec<NormalizedJourney>,

    /// Local time of the last successful fetch; `None` before the first one.
    pub fetched_at: Option<NaiveDateTime>,

    /// Whether the most recent refresh cycle succeeded.
    pub last_update_success: bool,
}

impl Snapshot {
    /// True once at least one fetch has succeeded.
    pub fn has_data(&self) -> bool {
        self.fetched_at.is_some()
    }

    /// True when any journey in the snapshot is running late.
    pub fn any_delay(&self) -> bool {
        self.journeys.iter().any(|j| j.has_delay())
    }
}
