//! Trip-summary projection.

use serde::Serialize;

use crate::config::TripConfig;
use crate::engine::Snapshot;

/// Aggregate attributes exposed on the trip-summary entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryAttributes {
    /// Formatted real departure time of every journey, in order.
    pub departure_times: Vec<String>,
    /// Per-journey delay, aligned with `departure_times`.
    pub delays_minutes: Vec<i64>,
    /// True when any journey in the snapshot is running late.
    pub has_delay: bool,
    /// Configured in-window polling interval, for observability.
    pub update_interval_mins: u64,
    /// Configured off-window polling interval, for observability.
    pub off_window_interval_mins: u64,
}

/// The trip-summary entity: journey count plus aggregate attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripSummary {
    pub route: String,
    /// Number of direct journeys in the snapshot.
    pub journey_count: usize,
    /// False until the first successful fetch; a later failed cycle keeps
    /// the entity available with its last-known-good values.
    pub available: bool,
    /// Whether the most recent refresh cycle succeeded.
    pub last_update_success: bool,
    pub attributes: SummaryAttributes,
}

/// Project the trip-summary entity from a snapshot.
pub fn project_summary(config: &TripConfig, snapshot: &Snapshot) -> TripSummary {
    TripSummary {
        route: config.route_label(),
        journey_count: snapshot.journeys.len(),
        available: snapshot.has_data(),
        last_update_success: snapshot.last_update_success,
        attributes: SummaryAttributes {
            departure_times: snapshot
                .journeys
                .iter()
                .map(|j| j.departure_display())
                .collect(),
            delays_minutes: snapshot.journeys.iter().map(|j| j.delay_minutes).collect(),
            has_delay: snapshot.any_delay(),
            update_interval_mins: config.base_interval_mins,
            off_window_interval_mins: config.off_window_interval_mins,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NormalizedJourney, StopAreaId, TimeWindow};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> Option<NaiveDateTime> {
        Some(
            NaiveDate::from_ymd_opt(2026, 3, 15)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
        )
    }

    fn journey(dep_h: u32, dep_m: u32, delay: i64) -> NormalizedJourney {
        NormalizedJourney {
            departure: at(dep_h, dep_m),
            arrival: at(dep_h + 1, dep_m),
            scheduled_departure: at(dep_h, dep_m),
            scheduled_arrival: at(dep_h + 1, dep_m),
            delay_minutes: delay,
            duration_minutes: 60,
            train_number: "6607".to_string(),
            direction: String::new(),
            physical_mode: String::new(),
            commercial_mode: String::new(),
            cancelled: false,
            section_id: None,
            origin_name: None,
        }
    }

    fn config() -> TripConfig {
        TripConfig::new(
            StopAreaId::parse("stop_area:SNCF:87686006").unwrap(),
            StopAreaId::parse("stop_area:SNCF:87751008").unwrap(),
            "Paris Gare de Lyon",
            "Marseille St-Charles",
            TimeWindow::parse("07:00", "10:00").unwrap(),
        )
    }

    #[test]
    fn summary_counts_and_aggregates() {
        let snapshot = Snapshot {
            journeys: vec![journey(7, 5, 0), journey(8, 30, 12)],
            fetched_at: at(6, 30),
            last_update_success: true,
        };

        let summary = project_summary(&config(), &snapshot);

        assert_eq!(summary.journey_count, 2);
        assert!(summary.available);
        assert!(summary.last_update_success);
        assert_eq!(
            summary.attributes.departure_times,
            vec!["15/03/2026 - 07:05", "15/03/2026 - 08:30"]
        );
        assert_eq!(summary.attributes.delays_minutes, vec![0, 12]);
        assert!(summary.attributes.has_delay);
        assert_eq!(summary.attributes.update_interval_mins, 2);
        assert_eq!(summary.attributes.off_window_interval_mins, 60);
    }

    #[test]
    fn never_fetched_is_unavailable() {
        let summary = project_summary(&config(), &Snapshot::default());

        assert_eq!(summary.journey_count, 0);
        assert!(!summary.available);
        assert!(!summary.attributes.has_delay);
    }

    #[test]
    fn failed_cycle_keeps_entity_available() {
        let snapshot = Snapshot {
            journeys: vec![journey(7, 5, 0)],
            fetched_at: at(6, 30),
            last_update_success: false,
        };

        let summary = project_summary(&config(), &snapshot);

        // Last-known-good: still available, but the failure is visible
        assert!(summary.available);
        assert!(!summary.last_update_success);
        assert_eq!(summary.journey_count, 1);
    }
}
