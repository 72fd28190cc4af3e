//! Normalized journey type.
//!
//! A `NormalizedJourney` is the immutable, derived view of one upstream
//! journey record: real and scheduled times, the delay and duration in
//! whole minutes, and the display metadata the entities expose. Instances
//! are recomputed from scratch on every refresh cycle and never mutated in
//! place.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::time::format_display;

/// Delay in whole minutes between the real and scheduled arrival.
///
/// Truncated toward zero and clamped at zero: arriving early counts as no
/// delay. If either timestamp is unknown the delay is 0 — an unknown delay
/// is deliberately reported as "on time" rather than failing the refresh.
pub fn delay_minutes(arrival: Option<NaiveDateTime>, scheduled_arrival: Option<NaiveDateTime>) -> i64 {
    match (arrival, scheduled_arrival) {
        (Some(arrival), Some(scheduled)) => (arrival - scheduled).num_minutes().max(0),
        _ => 0,
    }
}

/// Journey duration in whole minutes between real departure and arrival.
///
/// 0 if either timestamp is unknown.
pub fn duration_minutes(departure: Option<NaiveDateTime>, arrival: Option<NaiveDateTime>) -> i64 {
    match (departure, arrival) {
        (Some(departure), Some(arrival)) => (arrival - departure).num_minutes(),
        _ => 0,
    }
}

/// One direct journey, normalized from the upstream payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedJourney {
    /// Real-time departure.
    pub departure: Option<NaiveDateTime>,
    /// Real-time arrival.
    pub arrival: Option<NaiveDateTime>,
    /// Timetabled ("base") departure.
    pub scheduled_departure: Option<NaiveDateTime>,
    /// Timetabled ("base") arrival.
    pub scheduled_arrival: Option<NaiveDateTime>,
    /// Minutes late at arrival; never negative.
    pub delay_minutes: i64,
    /// Real departure → real arrival, in minutes.
    pub duration_minutes: i64,
    /// Commercial train number, empty when the payload has none.
    pub train_number: String,
    pub direction: String,
    pub physical_mode: String,
    pub commercial_mode: String,
    /// Upstream marked this journey as cancelled.
    pub cancelled: bool,
    /// Section id, used as the calendar event uid.
    pub section_id: Option<String>,
    /// Name of the boarding stop, used as the calendar event location.
    pub origin_name: Option<String>,
}

impl NormalizedJourney {
    /// True when the journey is running late.
    pub fn has_delay(&self) -> bool {
        self.delay_minutes > 0
    }

    /// Real departure formatted for display.
    pub fn departure_display(&self) -> String {
        format_display(self.departure)
    }

    /// Real arrival formatted for display.
    pub fn arrival_display(&self) -> String {
        format_display(self.arrival)
    }

    /// Scheduled departure formatted for display.
    pub fn scheduled_departure_display(&self) -> String {
        format_display(self.scheduled_departure)
    }

    /// Scheduled arrival formatted for display.
    pub fn scheduled_arrival_display(&self) -> String {
        format_display(self.scheduled_arrival)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> Option<NaiveDateTime> {
        Some(
            NaiveDate::from_ymd_opt(2026, 3, 15)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
        )
    }

    #[test]
    fn delay_late_arrival() {
        assert_eq!(delay_minutes(at(10, 12), at(10, 0)), 12);
    }

    #[test]
    fn delay_on_time_is_zero() {
        assert_eq!(delay_minutes(at(10, 0), at(10, 0)), 0);
    }

    #[test]
    fn delay_early_arrival_clamps_to_zero() {
        assert_eq!(delay_minutes(at(9, 55), at(10, 0)), 0);
    }

    #[test]
    fn delay_unknown_timestamps_are_zero() {
        assert_eq!(delay_minutes(None, at(10, 0)), 0);
        assert_eq!(delay_minutes(at(10, 0), None), 0);
        assert_eq!(delay_minutes(None, None), 0);
    }

    #[test]
    fn duration_simple() {
        assert_eq!(duration_minutes(at(10, 0), at(11, 25)), 85);
    }

    #[test]
    fn duration_unknown_is_zero() {
        assert_eq!(duration_minutes(None, at(11, 0)), 0);
        assert_eq!(duration_minutes(at(10, 0), None), 0);
    }

    #[test]
    fn has_delay_threshold() {
        let mut journey = NormalizedJourney {
            departure: at(10, 0),
            arrival: at(11, 0),
            scheduled_departure: at(10, 0),
            scheduled_arrival: at(11, 0),
            delay_minutes: 0,
            duration_minutes: 60,
            train_number: "6607".to_string(),
            direction: String::new(),
            physical_mode: String::new(),
            commercial_mode: String::new(),
            cancelled: false,
            section_id: None,
            origin_name: None,
        };
        assert!(!journey.has_delay());

        journey.delay_minutes = 1;
        assert!(journey.has_delay());
    }

    #[test]
    fn display_accessors_degrade_to_label() {
        let journey = NormalizedJourney {
            departure: at(10, 0),
            arrival: None,
            scheduled_departure: None,
            scheduled_arrival: None,
            delay_minutes: 0,
            duration_minutes: 0,
            train_number: String::new(),
            direction: String::new(),
            physical_mode: String::new(),
            commercial_mode: String::new(),
            cancelled: false,
            section_id: None,
            origin_name: None,
        };

        assert_eq!(journey.departure_display(), "15/03/2026 - 10:00");
        assert_eq!(journey.arrival_display(), "N/A");
        assert_eq!(journey.scheduled_departure_display(), "N/A");
    }
}
