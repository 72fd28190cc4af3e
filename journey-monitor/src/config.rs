//! Trip configuration.
//!
//! A `TripConfig` is the single resolved configuration value object for one
//! monitored route. It is built once at setup time — with all validation
//! happening there — and replaced wholesale on reconfiguration; nothing
//! downstream ever consults raw options or defaults again.

use std::time::Duration;

use chrono::NaiveDateTime;

use crate::domain::{PollingRegime, StopAreaId, TimeWindow};

/// Default polling interval inside the active window (minutes).
pub const DEFAULT_BASE_INTERVAL_MINS: u64 = 2;

/// Default polling interval outside the window (minutes).
pub const DEFAULT_OFF_WINDOW_INTERVAL_MINS: u64 = 60;

/// Default number of per-train entities published.
pub const DEFAULT_MAX_TRAINS: usize = 5;

/// Number of journeys requested from the upstream API per refresh.
pub const FETCH_COUNT: u8 = 10;

/// Resolved configuration for one monitored trip.
#[derive(Debug, Clone)]
pub struct TripConfig {
    /// Boarding stop area.
    pub origin: StopAreaId,
    /// Destination stop area.
    pub destination: StopAreaId,
    /// Display name of the boarding station.
    pub origin_name: String,
    /// Display name of the destination station.
    pub destination_name: String,
    /// Daily window during which this trip's trains matter.
    pub window: TimeWindow,
    /// Cap on the number of per-train entities.
    pub max_trains: usize,
    /// Polling interval inside the window (minutes).
    pub base_interval_mins: u64,
    /// Polling interval outside the window (minutes).
    pub off_window_interval_mins: u64,
}

impl TripConfig {
    /// Create a configuration with default intervals and train count.
    pub fn new(
        origin: StopAreaId,
        destination: StopAreaId,
        origin_name: impl Into<String>,
        destination_name: impl Into<String>,
        window: TimeWindow,
    ) -> Self {
        Self {
            origin,
            destination,
            origin_name: origin_name.into(),
            destination_name: destination_name.into(),
            window,
            max_trains: DEFAULT_MAX_TRAINS,
            base_interval_mins: DEFAULT_BASE_INTERVAL_MINS,
            off_window_interval_mins: DEFAULT_OFF_WINDOW_INTERVAL_MINS,
        }
    }

    /// Set the per-train entity cap.
    pub fn with_max_trains(mut self, max_trains: usize) -> Self {
        self.max_trains = max_trains;
        self
    }

    /// Set the in-window and off-window polling intervals, in minutes.
    pub fn with_intervals(mut self, base_mins: u64, off_window_mins: u64) -> Self {
        self.base_interval_mins = base_mins;
        self.off_window_interval_mins = off_window_mins;
        self
    }

    /// Returns the in-window polling interval.
    pub fn base_interval(&self) -> Duration {
        Duration::from_secs(self.base_interval_mins * 60)
    }

    /// Returns the off-window polling interval.
    pub fn off_window_interval(&self) -> Duration {
        Duration::from_secs(self.off_window_interval_mins * 60)
    }

    /// The polling interval to use right now.
    ///
    /// Re-evaluated at every schedule point so the cadence adapts as the
    /// window opens and closes.
    pub fn current_interval(&self, now: NaiveDateTime) -> Duration {
        match self.window.regime(now) {
            PollingRegime::Active => self.base_interval(),
            PollingRegime::Idle => self.off_window_interval(),
        }
    }

    /// Human-readable route label, e.g. `Paris Gare de Lyon → Marseille`.
    pub fn route_label(&self) -> String {
        format!("{} → {}", self.origin_name, self.destination_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config() -> TripConfig {
        TripConfig::new(
            StopAreaId::parse("stop_area:SNCF:87686006").unwrap(),
            StopAreaId::parse("stop_area:SNCF:87751008").unwrap(),
            "Paris Gare de Lyon",
            "Marseille St-Charles",
            TimeWindow::parse("07:00", "10:00").unwrap(),
        )
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn defaults() {
        let config = config();

        assert_eq!(config.max_trains, DEFAULT_MAX_TRAINS);
        assert_eq!(config.base_interval(), Duration::from_secs(2 * 60));
        assert_eq!(config.off_window_interval(), Duration::from_secs(60 * 60));
    }

    #[test]
    fn builders() {
        let config = config().with_max_trains(3).with_intervals(5, 30);

        assert_eq!(config.max_trains, 3);
        assert_eq!(config.base_interval(), Duration::from_secs(5 * 60));
        assert_eq!(config.off_window_interval(), Duration::from_secs(30 * 60));
    }

    #[test]
    fn interval_follows_regime() {
        let config = config();

        // Pre-roll: frequent polling
        assert_eq!(config.current_interval(at(6, 30)), config.base_interval());
        // In window
        assert_eq!(config.current_interval(at(8, 0)), config.base_interval());
        // After close: relaxed polling
        assert_eq!(
            config.current_interval(at(11, 0)),
            config.off_window_interval()
        );
    }

    #[test]
    fn route_label_format() {
        assert_eq!(
            config().route_label(),
            "Paris Gare de Lyon → Marseille St-Charles"
        );
    }
}
