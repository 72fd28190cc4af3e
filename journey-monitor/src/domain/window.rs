//! Daily polling-window policy.
//!
//! A trip is configured with a wall-clock window `[start, end)` during which
//! its trains matter. The window drives two decisions: which departure time
//! to ask the upstream API for (a forward-looking anchor, so journeys
//! already past are not requested), and whether polling should currently be
//! frequent or relaxed.
//!
//! Windows may wrap past midnight: `end <= start` is treated as an
//! overnight window whose end falls on the next day.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use std::fmt;

/// Polling starts being frequent this long before the window opens.
const PRE_ROLL_MINUTES: i64 = 60;

/// Error returned when parsing an invalid `HH:MM` window bound.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time window: {reason}")]
pub struct InvalidTimeWindow {
    reason: &'static str,
}

impl InvalidTimeWindow {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Whether polling should currently run at the base or off-window cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollingRegime {
    /// Inside the window (including the one-hour pre-roll).
    Active,
    /// Everything else.
    Idle,
}

/// A daily `[start, end)` wall-clock window.
///
/// # Examples
///
/// ```
/// use journey_monitor::domain::{PollingRegime, TimeWindow};
/// use chrono::NaiveDate;
///
/// let window = TimeWindow::parse("07:00", "10:00").unwrap();
/// let day = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
///
/// // One hour before the window opens, polling is already frequent.
/// let now = day.and_hms_opt(6, 30, 0).unwrap();
/// assert_eq!(window.regime(now), PollingRegime::Active);
///
/// // After the window closes, polling relaxes.
/// let now = day.and_hms_opt(11, 0, 0).unwrap();
/// assert_eq!(window.regime(now), PollingRegime::Idle);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    /// Create a window from already-validated times.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parse a window from two strict `HH:MM` strings.
    ///
    /// Malformed bounds are a configuration error and surface here, at
    /// setup time; the policy functions below are total.
    pub fn parse(start: &str, end: &str) -> Result<Self, InvalidTimeWindow> {
        Ok(Self {
            start: parse_hhmm(start)?,
            end: parse_hhmm(end)?,
        })
    }

    /// Returns the window's opening time.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Returns the window's closing time.
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Window bounds anchored on `day`, with overnight normalization:
    /// `end <= start` pushes the end to the next day.
    fn bounds_on(&self, day: chrono::NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = day.and_time(self.start);
        let mut end = day.and_time(self.end);
        if end <= start {
            end += Duration::days(1);
        }
        (start, end)
    }

    /// The departure time to anchor the next upstream query on.
    ///
    /// Today's window start, or tomorrow's once `now` has passed today's
    /// (overnight-normalized) end. This keeps the query forward-looking so
    /// the API is never asked for journeys that have already run.
    pub fn next_request_anchor(&self, now: NaiveDateTime) -> NaiveDateTime {
        let (start, end) = self.bounds_on(now.date());
        if now > end {
            start + Duration::days(1)
        } else {
            start
        }
    }

    /// Classify `now` into a polling regime.
    ///
    /// Active iff `now` falls within the daily repeating interval
    /// `[start − 1h, end)`. The interval is evaluated cyclically, so both
    /// overnight windows and a pre-roll that wraps into the previous day
    /// (e.g. a 00:30 start whose pre-roll begins at 23:30) are handled.
    pub fn regime(&self, now: NaiveDateTime) -> PollingRegime {
        const DAY_SECS: i64 = 24 * 60 * 60;

        let (start, end) = self.bounds_on(now.date());
        let pre_start = start - Duration::minutes(PRE_ROLL_MINUTES);

        // Pre-roll plus a normalized window can cover a full day or more,
        // in which case there is no idle period at all.
        let active_secs = (end - pre_start).num_seconds();
        if active_secs >= DAY_SECS {
            return PollingRegime::Active;
        }

        let since_pre_start = (now - pre_start).num_seconds().rem_euclid(DAY_SECS);
        if since_pre_start < active_secs {
            PollingRegime::Active
        } else {
            PollingRegime::Idle
        }
    }
}

impl fmt::Debug for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TimeWindow({} - {})",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Parse a strict `HH:MM` wall-clock time.
fn parse_hhmm(s: &str) -> Result<NaiveTime, InvalidTimeWindow> {
    if s.len() != 5 {
        return Err(InvalidTimeWindow::new("expected HH:MM format"));
    }

    let bytes = s.as_bytes();

    if bytes[2] != b':' {
        return Err(InvalidTimeWindow::new("expected colon at position 2"));
    }

    let hour =
        parse_two_digits(&bytes[0..2]).ok_or_else(|| InvalidTimeWindow::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(InvalidTimeWindow::new("hour must be 0-23"));
    }

    let minute = parse_two_digits(&bytes[3..5])
        .ok_or_else(|| InvalidTimeWindow::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(InvalidTimeWindow::new("minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| InvalidTimeWindow::new("invalid time"))
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
