//! Navitia timestamp handling.
//!
//! Navitia sends datetimes as naive local strings in `%Y%m%dT%H%M%S` format
//! (e.g. `20260315T143000`). Timestamps are frequently absent or empty in
//! real payloads, so parsing is total: bad input yields `None`, never an
//! error, and consumers degrade to an "unknown" label instead of failing a
//! whole refresh.

use chrono::NaiveDateTime;

/// Wire format used by Navitia for datetimes.
const NAVITIA_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Display format for entity attributes.
const DISPLAY_FORMAT: &str = "%d/%m/%Y - %H:%M";

/// Label shown when a timestamp is absent or unparseable.
pub const UNKNOWN_TIME_LABEL: &str = "N/A";

/// Parse a Navitia datetime string.
///
/// Returns `None` for empty or malformed input.
///
/// # Examples
///
/// ```
/// use journey_monitor::domain::parse_navitia_datetime;
///
/// assert!(parse_navitia_datetime("20260315T143000").is_some());
/// assert!(parse_navitia_datetime("").is_none());
/// assert!(parse_navitia_datetime("2026-03-15 14:30").is_none());
/// ```
pub fn parse_navitia_datetime(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, NAVITIA_FORMAT).ok()
}

/// Format a datetime in the Navitia wire format.
pub fn format_navitia_datetime(dt: NaiveDateTime) -> String {
    dt.format(NAVITIA_FORMAT).to_string()
}

/// Format an optional datetime as `dd/mm/YYYY - HH:MM` for display.
///
/// Unknown timestamps render as [`UNKNOWN_TIME_LABEL`].
pub fn format_display(dt: Option<NaiveDateTime>) -> String {
    match dt {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => UNKNOWN_TIME_LABEL.to_string(),
    }
}
