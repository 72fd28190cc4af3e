//! Domain types for the journey monitor.
//!
//! This module contains the pure core of the crate: validated identifiers,
//! timestamp handling, the daily polling-window policy, and the normalized
//! journey type. Nothing here touches the clock or the network; "now" is
//! always a parameter.

mod journey;
mod stop_area;
mod time;
mod window;

pub use journey::{NormalizedJourney, delay_minutes, duration_minutes};
pub use stop_area::{InvalidStopAreaId, StopAreaId};
pub use time::{
    UNKNOWN_TIME_LABEL, format_display, format_navitia_datetime, parse_navitia_datetime,
};
pub use window::{InvalidTimeWindow, PollingRegime, TimeWindow};
