//! Read-only projections over refresh snapshots.
//!
//! Three presentation shapes over one snapshot: a trip summary, per-train
//! entities, and a calendar feed. Projections are pure functions of
//! `(config, snapshot)`; the [`TripPublisher`] is the observer that reacts
//! to snapshot change notifications and keeps the published entities
//! current. Nothing in this module ever calls the upstream API.

pub mod calendar;
mod publisher;
mod summary;
mod trains;

pub use calendar::CalendarEvent;
pub use publisher::TripPublisher;
pub use summary::{SummaryAttributes, TripSummary, project_summary};
pub use trains::{TrainAttributes, TrainBoard, TrainEntity};
