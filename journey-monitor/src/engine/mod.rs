//! The stateful refresh core.
//!
//! One [`RefreshEngine`] owns the live [`Snapshot`] and polling cadence for
//! a single trip; the [`TripRegistry`] maps trip identity to a running
//! engine with an explicit create/replace/remove lifecycle.

mod refresh;
mod registry;
mod snapshot;

pub use refresh::{EngineStatus, RefreshEngine, RefreshOutcome};
pub use registry::{TripId, TripRegistry};
pub use snapshot::Snapshot;
