//! Refresh engine: fetch, normalize, publish, reschedule.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use crate::config::{FETCH_COUNT, TripConfig};
use crate::navitia::{JourneySource, NavitiaError, normalize};

use super::snapshot::Snapshot;

/// Outcome of a single refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Snapshot replaced with this many direct journeys.
    Updated(usize),

    /// Another refresh was still in flight; this wake-up was coalesced.
    Skipped,

    /// Transient failure; snapshot retained as last-known-good and the
    /// next scheduled cycle will retry.
    TransientFailure,

    /// Credentials rejected upstream. Retrying on a schedule cannot heal
    /// this; the host must reconfigure.
    AuthRequired,
}

/// Health of the polling loop, observable by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Running,
    /// Polling has stopped because the API key was rejected.
    AuthRequired,
}

/// Owns one trip's live snapshot and polling cadence.
///
/// The engine fetches journeys for its configured route, normalizes them to
/// the direct-only set, and publishes the result through a watch channel
/// that the view projections subscribe to. At most one refresh per engine
/// is ever in flight; the polling loop re-evaluates its sleep interval
/// against the window policy at every schedule point.
pub struct RefreshEngine<S> {
    config: TripConfig,
    source: Arc<S>,
    snapshot_tx: watch::Sender<Snapshot>,
    status_tx: watch::Sender<EngineStatus>,
    in_flight: Mutex<()>,
}

impl<S: JourneySource + Send + Sync + 'static> RefreshEngine<S> {
    /// Create an engine for one trip. No fetch happens until [`refresh`]
    /// or [`run`] is called.
    ///
    /// [`refresh`]: RefreshEngine::refresh
    /// [`run`]: RefreshEngine::run
    pub fn new(config: TripConfig, source: Arc<S>) -> Self {
        let (snapshot_tx, _) = watch::channel(Snapshot::default());
        let (status_tx, _) = watch::channel(EngineStatus::Running);

        Self {
            config,
            source,
            snapshot_tx,
            status_tx,
            in_flight: Mutex::new(()),
        }
    }

    /// The trip this engine polls for.
    pub fn config(&self) -> &TripConfig {
        &self.config
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Subscribe to engine health changes.
    pub fn status(&self) -> watch::Receiver<EngineStatus> {
        self.status_tx.subscribe()
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Run one refresh cycle against the current wall clock.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.refresh_at(Local::now().naive_local()).await
    }

    /// Run one refresh cycle, treating `now` as the current local time.
    ///
    /// A call that arrives while another refresh is still running returns
    /// [`RefreshOutcome::Skipped`] immediately: wake-ups are coalesced, not
    /// queued. Transient failures never propagate as errors; the snapshot
    /// keeps its last-known-good journeys and only the success tag flips.
    pub async fn refresh_at(&self, now: NaiveDateTime) -> RefreshOutcome {
        let route = self.config.route_label();

        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!(route = %route, "refresh already in flight, skipping wake-up");
            return RefreshOutcome::Skipped;
        };

        let anchor = self.config.window.next_request_anchor(now);
        let result = self
            .source
            .search_journeys(
                &self.config.origin,
                &self.config.destination,
                anchor,
                FETCH_COUNT,
            )
            .await;

        match result {
            Ok(Some(raw)) => {
                let journeys: Vec<_> = raw.iter().filter_map(normalize).collect();
                let count = journeys.len();

                info!(
                    route = %route,
                    fetched = raw.len(),
                    direct = count,
                    "refreshed journeys"
                );

                self.snapshot_tx.send_replace(Snapshot {
                    journeys,
                    fetched_at: Some(now),
                    last_update_success: true,
                });

                RefreshOutcome::Updated(count)
            }
            Ok(None) => {
                warn!(route = %route, "upstream returned no journey data, keeping last known journeys");

                self.snapshot_tx
                    .send_modify(|s| s.last_update_success = false);

                RefreshOutcome::TransientFailure
            }
            Err(NavitiaError::Unauthorized) => {
                error!(route = %route, "API key rejected, polling stopped until reconfiguration");

                self.snapshot_tx
                    .send_modify(|s| s.last_update_success = false);
                self.status_tx.send_replace(EngineStatus::AuthRequired);

                RefreshOutcome::AuthRequired
            }
            Err(NavitiaError::RateLimited) => {
                warn!(route = %route, "rate limited, keeping last known journeys");

                self.snapshot_tx
                    .send_modify(|s| s.last_update_success = false);

                RefreshOutcome::TransientFailure
            }
            Err(err) => {
                warn!(route = %route, error = %err, "refresh failed, keeping last known journeys");

                self.snapshot_tx
                    .send_modify(|s| s.last_update_success = false);

                RefreshOutcome::TransientFailure
            }
        }
    }

    /// Polling loop: refresh immediately, then sleep whatever interval the
    /// window policy dictates at each schedule point.
    ///
    /// Exits when the upstream rejects credentials, leaving
    /// [`EngineStatus::AuthRequired`] on the status channel. The caller
    /// owns the spawned task and must abort it on teardown.
    pub async fn run(self: Arc<Self>) {
        loop {
            if self.refresh().await == RefreshOutcome::AuthRequired {
                break;
            }

            let now = Local::now().naive_local();
            let interval = self.config.current_interval(now);
            debug!(
                route = %self.config.route_label(),
                secs = interval.as_secs(),
                regime = ?self.config.window.regime(now),
                "next refresh scheduled"
            );
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StopAreaId, TimeWindow};
    use crate::navitia::{RawJourney, Section};
    use chrono::NaiveDate;
    use std::collections::VecDeque;
    use tokio::sync::Notify;

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

    fn direct_journey(dep: &str, arr: &str) -> RawJourney {
        RawJourney {
            departure_date_time: Some(dep.to_string()),
            arrival_date_time: Some(arr.to_string()),
            sections: vec![Section {
                id: Some("s0".to_string()),
                base_departure_date_time: Some(dep.to_string()),
                base_arrival_date_time: Some(arr.to_string()),
                ..Section::default()
            }],
            ..RawJourney::default()
        }
    }

    fn two_section_journey() -> RawJourney {
        RawJourney {
            sections: vec![Section::default(), Section::default()],
            ..RawJourney::default()
        }
    }

    /// Source that replays a scripted sequence of responses.
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Option<Vec<RawJourney>>, NavitiaError>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Option<Vec<RawJourney>>, NavitiaError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
            })
        }
    }

    impl JourneySource for ScriptedSource {
        async fn search_journeys(
            &self,
            _origin: &StopAreaId,
            _destination: &StopAreaId,
            _departure_after: NaiveDateTime,
            _count: u8,
        ) -> Result<Option<Vec<RawJourney>>, NavitiaError> {
            self.responses
                .lock()
                .await
                .pop_front()
                .expect("scripted source exhausted")
        }
    }

    /// Source that blocks until released, for in-flight coalescing tests.
    struct BlockingSource {
        release: Notify,
    }

    impl JourneySource for BlockingSource {
        async fn search_journeys(
            &self,
            _origin: &StopAreaId,
            _destination: &StopAreaId,
            _departure_after: NaiveDateTime,
            _count: u8,
        ) -> Result<Option<Vec<RawJourney>>, NavitiaError> {
            self.release.notified().await;
            Ok(Some(Vec::new()))
        }
    }

    #[tokio::test]
    async fn success_replaces_snapshot() {
        let source = ScriptedSource::new(vec![Ok(Some(vec![
            direct_journey("20260315T070500", "20260315T084200"),
            two_section_journey(),
            direct_journey("20260315T083000", "20260315T100000"),
        ]))]);
        let engine = RefreshEngine::new(config(), source);

        let outcome = engine.refresh_at(at(6, 30)).await;

        // The two-section journey is excluded from the direct set entirely
        assert_eq!(outcome, RefreshOutcome::Updated(2));

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.journeys.len(), 2);
        assert!(snapshot.last_update_success);
        assert_eq!(snapshot.fetched_at, Some(at(6, 30)));
    }

    #[tokio::test]
    async fn empty_result_is_a_successful_refresh() {
        let source = ScriptedSource::new(vec![Ok(Some(Vec::new()))]);
        let engine = RefreshEngine::new(config(), source);

        assert_eq!(engine.refresh_at(at(6, 30)).await, RefreshOutcome::Updated(0));
        assert!(engine.snapshot().last_update_success);
        assert!(engine.snapshot().has_data());
    }

    #[tokio::test]
    async fn absent_result_is_a_failure_not_an_empty_set() {
        let source = ScriptedSource::new(vec![
            Ok(Some(vec![direct_journey(
                "20260315T070500",
                "20260315T084200",
            )])),
            Ok(None),
        ]);
        let engine = RefreshEngine::new(config(), source);

        engine.refresh_at(at(6, 30)).await;
        let outcome = engine.refresh_at(at(6, 32)).await;

        assert_eq!(outcome, RefreshOutcome::TransientFailure);
        // Last-known-good journeys survive the dataless response
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.journeys.len(), 1);
        assert!(!snapshot.last_update_success);
    }

    #[tokio::test]
    async fn transient_failure_keeps_last_known_good() {
        let source = ScriptedSource::new(vec![
            Ok(Some(vec![direct_journey(
                "20260315T070500",
                "20260315T084200",
            )])),
            Err(NavitiaError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        ]);
        let engine = RefreshEngine::new(config(), source);

        engine.refresh_at(at(6, 30)).await;
        let before = engine.snapshot();

        let outcome = engine.refresh_at(at(6, 32)).await;
        assert_eq!(outcome, RefreshOutcome::TransientFailure);

        let after = engine.snapshot();
        // Journeys and fetch time unchanged; only the tag flips
        assert_eq!(after.journeys, before.journeys);
        assert_eq!(after.fetched_at, before.fetched_at);
        assert!(!after.last_update_success);
        // The engine is still healthy
        assert_eq!(*engine.status().borrow(), EngineStatus::Running);
    }

    #[tokio::test]
    async fn auth_failure_is_surfaced_distinctly() {
        let source = ScriptedSource::new(vec![Err(NavitiaError::Unauthorized)]);
        let engine = RefreshEngine::new(config(), source);

        let outcome = engine.refresh_at(at(6, 30)).await;
        assert_eq!(outcome, RefreshOutcome::AuthRequired);
        assert_eq!(*engine.status().borrow(), EngineStatus::AuthRequired);
    }

    #[tokio::test]
    async fn rate_limit_is_transient_not_auth() {
        let source = ScriptedSource::new(vec![Err(NavitiaError::RateLimited)]);
        let engine = RefreshEngine::new(config(), source);

        let outcome = engine.refresh_at(at(6, 30)).await;
        assert_eq!(outcome, RefreshOutcome::TransientFailure);
        assert_eq!(*engine.status().borrow(), EngineStatus::Running);
    }

    #[tokio::test]
    async fn overlapping_refresh_is_skipped() {
        let source = Arc::new(BlockingSource {
            release: Notify::new(),
        });
        let engine = Arc::new(RefreshEngine::new(config(), source.clone()));

        let first = tokio::spawn({
            let engine = engine.clone();
            async move { engine.refresh_at(at(6, 30)).await }
        });

        // Let the first refresh acquire the in-flight guard
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(engine.refresh_at(at(6, 31)).await, RefreshOutcome::Skipped);

        source.release.notify_one();
        assert_eq!(first.await.unwrap(), RefreshOutcome::Updated(0));
    }

    #[tokio::test]
    async fn snapshot_change_notifies_subscribers() {
        let source = ScriptedSource::new(vec![Ok(Some(vec![direct_journey(
            "20260315T070500",
            "20260315T084200",
        )]))]);
        let engine = RefreshEngine::new(config(), source);
        let mut rx = engine.subscribe();

        engine.refresh_at(at(6, 30)).await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().journeys.len(), 1);
    }
}
