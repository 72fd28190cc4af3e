use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use journey_monitor::config::TripConfig;
use journey_monitor::domain::{StopAreaId, TimeWindow};
use journey_monitor::engine::{TripId, TripRegistry};
use journey_monitor::navitia::{NavitiaClient, NavitiaConfig};
use journey_monitor::stations::{StationSearch, StationSearchConfig};
use journey_monitor::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Get credentials from environment
    let api_key = std::env::var("SNCF_API_KEY").unwrap_or_else(|_| {
        warn!("SNCF_API_KEY not set. API calls will fail.");
        String::new()
    });

    // Create Navitia client
    let client = Arc::new(
        NavitiaClient::new(NavitiaConfig::new(&api_key)).expect("Failed to create Navitia client"),
    );

    // Trip registry and cached station search
    let registry = Arc::new(TripRegistry::new(client.clone()));
    let stations = Arc::new(StationSearch::new(
        client.clone(),
        &StationSearchConfig::default(),
    ));

    // Register the trip configured in the environment, if any
    match trip_from_env() {
        Some((id, config)) => {
            info!(trip = %id, route = %config.route_label(), window = %config.window, "registering trip");
            registry.insert(id, config).await;
        }
        None => {
            warn!("SNCF_FROM/SNCF_TO not set, starting with no trips");
        }
    }

    // Build app state and router
    let state = AppState::new(registry, stations);
    let app = create_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Journey monitor listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health                      - Health check");
    println!("  GET  /trips                       - List monitored trips");
    println!("  GET  /trips/:id                   - Trip summary");
    println!("  GET  /trips/:id/trains            - Per-train entities");
    println!("  GET  /trips/:id/calendar          - Calendar events in a range");
    println!("  GET  /trips/:id/calendar/current  - Event closest to now");
    println!("  GET  /stations/search             - Stop-area search");
    println!("  POST /refresh                     - Refresh all trips now");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Build a trip configuration from environment variables.
///
/// Returns `None` when `SNCF_FROM` or `SNCF_TO` is missing; malformed
/// values abort startup since a half-configured trip cannot poll.
fn trip_from_env() -> Option<(TripId, TripConfig)> {
    let from = std::env::var("SNCF_FROM").ok()?;
    let to = std::env::var("SNCF_TO").ok()?;

    let origin = StopAreaId::parse(&from).expect("Invalid SNCF_FROM stop-area id");
    let destination = StopAreaId::parse(&to).expect("Invalid SNCF_TO stop-area id");

    let origin_name = std::env::var("SNCF_FROM_NAME").unwrap_or_else(|_| from.clone());
    let destination_name = std::env::var("SNCF_TO_NAME").unwrap_or_else(|_| to.clone());

    let time_start = std::env::var("SNCF_TIME_START").unwrap_or_else(|_| "07:00".to_string());
    let time_end = std::env::var("SNCF_TIME_END").unwrap_or_else(|_| "10:00".to_string());
    let window =
        TimeWindow::parse(&time_start, &time_end).expect("Invalid SNCF_TIME_START/SNCF_TIME_END");

    let mut config = TripConfig::new(origin, destination, origin_name, destination_name, window);

    if let Ok(max_trains) = std::env::var("SNCF_TRAIN_COUNT") {
        config = config.with_max_trains(max_trains.parse().expect("Invalid SNCF_TRAIN_COUNT"));
    }

    let base = env_minutes("SNCF_UPDATE_INTERVAL").unwrap_or(config.base_interval_mins);
    let off = env_minutes("SNCF_OUTSIDE_INTERVAL").unwrap_or(config.off_window_interval_mins);
    config = config.with_intervals(base, off);

    Some((TripId::new("default"), config))
}

fn env_minutes(var: &str) -> Option<u64> {
    let value = std::env::var(var).ok()?;
    Some(
        value
            .parse()
            .unwrap_or_else(|_| panic!("Invalid {var}: {value}")),
    )
}
