//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Local;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::domain::parse_navitia_datetime;
use crate::engine::TripId;
use crate::navitia::{JourneySource, NavitiaError, StationSource};
use crate::views::CalendarEvent;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S>(state: AppState<S>) -> Router
where
    S: JourneySource + StationSource + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/trips", get(list_trips::<S>))
        .route("/trips/:id", get(trip_summary::<S>))
        .route("/trips/:id/trains", get(trip_trains::<S>))
        .route("/trips/:id/calendar", get(trip_calendar::<S>))
        .route("/trips/:id/calendar/current", get(trip_current_event::<S>))
        .route("/stations/search", get(search_stations::<S>))
        .route("/refresh", post(refresh_all::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List the registered trips with their engine status.
async fn list_trips<S>(State(state): State<AppState<S>>) -> Json<Vec<TripListEntry>>
where
    S: JourneySource + StationSource + Send + Sync + 'static,
{
    let mut entries = Vec::new();

    for id in state.registry.ids().await {
        let Some(publisher) = state.registry.publisher(&id).await else {
            continue; // removed between listing and lookup
        };
        let status = state
            .registry
            .status(&id)
            .await
            .map(status_label)
            .unwrap_or("running");

        entries.push(TripListEntry {
            id: id.as_str().to_string(),
            route: publisher.config().route_label(),
            status,
        });
    }

    Json(entries)
}

/// Trip-summary entity for one trip.
async fn trip_summary<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<TripSummaryResponse>, AppError>
where
    S: JourneySource + StationSource + Send + Sync + 'static,
{
    let trip_id = TripId::new(&id);
    let publisher = state
        .registry
        .publisher(&trip_id)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("Unknown trip: {id}"),
        })?;
    let status = state
        .registry
        .status(&trip_id)
        .await
        .map(status_label)
        .unwrap_or("running");

    Ok(Json(TripSummaryResponse {
        id,
        status,
        summary: publisher.summary().await,
    }))
}

/// Per-train entities for one trip.
async fn trip_trains<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<TrainsResponse>, AppError>
where
    S: JourneySource + StationSource + Send + Sync + 'static,
{
    let publisher = state
        .registry
        .publisher(&TripId::new(&id))
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("Unknown trip: {id}"),
        })?;

    Ok(Json(TrainsResponse {
        trains: publisher.trains().await,
    }))
}

/// Calendar events within a datetime range.
async fn trip_calendar<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Query(range): Query<CalendarRangeParams>,
) -> Result<Json<CalendarResponse>, AppError>
where
    S: JourneySource + StationSource + Send + Sync + 'static,
{
    let start = parse_navitia_datetime(&range.start).ok_or_else(|| AppError::BadRequest {
        message: format!("Invalid start datetime: {}", range.start),
    })?;
    let end = parse_navitia_datetime(&range.end).ok_or_else(|| AppError::BadRequest {
        message: format!("Invalid end datetime: {}", range.end),
    })?;

    let publisher = state
        .registry
        .publisher(&TripId::new(&id))
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("Unknown trip: {id}"),
        })?;

    Ok(Json(CalendarResponse {
        events: publisher.events_between(start, end),
    }))
}

/// The calendar event closest to now.
async fn trip_current_event<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Option<CalendarEvent>>, AppError>
where
    S: JourneySource + StationSource + Send + Sync + 'static,
{
    let publisher = state
        .registry
        .publisher(&TripId::new(&id))
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("Unknown trip: {id}"),
        })?;

    Ok(Json(publisher.current_event(Local::now().naive_local())))
}

/// Search stop areas by name.
async fn search_stations<S>(
    State(state): State<AppState<S>>,
    Query(params): Query<StationSearchParams>,
) -> Result<Json<StationSearchResponse>, AppError>
where
    S: JourneySource + StationSource + Send + Sync + 'static,
{
    let matches = state.stations.search(&params.q).await?;

    Ok(Json(StationSearchResponse {
        stations: matches.as_ref().clone(),
    }))
}

/// Trigger an immediate refresh of every trip.
async fn refresh_all<S>(State(state): State<AppState<S>>) -> StatusCode
where
    S: JourneySource + StationSource + Send + Sync + 'static,
{
    state.registry.refresh_all().await;
    StatusCode::ACCEPTED
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<NavitiaError> for AppError {
    fn from(e: NavitiaError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        error!(status = %status, message = %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
