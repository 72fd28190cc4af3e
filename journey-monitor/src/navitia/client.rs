//! Navitia HTTP client.
//!
//! Provides async methods for querying the Navitia v1 coverage API.
//! Handles authentication, rate limiting, and status-code classification.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDateTime;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tokio::sync::Semaphore;

use crate::domain::{StopAreaId, format_navitia_datetime};

use super::error::NavitiaError;
use super::types::{JourneysResponse, PlaceEntry, PlacesResponse, RawJourney};
use super::{JourneySource, StationSource};

/// Default base URL for the SNCF coverage of Navitia.
const DEFAULT_BASE_URL: &str = "https://api.sncf.com/v1/coverage/sncf";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the Navitia client.
#[derive(Debug, Clone)]
pub struct NavitiaConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL for the API (defaults to the SNCF coverage)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NavitiaConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Encode the Basic-Auth header value for a Navitia API key.
///
/// Navitia expects the key as the username with an empty password.
fn basic_auth_value(api_key: &str) -> String {
    let token = BASE64.encode(format!("{api_key}:"));
    format!("Basic {token}")
}

/// Navitia API client.
///
/// Provides methods for journey search and stop-area lookup. Uses a
/// semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct NavitiaClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl NavitiaClient {
    /// Create a new Navitia client with the given configuration.
    pub fn new(config: NavitiaConfig) -> Result<Self, NavitiaError> {
        let mut headers = HeaderMap::new();

        let mut auth =
            HeaderValue::from_str(&basic_auth_value(&config.api_key)).map_err(|_| {
                NavitiaError::Api {
                    status: 0,
                    message: "Invalid API key format".to_string(),
                }
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Search journeys between two stop areas.
    ///
    /// `departure_after` becomes the `datetime` query parameter, so the API
    /// returns journeys departing at or after that instant. Realtime data
    /// freshness is requested so base and realtime timestamps diverge when
    /// a train is running late.
    ///
    /// Returns `None` when the response carries no `journeys` field at all,
    /// which callers treat as a failed cycle rather than an empty result.
    pub async fn journeys(
        &self,
        origin: &StopAreaId,
        destination: &StopAreaId,
        departure_after: NaiveDateTime,
        count: u8,
    ) -> Result<Option<Vec<RawJourney>>, NavitiaError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| NavitiaError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/journeys", self.base_url);
        let datetime = format_navitia_datetime(departure_after);
        let count = count.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("from", origin.as_str()),
                ("to", destination.as_str()),
                ("datetime", datetime.as_str()),
                ("count", count.as_str()),
                ("data_freshness", "realtime"),
            ])
            .send()
            .await?;

        let body = check_status(response).await?;

        let parsed: JourneysResponse =
            serde_json::from_str(&body).map_err(|e| NavitiaError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(parsed.journeys)
    }

    /// Search stop areas matching a free-text query.
    pub async fn places(&self, query: &str) -> Result<Vec<PlaceEntry>, NavitiaError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| NavitiaError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/places", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("type[]", "stop_area")])
            .send()
            .await?;

        let body = check_status(response).await?;

        let parsed: PlacesResponse =
            serde_json::from_str(&body).map_err(|e| NavitiaError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(parsed.places)
    }
}

/// Map the response status to an error variant, or return the body text.
///
/// 401 and 403 both mean bad credentials; 429 is the rate limiter and must
/// stay distinguishable from an auth failure because it heals by itself.
async fn check_status(response: reqwest::Response) -> Result<String, NavitiaError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(NavitiaError::Unauthorized);
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(NavitiaError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(NavitiaError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(response.text().await?)
}

impl JourneySource for NavitiaClient {
    async fn search_journeys(
        &self,
        origin: &StopAreaId,
        destination: &StopAreaId,
        departure_after: NaiveDateTime,
        count: u8,
    ) -> Result<Option<Vec<RawJourney>>, NavitiaError> {
        self.journeys(origin, destination, departure_after, count)
            .await
    }
}

impl StationSource for NavitiaClient {
    async fn search_stations(&self, query: &str) -> Result<Vec<PlaceEntry>, NavitiaError> {
        self.places(query).await
    }
}
