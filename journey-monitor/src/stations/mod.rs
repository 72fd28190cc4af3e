//! Station search for the setup surface.
//!
//! Wraps the client's places lookup with a TTL cache so repeated queries
//! while a user types do not hammer the upstream API. Only successful
//! lookups are cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde::Serialize;

use crate::navitia::{NavitiaError, StationSource};

/// A stop area matched by a search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationMatch {
    /// Full stop-area id, ready to go into a trip configuration.
    pub id: String,
    pub name: String,
}

/// Configuration for the station-search cache.
#[derive(Debug, Clone)]
pub struct StationSearchConfig {
    /// TTL for cached query results.
    pub ttl: Duration,

    /// Maximum number of cached queries.
    pub max_capacity: u64,
}

impl Default for StationSearchConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 500,
        }
    }
}

/// Cached stop-area search.
pub struct StationSearch<S> {
    source: Arc<S>,
    cache: MokaCache<String, Arc<Vec<StationMatch>>>,
}

impl<S: StationSource + Send + Sync + 'static> StationSearch<S> {
    /// Create a new cached search over a station source.
    pub fn new(source: Arc<S>, config: &StationSearchConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { source, cache }
    }

    /// Search stop areas matching a free-text query.
    ///
    /// Place entries without a stop area (POIs, addresses) are dropped.
    pub async fn search(&self, query: &str) -> Result<Arc<Vec<StationMatch>>, NavitiaError> {
        let key = query.trim().to_lowercase();

        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let places = self.source.search_stations(query).await?;

        let matches: Vec<StationMatch> = places
            .into_iter()
            .filter_map(|place| {
                let stop_area = place.stop_area?;
                let name = stop_area.name.or(place.name).unwrap_or_default();
                Some(StationMatch {
                    id: stop_area.id,
                    name,
                })
            })
            .collect();

        let entry = Arc::new(matches);
        self.cache.insert(key, entry.clone()).await;

        Ok(entry)
    }

    /// Number of cached queries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}
