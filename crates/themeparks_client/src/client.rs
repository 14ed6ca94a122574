//! Async client for the ThemeParks API.

use common::config::DEFAULT_BASE_URL;
use common::{BoardConfig, Error, ParkSnapshot};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::cache::SnapshotCache;
use crate::fetch::{Fetch, HttpFetcher};
use crate::live;

/// Default snapshot TTL.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Pull `key` out of a payload as an array, empty when absent or not a list.
pub(crate) fn take_array(mut payload: Value, key: &str) -> Vec<Value> {
    match payload.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Async ThemeParks client with a per-entity snapshot cache.
///
/// Concurrent cache misses for the same entity are not collapsed; each one
/// issues its own request and the last response to land wins the cache slot.
#[derive(Debug)]
pub struct ThemeParksClient<F = HttpFetcher> {
    fetcher: F,
    cache: SnapshotCache,
}

impl ThemeParksClient<HttpFetcher> {
    /// Client against the public API with the given snapshot TTL.
    pub fn new(cache_ttl: Duration) -> Self {
        Self::with_fetcher(
            HttpFetcher::new(DEFAULT_BASE_URL),
            SnapshotCache::new(cache_ttl),
        )
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        let fetcher = HttpFetcher::new(&config.base_url)
            .with_timeout(config.request_timeout_secs.map(Duration::from_secs))
            .with_rate_limit(config.max_requests_per_sec);
        let cache = SnapshotCache::new(Duration::from_secs(config.cache_ttl_secs));
        Self::with_fetcher(fetcher, cache)
    }
}

impl Default for ThemeParksClient<HttpFetcher> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl<F: Fetch> ThemeParksClient<F> {
    pub fn with_fetcher(fetcher: F, cache: SnapshotCache) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Release the connection pool. Later calls reopen it on demand.
    pub fn close(&self) {
        self.fetcher.close();
    }

    // ── Pass-through endpoints ────────────────────────────────────────

    /// All destinations (resort groups).
    pub async fn get_destinations(&self) -> Result<Vec<Value>, Error> {
        let data = self.fetcher.fetch("/destinations").await?;
        Ok(take_array(data, "destinations"))
    }

    /// Raw entity document (park, attraction, ...).
    pub async fn get_entity(&self, entity_id: &str) -> Result<Value, Error> {
        self.fetcher.fetch(&format!("/entity/{}", entity_id)).await
    }

    /// Child entities, e.g. the attractions inside a park.
    pub async fn get_entity_children(&self, entity_id: &str) -> Result<Vec<Value>, Error> {
        let data = self
            .fetcher
            .fetch(&format!("/entity/{}/children", entity_id))
            .await?;
        Ok(take_array(data, "children"))
    }

    // ── Live data ─────────────────────────────────────────────────────

    /// Live snapshot for a park.
    ///
    /// With `use_cache`, a snapshot younger than the TTL is returned as-is
    /// without touching the network. Otherwise a fresh one is fetched and
    /// replaces the cached entry. Fetch failures propagate and leave the
    /// cache untouched.
    #[instrument(skip(self))]
    pub async fn get_live_data(
        &self,
        entity_id: &str,
        use_cache: bool,
    ) -> Result<Arc<ParkSnapshot>, Error> {
        if use_cache {
            if let Some(cached) = self.cache.get_fresh(entity_id) {
                debug!("Using cached data for {}", entity_id);
                return Ok(cached);
            }
        }

        let payload = self
            .fetcher
            .fetch(&format!("/entity/{}/live", entity_id))
            .await?;
        live::ingest(&self.cache, entity_id, payload)
    }

    /// Wait time for the first attraction in the park whose name contains
    /// `attraction_name`. `None` when nothing matches or the match is not
    /// operating.
    pub async fn get_wait_time(
        &self,
        park_id: &str,
        attraction_name: &str,
    ) -> Result<Option<u32>, Error> {
        let park = self.get_live_data(park_id, true).await?;
        Ok(live::wait_time_by_name(&park, attraction_name))
    }
}
