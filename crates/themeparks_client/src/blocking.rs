//! Blocking client for synchronous hosts such as the kiosk UI thread.
//!
//! Same cache and mapping as [`crate::ThemeParksClient`], but over
//! `reqwest::blocking`, so no async runtime is involved.

use common::config::DEFAULT_BASE_URL;
use common::{BoardConfig, Error, ParkSnapshot};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::cache::SnapshotCache;
use crate::client::{take_array, DEFAULT_CACHE_TTL};
use crate::fetch::{BlockingFetch, BlockingHttpFetcher};
use crate::{live, parks};

/// Blocking ThemeParks client with a per-entity snapshot cache.
#[derive(Debug)]
pub struct BlockingThemeParksClient<F = BlockingHttpFetcher> {
    fetcher: F,
    cache: SnapshotCache,
}

impl BlockingThemeParksClient<BlockingHttpFetcher> {
    pub fn new(cache_ttl: Duration) -> Self {
        Self::with_fetcher(
            BlockingHttpFetcher::new(DEFAULT_BASE_URL),
            SnapshotCache::new(cache_ttl),
        )
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        let fetcher = BlockingHttpFetcher::new(&config.base_url)
            .with_timeout(config.request_timeout_secs.map(Duration::from_secs))
            .with_rate_limit(config.max_requests_per_sec);
        let cache = SnapshotCache::new(Duration::from_secs(config.cache_ttl_secs));
        Self::with_fetcher(fetcher, cache)
    }
}

impl Default for BlockingThemeParksClient<BlockingHttpFetcher> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl<F: BlockingFetch> BlockingThemeParksClient<F> {
    pub fn with_fetcher(fetcher: F, cache: SnapshotCache) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn close(&self) {
        self.fetcher.close();
    }

    pub fn get_destinations(&self) -> Result<Vec<Value>, Error> {
        let data = self.fetcher.fetch("/destinations")?;
        Ok(take_array(data, "destinations"))
    }

    pub fn get_entity(&self, entity_id: &str) -> Result<Value, Error> {
        self.fetcher.fetch(&format!("/entity/{}", entity_id))
    }

    pub fn get_entity_children(&self, entity_id: &str) -> Result<Vec<Value>, Error> {
        let data = self
            .fetcher
            .fetch(&format!("/entity/{}/children", entity_id))?;
        Ok(take_array(data, "children"))
    }

    /// See [`crate::ThemeParksClient::get_live_data`].
    pub fn get_live_data(
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
            .fetch(&format!("/entity/{}/live", entity_id))?;
        live::ingest(&self.cache, entity_id, payload)
    }

    pub fn get_wait_time(
        &self,
        park_id: &str,
        attraction_name: &str,
    ) -> Result<Option<u32>, Error> {
        let park = self.get_live_data(park_id, true)?;
        Ok(live::wait_time_by_name(&park, attraction_name))
    }

    // ── Short-name conveniences ───────────────────────────────────────

    /// Attraction name → wait time for a park given by short name.
    pub fn live_wait_times(
        &self,
        park_name: &str,
        operating_only: bool,
    ) -> Result<HashMap<String, Option<u32>>, Error> {
        let park_id = resolve(park_name)?;
        let park = self.get_live_data(park_id, true)?;
        Ok(park.wait_times(operating_only))
    }

    /// [`Self::get_wait_time`] for a park given by short name.
    pub fn wait_time_for(
        &self,
        park_name: &str,
        attraction_name: &str,
    ) -> Result<Option<u32>, Error> {
        let park_id = resolve(park_name)?;
        self.get_wait_time(park_id, attraction_name)
    }
}

fn resolve(park_name: &str) -> Result<&'static str, Error> {
    parks::park_id(park_name).ok_or_else(|| Error::UnknownPark(park_name.to_string()))
}
