//! ThemeParks wait-time client library.
//!
//! Fetches live park data from the themeparks.wiki API, maps it into
//! [`common::ParkSnapshot`]s and keeps a small per-park TTL cache. Both an
//! async and a blocking client are provided.

pub mod blocking;
pub mod cache;
pub mod client;
pub mod clock;
pub mod fetch;
pub mod live;
pub mod parks;
pub mod rate_limit;

pub use blocking::BlockingThemeParksClient;
pub use cache::SnapshotCache;
pub use client::{ThemeParksClient, DEFAULT_CACHE_TTL};
pub use clock::{Clock, ManualClock, SystemClock};
pub use fetch::{BlockingFetch, BlockingHttpFetcher, Fetch, HttpFetcher};
pub use live::{map_live_data, wait_time_by_name};
pub use parks::{featured_attractions, known_parks, park_id, RESORT_PARKS};
pub use rate_limit::RateLimiter;
