//! Board configuration types.

use serde::{Deserialize, Serialize};

/// Top-level board configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// API base URL, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Max age of a cached park snapshot before it is refetched (seconds).
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Optional per-request timeout (seconds). Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Park shown when none is given on the command line. Either a short
    /// name such as `magic_kingdom` or a raw entity id.
    #[serde(default = "default_park")]
    pub default_park: String,

    /// Poll interval for watch mode (seconds).
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Number of attractions shown on the board.
    #[serde(default = "default_board_size")]
    pub board_size: usize,

    /// Outbound request budget against the API (requests per second).
    #[serde(default = "default_max_requests_per_sec")]
    pub max_requests_per_sec: u32,
}

// ── Defaults ──────────────────────────────────────────────────────────

pub const DEFAULT_BASE_URL: &str = "https://api.themeparks.wiki/v1";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_cache_ttl() -> u64 {
    60
}
fn default_park() -> String {
    "magic_kingdom".to_string()
}
fn default_refresh_interval() -> u64 {
    60
}
fn default_board_size() -> usize {
    10
}
fn default_max_requests_per_sec() -> u32 {
    5
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cache_ttl_secs: default_cache_ttl(),
            request_timeout_secs: None,
            default_park: default_park(),
            refresh_interval_secs: default_refresh_interval(),
            board_size: default_board_size(),
            max_requests_per_sec: default_max_requests_per_sec(),
        }
    }
}
