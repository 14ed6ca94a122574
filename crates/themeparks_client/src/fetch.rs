//! HTTP transport for the ThemeParks API.
//!
//! One GET per call against a fixed base URL. The underlying connection
//! pool is opened lazily on first use, reused afterwards, and released by
//! `close()`.

use async_trait::async_trait;
use common::Error;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::error::Error as StdError;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

use crate::rate_limit::RateLimiter;

pub(crate) fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

pub(crate) fn format_reqwest_error(err: &reqwest::Error) -> String {
    // Keep chained causes so network failures (DNS/TLS/socket) are visible.
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !cause_msg.is_empty() && !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }

    message
}

pub(crate) fn summarize_response_body(raw: &str) -> String {
    const MAX_CHARS: usize = 500;
    let compact = raw.replace(['\n', '\r'], " ");
    if compact.chars().count() > MAX_CHARS {
        let cut: String = compact.chars().take(MAX_CHARS).collect();
        format!("{}…", cut)
    } else {
        compact
    }
}

fn decode_body(url: &str, body: &str) -> Result<Value, Error> {
    serde_json::from_str(body).map_err(|e| {
        warn!("Undecodable JSON from {}: {}", url, e);
        Error::Json(e)
    })
}

/// Async source of raw API payloads.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET `path` (relative to the base URL) and decode the body as JSON.
    async fn fetch(&self, path: &str) -> Result<Value, Error>;

    /// Release any held connection context.
    fn close(&self) {}
}

/// Blocking source of raw API payloads.
pub trait BlockingFetch: Send + Sync {
    fn fetch(&self, path: &str) -> Result<Value, Error>;

    fn close(&self) {}
}

// ── Async ─────────────────────────────────────────────────────────────

/// Async HTTP fetcher with a lazily opened, reusable connection pool.
#[derive(Debug)]
pub struct HttpFetcher {
    base_url: String,
    timeout: Option<Duration>,
    limiter: RateLimiter,
    client: Mutex<Option<reqwest::Client>>,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            timeout: None,
            limiter: RateLimiter::new(),
            client: Mutex::new(None),
        }
    }

    /// Apply a per-request timeout to connections opened from now on.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_rate_limit(mut self, requests_per_sec: u32) -> Self {
        self.limiter = RateLimiter::with_limit(requests_per_sec);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a connection pool is currently held.
    pub fn is_open(&self) -> bool {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn client(&self) -> Result<reqwest::Client, Error> {
        let mut slot = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        debug!("Opening HTTP connection pool for {}", self.base_url);
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_keepalive(Duration::from_secs(30));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Http(format_reqwest_error(&e)))?;

        *slot = Some(client.clone());
        Ok(client)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<Value, Error> {
        let client = self.client()?;
        let url = self.url(path);

        self.limiter.wait().await;
        debug!("GET {}", url);

        let resp = client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!("API request failed for {}: {}", url, e);
                Error::Http(format_reqwest_error(&e))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("API returned {} for {}", status, url);
            return Err(Error::ThemeParksApi {
                status: status.as_u16(),
                message: summarize_response_body(&body),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Http(format_reqwest_error(&e)))?;

        decode_body(&url, &body)
    }

    fn close(&self) {
        if self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
        {
            debug!("Closed HTTP connection pool for {}", self.base_url);
        }
    }
}

// ── Blocking ──────────────────────────────────────────────────────────

/// Blocking HTTP fetcher.
///
/// `reqwest::blocking` runs its own runtime internally, so this must not be
/// created, used or dropped from inside an async task.
#[derive(Debug)]
pub struct BlockingHttpFetcher {
    base_url: String,
    timeout: Option<Duration>,
    limiter: RateLimiter,
    client: Mutex<Option<reqwest::blocking::Client>>,
}

impl BlockingHttpFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            timeout: None,
            limiter: RateLimiter::new(),
            client: Mutex::new(None),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_rate_limit(mut self, requests_per_sec: u32) -> Self {
        self.limiter = RateLimiter::with_limit(requests_per_sec);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_open(&self) -> bool {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn client(&self) -> Result<reqwest::blocking::Client, Error> {
        let mut slot = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        debug!("Opening blocking HTTP connection pool for {}", self.base_url);
        // The blocking builder applies a 30s default; only an explicit
        // setting should bound requests.
        let client = reqwest::blocking::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_keepalive(Duration::from_secs(30))
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::Http(format_reqwest_error(&e)))?;

        *slot = Some(client.clone());
        Ok(client)
    }
}

impl BlockingFetch for BlockingHttpFetcher {
    fn fetch(&self, path: &str) -> Result<Value, Error> {
        let client = self.client()?;
        let url = self.url(path);

        self.limiter.wait_blocking();
        debug!("GET {}", url);

        let resp = client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| {
                warn!("API request failed for {}: {}", url, e);
                Error::Http(format_reqwest_error(&e))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            warn!("API returned {} for {}", status, url);
            return Err(Error::ThemeParksApi {
                status: status.as_u16(),
                message: summarize_response_body(&body),
            });
        }

        let body = resp
            .text()
            .map_err(|e| Error::Http(format_reqwest_error(&e)))?;

        decode_body(&url, &body)
    }

    fn close(&self) {
        if self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
        {
            debug!("Closed blocking HTTP connection pool for {}", self.base_url);
        }
    }
}
