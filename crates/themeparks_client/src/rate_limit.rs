//! Request budget for the ThemeParks API.
//!
//! The public API is shared and unauthenticated, so every fetcher draws
//! from a single per-second bucket before issuing a request.

use governor::clock::{Clock as _, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Default outbound budget (requests per second).
pub const DEFAULT_REQUESTS_PER_SEC: u32 = 5;

/// Single-bucket rate limiter, cheap to clone.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limiter: Arc<GovLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_REQUESTS_PER_SEC)
    }

    /// Create with a custom per-second limit. Zero is clamped to one.
    pub fn with_limit(requests_per_sec: u32) -> Self {
        let per_sec = NonZeroU32::new(requests_per_sec).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: Arc::new(GovLimiter::direct(Quota::per_second(per_sec))),
        }
    }

    /// Wait until a request slot is available.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Block the current thread until a request slot is available.
    pub fn wait_blocking(&self) {
        let clock = DefaultClock::default();
        while let Err(not_until) = self.limiter.check() {
            std::thread::sleep(not_until.wait_time_from(clock.now()));
        }
    }

    /// Try to take a slot without waiting. Returns true if acquired.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
