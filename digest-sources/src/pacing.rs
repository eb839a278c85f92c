//! Minimum-interval pacing for outbound requests.
//!
//! A [`Pacer`] holds an optional global limiter (one request per interval
//! across all hosts) and an optional keyed limiter (one request per
//! interval per host). Both are `governor` rate limiters with a burst of
//! one, so consecutive requests are spaced by at least the interval.
//! A zero interval disables the corresponding limiter.

use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;
type HostLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Global and per-host minimum intervals between requests.
pub struct Pacer {
    global: Option<DirectLimiter>,
    per_host: Option<HostLimiter>,
}

impl Pacer {
    /// Create a pacer. Zero durations disable the respective limiter.
    pub fn new(interval: Duration, per_host_interval: Duration) -> Self {
        Self {
            global: Quota::with_period(interval).map(RateLimiter::direct),
            per_host: Quota::with_period(per_host_interval).map(RateLimiter::keyed),
        }
    }

    /// Create a pacer with only a global interval.
    pub fn global(interval: Duration) -> Self {
        Self::new(interval, Duration::ZERO)
    }

    /// A pacer that never waits.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Returns `true` if neither limiter is active.
    pub fn is_disabled(&self) -> bool {
        self.global.is_none() && self.per_host.is_none()
    }

    /// Wait for the global slot.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.global {
            limiter.until_ready().await;
        }
    }

    /// Wait for the per-host slot of `host`, then for the global slot.
    pub async fn wait_for_host(&self, host: &str) {
        if let Some(limiter) = &self.per_host {
            limiter.until_key_ready(&host.to_owned()).await;
        }
        self.wait().await;
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer")
            .field("global", &self.global.is_some())
            .field("per_host", &self.per_host.is_some())
            .finish()
    }
}
