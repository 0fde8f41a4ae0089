//! Request pacing for the comments endpoint.
//!
//! A single-token bucket refilled once per `period`. With one caller this is
//! a fixed pause between consecutive page fetches; with several concurrent
//! harvests it is one shared budget for the endpoint.

use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

/// Rate limiter type alias.
type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Default pause between comment page requests.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(300);

/// Shared page throttle. Cloning shares the budget.
#[derive(Clone)]
pub struct PageThrottle {
    limiter: Option<Arc<DirectRateLimiter>>,
    period: Duration,
}

impl PageThrottle {
    /// One request per `period`. A zero period disables throttling.
    pub fn new(period: Duration) -> Self {
        let limiter = Quota::with_period(period).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self { limiter, period }
    }

    /// No throttling.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Wait until the next request may be sent.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl Default for PageThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_DELAY)
    }
}

impl std::fmt::Debug for PageThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageThrottle").field("period", &self.period).finish()
    }
}
