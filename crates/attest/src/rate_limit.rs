//! Proactive request pacing and rate-limit introspection.

use std::num::NonZeroU32;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::Deserialize;

use crate::http::{HttpHeaders, header_get};

/// Type alias for the governor rate limiter.
type GovernorRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Default proactive pacing for api.github.com.
///
/// The authenticated quota is 5000 requests/hour (~1.4/sec); 10/sec leaves
/// room for bursts while staying far from secondary limits.
pub const DEFAULT_RPS: u32 = 10;

/// Rate limit state reported by the API.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Total requests allowed in the current window.
    pub limit: usize,
    /// Requests remaining in the current window.
    pub remaining: usize,
    /// When the window resets.
    pub reset_at: DateTime<Utc>,
}

/// Extract rate limit info from `x-ratelimit-*` response headers.
pub(crate) fn parse_rate_limit_headers(headers: &HttpHeaders) -> Option<RateLimitInfo> {
    let limit = header_get(headers, "x-ratelimit-limit")?
        .parse::<usize>()
        .ok()?;
    let remaining = header_get(headers, "x-ratelimit-remaining")?
        .parse::<usize>()
        .ok()?;
    let reset_epoch = header_get(headers, "x-ratelimit-reset")?
        .parse::<i64>()
        .ok()?;
    let reset_at = DateTime::from_timestamp(reset_epoch, 0).unwrap_or_else(Utc::now);
    Some(RateLimitInfo {
        limit,
        remaining,
        reset_at,
    })
}

/// A standalone API rate limiter using the governor crate.
///
/// When configured on a client, every request waits for the limiter before
/// touching the transport.
#[derive(Clone)]
pub struct ApiRateLimiter {
    inner: Arc<GovernorRateLimiter>,
}

impl ApiRateLimiter {
    /// Create a new rate limiter with the specified requests per second.
    ///
    /// A zero value falls back to 1 request per second.
    pub fn new(requests_per_second: u32) -> Self {
        let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::new(1).unwrap());
        let rate_limiter = RateLimiter::direct(Quota::per_second(rps));

        Self {
            inner: Arc::new(rate_limiter),
        }
    }

    /// Wait until a request is allowed by the rate limiter.
    pub async fn wait(&self) {
        self.inner.until_ready().await;
    }
}

/// Wire shape of `GET /rate_limit`.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResponse {
    pub resources: RateLimitResources,
}

/// Per-resource buckets we care about from `GET /rate_limit`.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitBucket,
}

/// One bucket of the rate-limit response.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitBucket {
    pub limit: usize,
    pub remaining: usize,
    /// Reset instant as a Unix epoch.
    pub reset: i64,
    #[serde(default)]
    pub used: usize,
}

impl RateLimitBucket {
    /// Convert the wire bucket into [`RateLimitInfo`].
    #[must_use]
    pub fn to_info(&self) -> RateLimitInfo {
        RateLimitInfo {
            limit: self.limit,
            remaining: self.remaining,
            reset_at: DateTime::from_timestamp(self.reset, 0).unwrap_or_else(Utc::now),
        }
    }
}
