//! Global admission control.
//!
//! One token bucket for the whole process: no per-client partitioning.
//! The limiter is built once at startup and injected into every pipeline.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use axum::http::HeaderMap;

use crate::config::RateLimitConfig;
use crate::http::request::RequestContext;
use crate::http::response::Rejection;
use crate::pipeline::{RequestFilter, Verdict};

/// A simple token bucket.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_update: now,
        }
    }

    fn refill(&mut self, now: Instant, capacity: f64, refill_rate: f64) {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        if now > self.last_update {
            self.last_update = now;
        }
    }

    fn try_acquire(&mut self, now: Instant, capacity: f64, refill_rate: f64) -> bool {
        self.refill(now, capacity, refill_rate);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Process-wide token bucket shared by all concurrent requests.
#[derive(Debug)]
pub struct GlobalRateLimiter {
    bucket: Mutex<TokenBucket>,
    capacity: f64,
    refill_rate: f64,
}

impl GlobalRateLimiter {
    pub const DEFAULT_BURST: u32 = 500;
    pub const DEFAULT_RPS: u32 = 5;

    /// Full bucket of `burst` tokens, refilled at `per_second` tokens per second.
    pub fn new(per_second: u32, burst: u32) -> Self {
        let capacity = f64::from(burst);
        Self {
            bucket: Mutex::new(TokenBucket::new(capacity, Instant::now())),
            capacity,
            refill_rate: f64::from(per_second),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.requests_per_second, config.burst_size)
    }

    /// Take one token if available.
    pub fn check(&self) -> bool {
        self.check_at(Instant::now())
    }

    /// Take one token as of `now`. A failed attempt consumes nothing.
    pub fn check_at(&self, now: Instant) -> bool {
        // The arithmetic cannot leave the bucket inconsistent, so a poisoned
        // lock is still usable.
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        bucket.try_acquire(now, self.capacity, self.refill_rate)
    }

    /// Tokens currently available as of `now`, without taking any.
    pub fn available_at(&self, now: Instant) -> f64 {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        bucket.refill(now, self.capacity, self.refill_rate);
        bucket.tokens
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }
}

impl Default for GlobalRateLimiter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RPS, Self::DEFAULT_BURST)
    }
}

/// Pipeline stage wrapping the shared limiter.
#[derive(Debug, Clone)]
pub struct RateLimit {
    limiter: Arc<GlobalRateLimiter>,
}

impl RateLimit {
    pub fn new(limiter: Arc<GlobalRateLimiter>) -> Self {
        Self { limiter }
    }
}

impl RequestFilter for RateLimit {
    fn name(&self) -> &'static str {
        "rate_limit"
    }

    fn apply(&self, request: &RequestContext<'_>, _headers: &mut HeaderMap) -> Verdict {
        if self.limiter.check() {
            Ok(())
        } else {
            tracing::debug!(path = %request.path(), "Global rate limit exceeded");
            Err(Rejection::TooManyRequests)
        }
    }
}
