//! Per-host adaptive rate limiting
//!
//! The limiter owns every host's politeness state for one crawl session:
//! the minimum spacing between requests and the last reserved request time.
//! It is injected into the fetcher rather than held as ambient state, and
//! its check-and-record step is atomic so two concurrent requests to the
//! same host cannot both observe a stale timestamp and skip the delay.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Politeness state for a single host
#[derive(Debug, Clone)]
pub struct HostRateState {
    /// Minimum spacing between requests to this host
    pub min_delay: Duration,

    /// When the most recently reserved request will be (or was) issued
    pub last_request: Option<Instant>,

    /// Whether the host has pushed back (429) and adapted the delay
    pub adapted: bool,
}

impl HostRateState {
    fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: None,
            adapted: false,
        }
    }

    /// Reserves the next request slot for this host.
    ///
    /// Returns how long the caller must wait before issuing the request,
    /// and stamps the reservation immediately so a concurrent caller queues
    /// behind it instead of racing past it.
    pub fn reserve(&mut self, now: Instant) -> Duration {
        let wait = match self.last_request {
            Some(last) => (last + self.min_delay).saturating_duration_since(now),
            None => Duration::ZERO,
        };
        self.last_request = Some(now + wait);
        wait
    }

    /// Raises the minimum delay after an explicit Retry-After signal.
    pub fn apply_retry_after(&mut self, retry_after: Duration, floor: Duration) {
        self.min_delay = retry_after.max(floor);
        self.adapted = true;
    }

    /// Doubles the minimum delay, capped, after a 429 without Retry-After.
    ///
    /// Returns the new delay so the caller can suspend for it.
    pub fn backoff(&mut self, cap: Duration) -> Duration {
        self.min_delay = (self.min_delay * 2).min(cap);
        self.adapted = true;
        self.min_delay
    }
}

/// Session-scoped rate limiter shared by all concurrent fetches
pub struct RateLimiter {
    hosts: Mutex<HashMap<String, HostRateState>>,
    default_delay: Duration,
    retry_after_floor: Duration,
    backoff_cap: Duration,
}

impl RateLimiter {
    pub fn new(default_delay: Duration, retry_after_floor: Duration, backoff_cap: Duration) -> Self {
        Self {
            hosts: Mutex::new(HashMap::new()),
            default_delay,
            retry_after_floor,
            backoff_cap,
        }
    }

    /// Atomically reserves the next request slot for a host.
    pub async fn reserve(&self, host: &str) -> Duration {
        let mut hosts = self.hosts.lock().await;
        let state = hosts
            .entry(host.to_string())
            .or_insert_with(|| HostRateState::new(self.default_delay));
        state.reserve(Instant::now())
    }

    /// Records an explicit Retry-After signal for a host.
    pub async fn apply_retry_after(&self, host: &str, retry_after: Duration) {
        let mut hosts = self.hosts.lock().await;
        let state = hosts
            .entry(host.to_string())
            .or_insert_with(|| HostRateState::new(self.default_delay));
        state.apply_retry_after(retry_after, self.retry_after_floor);
    }

    /// Doubles a host's delay after an unannotated 429; returns the new delay.
    pub async fn backoff(&self, host: &str) -> Duration {
        let mut hosts = self.hosts.lock().await;
        let state = hosts
            .entry(host.to_string())
            .or_insert_with(|| HostRateState::new(self.default_delay));
        state.backoff(self.backoff_cap)
    }

    /// The adapted delay for a host, if it has pushed back this session.
    pub async fn adapted_delay(&self, host: &str) -> Option<Duration> {
        let hosts = self.hosts.lock().await;
        hosts
            .get(host)
            .filter(|state| state.adapted)
            .map(|state| state.min_delay)
    }
}
