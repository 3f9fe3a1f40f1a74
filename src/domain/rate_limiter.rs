//! Process-local sliding-window rate limiter.
//!
//! Keeps, per client identifier, the instants of its recent allowed requests.
//! State lives only in memory and is lost on restart.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default rolling window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default number of requests allowed per window.
pub const DEFAULT_MAX_REQUESTS: usize = 5;

/// Sliding-log rate limiter keyed by client identifier.
///
/// Each client's log is mutated under its `DashMap` shard lock, so concurrent
/// requests from the same client never lose updates.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    hits: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            hits: DashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Records a request from `client_id` if it is within budget.
    ///
    /// Returns `false` when the client already made `max_requests` requests in
    /// the current window; a denied attempt is not recorded.
    pub fn allow(&self, client_id: &str) -> bool {
        self.allow_at(client_id, Instant::now())
    }

    /// Same as [`Self::allow`] with an explicit current instant.
    pub fn allow_at(&self, client_id: &str, now: Instant) -> bool {
        if let Some(mut hits) = self.hits.get_mut(client_id) {
            return self.check_and_record(&mut hits, now);
        }

        let mut hits = self.hits.entry(client_id.to_string()).or_default();
        self.check_and_record(&mut hits, now)
    }

    /// Drops clients with no request inside the window.
    ///
    /// Returns the number of clients still tracked.
    pub fn purge_idle(&self) -> usize {
        self.purge_idle_at(Instant::now())
    }

    pub fn purge_idle_at(&self, now: Instant) -> usize {
        self.hits.retain(|_, hits| {
            prune(hits, now, self.window);
            !hits.is_empty()
        });
        self.hits.len()
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.hits.len()
    }

    fn check_and_record(&self, hits: &mut VecDeque<Instant>, now: Instant) -> bool {
        prune(hits, now, self.window);

        if hits.len() >= self.max_requests {
            return false;
        }

        hits.push_back(now);
        true
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_MAX_REQUESTS)
    }
}

/// Removes instants that are at least `window` old.
fn prune(hits: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = hits.front() {
        if now.saturating_duration_since(oldest) >= window {
            hits.pop_front();
        } else {
            break;
        }
    }
}
