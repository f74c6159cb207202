//! Per-client sliding-window rate limiting
//!
//! Each client keeps the instants of its recently admitted requests. A check
//! drops instants older than the window, then admits the request if fewer
//! than `limit` remain. Admission recovers continuously as old instants age
//! out, never at fixed bucket boundaries.
//!
//! Records live in a sharded concurrent map: a check locks only the shard
//! holding that client, so one client's checks are serialized while other
//! clients proceed independently.

use crate::error::RateLimitError;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Request admitted and recorded
    Admitted,
    /// Request rejected; nothing recorded
    Rejected {
        /// Time until the oldest recorded request leaves the window
        retry_after: Duration,
    },
}

impl Admission {
    /// Whether the request was admitted
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Sliding-window rate limiter keyed by client identifier
#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    clients: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting `limit` requests per `window` per client
    ///
    /// # Errors
    ///
    /// Returns an error if `limit` is zero or `window` is zero.
    pub fn new(limit: u32, window: Duration) -> Result<Self, RateLimitError> {
        if limit == 0 {
            return Err(RateLimitError::ZeroLimit);
        }
        if window.is_zero() {
            return Err(RateLimitError::ZeroWindow);
        }

        Ok(Self {
            limit: limit as usize,
            window,
            clients: DashMap::new(),
        })
    }

    /// Maximum requests per window
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Window length
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or reject a request from `client_id` at `now`
    ///
    /// On admission `now` is recorded against the client.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, Instant};
    /// use verifact_pipeline::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2, Duration::from_secs(60)).unwrap();
    /// let now = Instant::now();
    /// assert!(limiter.allow("10.0.0.1", now));
    /// assert!(limiter.allow("10.0.0.1", now));
    /// assert!(!limiter.allow("10.0.0.1", now));
    /// assert!(limiter.allow("10.0.0.2", now));
    /// ```
    pub fn allow(&self, client_id: &str, now: Instant) -> bool {
        self.check(client_id, now).is_admitted()
    }

    /// Admit or reject a request, reporting how long to wait on rejection
    pub fn check(&self, client_id: &str, now: Instant) -> Admission {
        // Shard lock held for the whole evict-count-append sequence
        let mut timestamps = self.clients.entry(client_id.to_string()).or_default();
        self.evict(&mut timestamps, now);

        if timestamps.len() < self.limit {
            timestamps.push_back(now);
            return Admission::Admitted;
        }

        let retry_after = timestamps
            .front()
            .map(|oldest| self.window.saturating_sub(now.saturating_duration_since(*oldest)))
            .unwrap_or_default();
        Admission::Rejected { retry_after }
    }

    /// Drop every client with no requests left inside the window
    ///
    /// Returns the number of clients removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, timestamps| {
            self.evict(timestamps, now);
            !timestamps.is_empty()
        });
        before.saturating_sub(self.clients.len())
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    /// Keep only instants within `[now - window, now]`
    fn evict(&self, timestamps: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = timestamps.front() {
            if now.saturating_duration_since(*oldest) > self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}
