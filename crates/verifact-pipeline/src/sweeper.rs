//! Background eviction of idle rate-limit records

use crate::rate_limiter::RateLimiter;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Periodically drops clients that have no requests left in the window
///
/// Admission checks already evict stale timestamps for the client they
/// touch; the sweeper reclaims records of clients that never come back.
pub struct RateLimitSweeper {
    limiter: Arc<RateLimiter>,
    interval: Duration,
}

impl RateLimitSweeper {
    /// Create a sweeper running every `interval`
    pub fn new(limiter: Arc<RateLimiter>, interval: Duration) -> Self {
        Self { limiter, interval }
    }

    /// Sweep on schedule until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!("Rate-limit sweeper started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once();
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping rate-limit sweeper");
                    break;
                }
            }
        }
    }

    /// Run a fixed number of sweeps (useful for testing)
    pub async fn run_cycles(&self, cycles: usize) -> usize {
        let mut ticker = interval(self.interval);
        let mut removed = 0;

        for _ in 0..cycles {
            ticker.tick().await;
            removed += self.sweep_once();
        }
        removed
    }

    fn sweep_once(&self) -> usize {
        let removed = self.limiter.sweep(Instant::now());
        if removed > 0 {
            tracing::debug!(
                "Swept {} idle clients, {} still tracked",
                removed,
                self.limiter.tracked_clients()
            );
        }
        removed
    }
}
