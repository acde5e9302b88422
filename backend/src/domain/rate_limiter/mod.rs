//! Per-address request throttling.
//!
//! Each client address owns a token bucket holding at most `capacity` tokens
//! and refilling continuously at `refill_per_second`. A request spends one
//! token or is rejected outright; nothing is queued. Buckets live in a sharded
//! concurrent map and are only touched under their shard's lock, so unrelated
//! addresses rarely contend and a token is never spent on a bucket the sweep
//! has already evicted. A periodic sweep drops buckets that have refilled to
//! capacity, which bounds memory to recently active addresses.

mod bucket;

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use mockable::Clock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use self::bucket::TokenBucket;
use super::Error;

/// Default interval between idle-bucket sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Rejected limiter settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateLimitPolicyError {
    #[error("rate limit burst must be at least 1")]
    ZeroCapacity,
    #[error("rate limit refill rate must be a positive number, got {0}")]
    InvalidRefillRate(f64),
}

/// Bucket capacity and refill rate shared by every address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitPolicy {
    capacity: u32,
    refill_per_second: f64,
}

impl RateLimitPolicy {
    /// Validate a burst size and a refill rate in tokens per second.
    ///
    /// # Examples
    /// ```
    /// use logistics_api::domain::RateLimitPolicy;
    ///
    /// assert!(RateLimitPolicy::new(20, 10.0).is_ok());
    /// assert!(RateLimitPolicy::new(0, 10.0).is_err());
    /// ```
    pub fn new(capacity: u32, refill_per_second: f64) -> Result<Self, RateLimitPolicyError> {
        if capacity == 0 {
            return Err(RateLimitPolicyError::ZeroCapacity);
        }
        if !refill_per_second.is_finite() || refill_per_second <= 0.0 {
            return Err(RateLimitPolicyError::InvalidRefillRate(refill_per_second));
        }
        Ok(Self {
            capacity,
            refill_per_second,
        })
    }

    pub(crate) fn capacity(&self) -> f64 {
        f64::from(self.capacity)
    }

    pub(crate) fn refill_per_second(&self) -> f64 {
        self.refill_per_second
    }
}

/// Concurrent map of per-address token buckets.
pub struct RateLimiter {
    policy: RateLimitPolicy,
    buckets: DashMap<String, TokenBucket>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create an empty limiter.
    pub fn new(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            buckets: DashMap::new(),
            clock,
        }
    }

    /// Spend one token for `address`, creating a full bucket on first sight.
    ///
    /// Fails with [`crate::domain::ErrorCode::RateLimited`] when the bucket
    /// is empty.
    pub fn allow(&self, address: &str) -> Result<(), Error> {
        let now = self.clock.utc();
        if self.take(address, now) {
            Ok(())
        } else {
            debug!(address, "rate limit exceeded");
            Err(Error::rate_limited("too many requests"))
        }
    }

    /// Spend a token while holding the entry, so a concurrent sweep either
    /// runs first and the bucket is recreated full, or runs after and sees
    /// the bucket below capacity.
    fn take(&self, address: &str, now: chrono::DateTime<chrono::Utc>) -> bool {
        if let Some(mut bucket) = self.buckets.get_mut(address) {
            return bucket.try_take(&self.policy, now);
        }
        self.buckets
            .entry(address.to_owned())
            .or_insert_with(|| TokenBucket::full(&self.policy, now))
            .try_take(&self.policy, now)
    }

    /// Drop every bucket that has refilled to capacity. Returns how many
    /// were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.utc();
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| {
            bucket.refill(&self.policy, now);
            !bucket.is_full(&self.policy)
        });
        before.saturating_sub(self.buckets.len())
    }

    /// Number of addresses currently tracked.
    pub fn tracked_addresses(&self) -> usize {
        self.buckets.len()
    }

    /// Run [`Self::sweep`] every `every` on the Tokio runtime.
    ///
    /// The task holds only a weak reference and exits once the limiter is
    /// dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let limiter = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(limiter) = limiter.upgrade() else {
                    debug!("rate limiter dropped; sweeper exiting");
                    break;
                };
                let evicted = limiter.sweep();
                if evicted > 0 {
                    debug!(
                        evicted,
                        remaining = limiter.tracked_addresses(),
                        "swept idle rate limit buckets"
                    );
                }
            }
        })
    }
}
