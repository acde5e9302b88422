//! Single token bucket with continuous refill.

use chrono::{DateTime, Utc};

use super::RateLimitPolicy;

#[derive(Debug, Clone)]
pub(super) struct TokenBucket {
    tokens: f64,
    last_refill: DateTime<Utc>,
}

impl TokenBucket {
    pub(super) fn full(policy: &RateLimitPolicy, now: DateTime<Utc>) -> Self {
        Self {
            tokens: policy.capacity(),
            last_refill: now,
        }
    }

    /// Credit tokens for the time elapsed since the last refill, capped at
    /// capacity. A clock that moved backwards credits nothing.
    pub(super) fn refill(&mut self, policy: &RateLimitPolicy, now: DateTime<Utc>) {
        let Ok(elapsed) = (now - self.last_refill).to_std() else {
            return;
        };
        let credit = elapsed.as_secs_f64() * policy.refill_per_second();
        self.tokens = (self.tokens + credit).min(policy.capacity());
        self.last_refill = now;
    }

    pub(super) fn try_take(&mut self, policy: &RateLimitPolicy, now: DateTime<Utc>) -> bool {
        self.refill(policy, now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    pub(super) fn is_full(&self, policy: &RateLimitPolicy) -> bool {
        self.tokens >= policy.capacity()
    }
}
