use std::time::Duration;

use collector_core::PacingPolicy;
use collector_logging::collector_trace;

/// Sleeps at the pause points of a [`PacingPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    policy: PacingPolicy,
    delay: Duration,
}

impl RateLimiter {
    pub fn new(policy: PacingPolicy, delay: Duration) -> Self {
        Self { policy, delay }
    }

    /// Call after the `index`-th item (1-based). Returns whether it slept.
    pub async fn after_item(&self, index: usize) -> bool {
        if !self.policy.pauses_after(index) || self.delay.is_zero() {
            return false;
        }
        collector_trace!("Pausing {:?} after item {}", self.delay, index);
        tokio::time::sleep(self.delay).await;
        true
    }
}
