//! Inter-attempt delay policy

use rand::Rng;
use std::time::Duration;

/// Randomised pause drawn uniformly from `[base - jitter, base + jitter]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    pub base: Duration,
    pub jitter: Duration,
}

impl DelayPolicy {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.jitter.is_zero() {
            return self.base;
        }

        let low = self.base.saturating_sub(self.jitter);
        let high = self.base + self.jitter;
        rng.gen_range(low..=high)
    }
}
