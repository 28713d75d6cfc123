//! Wall-clock timestamps that follow tokio's clock.
//!
//! The epoch time is sampled once and advanced with `tokio::time::Instant`, so a paused
//! test runtime sees rental timestamps move together with its virtual time.

use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch_anchor_ms: u64,
    instant_anchor: Instant,
}

impl Clock {
    /// Anchor the clock to the current system time.
    pub fn system() -> Self {
        let epoch_anchor_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(saturating_millis)
            .unwrap_or(0);
        Self::anchored_at(epoch_anchor_ms)
    }

    /// Anchor the clock to a fixed epoch time.
    pub fn anchored_at(epoch_anchor_ms: u64) -> Self {
        Self {
            epoch_anchor_ms,
            instant_anchor: Instant::now(),
        }
    }

    /// Current time in milliseconds since the Unix epoch.
    pub fn now_ms(&self) -> u64 {
        let advanced = saturating_millis(self.instant_anchor.elapsed());
        self.epoch_anchor_ms.saturating_add(advanced)
    }

    /// Whole seconds elapsed since `start_ms`, never negative.
    pub fn elapsed_secs_since(&self, start_ms: u64) -> u64 {
        self.now_ms().saturating_sub(start_ms) / 1000
    }

    /// Time left until the next whole second counted from `start_ms`.
    pub fn until_next_second(&self, start_ms: u64) -> Duration {
        let into_second = self.now_ms().saturating_sub(start_ms) % 1000;
        Duration::from_millis(1000 - into_second)
    }
}

/// Milliseconds in `duration`, clamped to `u64::MAX`.
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn follows_virtual_time() {
        let clock = Clock::anchored_at(1_000_000);
        assert_eq!(clock.now_ms(), 1_000_000);

        tokio::time::advance(Duration::from_millis(3_500)).await;
        assert_eq!(clock.now_ms(), 1_003_500);
        assert_eq!(clock.elapsed_secs_since(1_000_000), 3);
    }

    #[test]
    fn elapsed_never_underflows() {
        let clock = Clock::anchored_at(5_000);
        assert_eq!(clock.elapsed_secs_since(9_000), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn next_second_is_relative_to_start() {
        let clock = Clock::anchored_at(10_000);
        assert_eq!(clock.until_next_second(10_000), Duration::from_secs(1));

        tokio::time::advance(Duration::from_millis(2_300)).await;
        assert_eq!(clock.until_next_second(10_000), Duration::from_millis(700));
        assert_eq!(clock.until_next_second(11_900), Duration::from_millis(600));
    }

    #[test]
    fn huge_durations_clamp_to_max() {
        assert_eq!(saturating_millis(Duration::MAX), u64::MAX);
        assert_eq!(saturating_millis(Duration::from_millis(42)), 42);
    }
}
