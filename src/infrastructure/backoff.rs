use std::time::Duration;

use crate::types::constants::{INITIAL_RECONNECT_DELAY, MAX_RECONNECT_DELAY};

/// Exponential backoff policy for reconnection delays.
///
/// Stateless: callers pass the attempt number, which by convention is the
/// count *before* the pending attempt is recorded, so the delay lines up with
/// the "attempt N of max" count shown to observers. Deterministic, no jitter.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }

    /// Delay before reconnect attempt number `attempt`:
    /// `min(initial * 2^attempt, max)`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let initial_ms = self.initial.as_millis() as u64;
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let delay_ms = initial_ms.saturating_mul(factor);
        Duration::from_millis(delay_ms).min(self.max)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(INITIAL_RECONNECT_DELAY),
            Duration::from_millis(MAX_RECONNECT_DELAY),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delay_table() {
        let backoff = Backoff::default();
        assert_eq!(backoff.delay(0), Duration::from_millis(1_000));
        assert_eq!(backoff.delay(1), Duration::from_millis(2_000));
        assert_eq!(backoff.delay(2), Duration::from_millis(4_000));
        assert_eq!(backoff.delay(3), Duration::from_millis(8_000));
        assert_eq!(backoff.delay(4), Duration::from_millis(16_000));
    }

    #[test]
    fn test_delay_is_capped() {
        let backoff = Backoff::default();
        assert_eq!(backoff.delay(5), Duration::from_millis(30_000));
        assert_eq!(backoff.delay(10), Duration::from_millis(30_000));
    }

    #[test]
    fn test_huge_attempt_does_not_overflow() {
        let backoff = Backoff::default();
        assert_eq!(backoff.delay(u32::MAX), Duration::from_millis(30_000));
        assert_eq!(backoff.delay(64), Duration::from_millis(30_000));
    }

    #[test]
    fn test_custom_bounds() {
        let backoff = Backoff::new(Duration::from_millis(10), Duration::from_millis(35));
        assert_eq!(backoff.delay(0), Duration::from_millis(10));
        assert_eq!(backoff.delay(1), Duration::from_millis(20));
        assert_eq!(backoff.delay(2), Duration::from_millis(35));
    }
}
