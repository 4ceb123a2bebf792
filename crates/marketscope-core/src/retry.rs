use std::time::Duration;

/// Deterministic exponential backoff for load retries.
///
/// One policy covers rate-limit responses and transient transport failures;
/// cancellation never retries. Defaults: two retries after the initial
/// attempt, sleeping 300ms then 900ms.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(300),
            multiplier: 3.0,
            max_retries: 2,
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based): `initial * multiplier^attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let scale = self.multiplier.powi(attempt as i32);
        Duration::from_secs_f64(self.initial_delay.as_secs_f64() * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ladder_is_300_900_2700() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.delay(0), Duration::from_millis(300));
        assert_eq!(policy.delay(1), Duration::from_millis(900));
        assert_eq!(policy.delay(2), Duration::from_millis(2700));
    }

    #[test]
    fn no_retry_keeps_the_ladder_but_zero_budget() {
        let policy = RetryPolicy::no_retry();
        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.delay(0), Duration::from_millis(300));
    }
}
