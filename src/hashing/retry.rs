//! Bounded retry with exponential backoff.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::HashError;

/// How often and how patiently to retry a failed digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: u32,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry
    pub factor: u32,
    /// Upper bound for a single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_delay: Duration::from_millis(50),
            factor: 10,
            max_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Policy with `attempts` total attempts and the default backoff.
    #[must_use]
    pub fn with_attempts(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
            ..Self::default()
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let mut delay = self.initial_delay;
        for _ in 1..attempt {
            delay = delay.saturating_mul(self.factor);
            if delay >= self.max_delay {
                return self.max_delay;
            }
        }
        delay.min(self.max_delay)
    }
}

/// Run `op` until it succeeds, fails permanently, or the budget runs out.
///
/// Returns the last error when every attempt failed.
///
/// # Errors
///
/// The error from the final attempt, or the first permanent error.
pub fn with_retry<T, F>(policy: &RetryPolicy, mut op: F) -> Result<T, HashError>
where
    F: FnMut() -> Result<T, HashError>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_permanent() || attempt >= attempts => return Err(e),
            Err(e) => {
                let delay = policy.delay_after(attempt);
                log::debug!("Attempt {} failed ({}), retrying in {:?}", attempt, e, delay);
                thread::sleep(delay);
                attempt += 1;
            }
        }
    }
}
