//! Exponential backoff with jitter for the registry's rebuild loop.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

impl RetryConfig {
    /// Delay to wait before the given rebuild attempt.
    ///
    /// Attempt 0 runs immediately; later attempts double the base delay up
    /// to the cap, plus up to 10% jitter so simultaneous clients do not
    /// reconnect in lockstep.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = 2u64.saturating_pow(attempt - 1);
        let delay_ms = self
            .base_delay_ms
            .saturating_mul(exponent)
            .min(self.max_delay_ms);

        let jitter_range = delay_ms / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(delay_ms + jitter)
    }
}
