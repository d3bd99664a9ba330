use std::time::Duration;

use crate::config::RetryPolicy;

/// Exponential backoff with up to 50% random jitter, capped at `max_delay`
pub(crate) fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    let base = policy
        .base_delay
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(policy.max_delay);

    let jitter_ms = match getrandom::u64() {
        Ok(random) => random % (base.as_millis() as u64 / 2 + 1),
        Err(_) => 0,
    };

    base.saturating_add(Duration::from_millis(jitter_ms)).min(policy.max_delay)
}
