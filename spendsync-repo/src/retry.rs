//! Startup connection retry with exponential backoff.

use std::future::Future;
use std::time::Duration;

/// How many times to retry and how long to wait before the first retry.
/// The delay doubles after every failed attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Runs `connect` until it succeeds or `policy.max_retries` retries have failed.
pub async fn connect_with_retry<T, F, Fut>(policy: RetryPolicy, mut connect: F) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut attempt = 0;
    loop {
        match connect().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if attempt > policy.max_retries {
                    tracing::error!(attempts = attempt, error = %e, "database connection failed, giving up");
                    return Err(e);
                }
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "database connection failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
