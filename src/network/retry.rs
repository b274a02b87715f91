//! Retry logic with exponential backoff, and call timeouts

use std::future::Future;
use std::time::Duration;
use tracing::warn;
use crate::errors::{CacheError, CacheResult};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub exponential_base: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            exponential_base: 2.0,
        }
    }
}

/// Retries retryable failures; invalid input and malformed data are
/// returned on the first attempt.
pub async fn retry_with_backoff<F, Fut, T>(
    operation: F,
    config: &RetryConfig,
    context: &str,
) -> CacheResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = CacheResult<T>>,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay_ms;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_retryable() || attempt >= config.max_attempts => return Err(e),
            Err(e) => {
                warn!(
                    "Attempt {}/{} failed for {}: {}. Retrying in {}ms...",
                    attempt, config.max_attempts, context, e, delay
                );

                tokio::time::sleep(Duration::from_millis(delay)).await;

                delay = (delay as f64 * config.exponential_base) as u64;
                delay = delay.min(config.max_delay_ms);
                let jitter = 1.0 + 0.1 * (rand::random::<f64>() - 0.5);
                delay = (delay as f64 * jitter) as u64;
            }
        }
    }
}

/// Bounds one chain-client call. An elapsed timer is an upstream failure.
pub async fn with_timeout<T, Fut>(
    timeout: Duration,
    chain_id: &str,
    operation: &str,
    call: Fut,
) -> CacheResult<T>
where
    Fut: Future<Output = CacheResult<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(CacheError::upstream(
            chain_id,
            operation,
            format!("timed out after {}s", timeout.as_secs_f32()),
            None,
        )),
    }
}
