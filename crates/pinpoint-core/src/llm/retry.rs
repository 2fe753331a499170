//! Retry utilities for transient model API failures.
//!
//! Retries are off unless `llm.retry_attempts` is raised above zero; with the
//! default settings every call is attempted exactly once.

use super::provider::{GenerateRequest, GenerateResponse, GenerativeModel};
use crate::config::LlmConfig;
use crate::error::{LlmError, LlmResult};
use std::time::Duration;

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub attempts: u32,
    /// Base backoff delay in milliseconds
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub const fn none() -> Self {
        Self {
            attempts: 0,
            base_delay_ms: 0,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&LlmConfig> for RetryPolicy {
    fn from(config: &LlmConfig) -> Self {
        Self {
            attempts: config.retry_attempts,
            base_delay_ms: config.retry_delay_ms,
        }
    }
}

/// Determine whether a model API error is worth retrying.
///
/// Retryable errors: timeouts, rate limits (429), server errors (5xx),
/// connection failures. Non-retryable: auth failures, bad requests,
/// unreadable images, malformed responses.
pub fn is_retryable(error: &LlmError) -> bool {
    match error {
        LlmError::Timeout { .. } => true,
        LlmError::Http { status, .. } => *status == 429 || (500..=599).contains(status),
        LlmError::Request { message } => {
            message.contains("timed out") || message.contains("connect")
        }
        _ => false,
    }
}

/// Calculate exponential backoff duration for a given attempt.
///
/// Uses `base_delay * 2^attempt` with a cap at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}

/// Run `generate`, retrying transient failures according to `policy`.
pub async fn generate_with_retry(
    model: &dyn GenerativeModel,
    request: &GenerateRequest,
    policy: RetryPolicy,
) -> LlmResult<GenerateResponse> {
    let mut attempt = 0;
    loop {
        match model.generate(request).await {
            Ok(response) => return Ok(response),
            Err(e) if attempt < policy.attempts && is_retryable(&e) => {
                let delay = backoff_duration(attempt, policy.base_delay_ms);
                attempt += 1;
                tracing::warn!(
                    "{} call failed ({e}); retry {attempt}/{} after {delay:?}",
                    model.name(),
                    policy.attempts
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
