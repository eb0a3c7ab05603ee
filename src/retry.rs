// SYNOID Shorts Retry Policy
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Retries are local to one operation (one fetch, one encode step) and never
// re-run the pipeline. Backoff is linear: base_delay * attempt.

use crate::error::{Result, ShortsError};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub retryable: fn(&ShortsError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            retryable: ShortsError::is_transient,
        }
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .finish()
    }
}

impl RetryPolicy {
    /// Policy with no sleeping between attempts (tests, dry runs).
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts are used up. The last error is returned.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) if attempt < attempts && (self.retryable)(&e) => {
                    let delay = self.backoff(attempt);
                    warn!(
                        "[RETRY] {} failed (attempt {}/{}): {}. Retrying in {:?}",
                        label, attempt, attempts, e, delay
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
