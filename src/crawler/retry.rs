//! Bounded retry with linear backoff and identity rotation
//!
//! Every network touch in the crawler goes through [`RetryExecutor`]. Attempt
//! `i` (1-indexed) sleeps `base_delay × i` before it is issued when `i > 1`,
//! and presents `identities[(i - 1) % len]` as its user agent.

use crate::config::RetryConfig;
use crate::crawler::fetcher::{Fetcher, RawDocument};
use crate::FetchFailed;
use std::sync::Arc;
use std::time::Duration;

/// How many times to try a URL and how to space the attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub identities: Vec<String>,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            identities: config.user_agents.clone(),
        }
    }

    /// Wait before issuing `attempt`; zero for the first attempt
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            Duration::ZERO
        } else {
            self.base_delay * attempt
        }
    }

    /// Identity presented on `attempt`
    pub fn identity_for(&self, attempt: u32) -> &str {
        if self.identities.is_empty() {
            return "";
        }
        let index = (attempt.saturating_sub(1) as usize) % self.identities.len();
        &self.identities[index]
    }
}

/// Wraps a [`Fetcher`] in the retry policy
#[derive(Clone)]
pub struct RetryExecutor {
    fetcher: Arc<dyn Fetcher>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl RetryExecutor {
    /// # Arguments
    ///
    /// * `fetcher` - Transport used for each attempt
    /// * `policy` - Attempt count, backoff unit, and identities
    /// * `timeout` - Limit applied to every individual attempt
    pub fn new(fetcher: Arc<dyn Fetcher>, policy: RetryPolicy, timeout: Duration) -> Self {
        Self {
            fetcher,
            policy,
            timeout,
        }
    }

    /// Fetches `url`, retrying transient failures
    ///
    /// # Returns
    ///
    /// * `Ok(RawDocument)` - Some attempt succeeded
    /// * `Err(FetchFailed)` - All `max_attempts` attempts failed; carries the
    ///   last attempt's error
    pub async fn execute(&self, url: &str) -> Result<RawDocument, FetchFailed> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let delay = self.policy.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let identity = self.policy.identity_for(attempt);
            match self.fetcher.get(url, identity, self.timeout).await {
                Ok(doc) => {
                    if attempt > 1 {
                        tracing::debug!("Fetched {} on attempt {}", url, attempt);
                    }
                    return Ok(doc);
                }
                Err(error) if attempt >= max_attempts => {
                    tracing::warn!(
                        "Giving up on {} after {} attempt(s): {}",
                        url,
                        attempt,
                        error
                    );
                    return Err(FetchFailed {
                        url: url.to_string(),
                        attempts: attempt,
                        last_error: error,
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        "Attempt {}/{} failed for {}: {}",
                        attempt,
                        max_attempts,
                        url,
                        error
                    );
                    attempt += 1;
                }
            }
        }
    }
}
