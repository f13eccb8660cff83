//! Exponential-backoff retry decorator for language models

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::LanguageModel;
use crate::agents::domain::Turn;
use crate::agents::error::{LlmError, LlmResult};

/// Retries transient completion failures with exponential backoff.
///
/// Only connectivity faults, rate limits and 5xx responses are retried.
/// Everything else is returned on the first attempt.
pub struct RetryingModel<M> {
    inner: M,
    max_retries: u32,
    initial_interval: Duration,
    max_interval: Duration,
}

impl<M: LanguageModel> RetryingModel<M> {
    pub fn new(inner: M, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries,
            initial_interval: Duration::from_millis(250),
            max_interval: Duration::from_secs(5),
        }
    }

    /// Override the first backoff delay
    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }
}

#[async_trait]
impl<M: LanguageModel> LanguageModel for RetryingModel<M> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn complete(&self, prompt: &str, context: &[Turn]) -> LlmResult<String> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_max_elapsed_time(None)
            .build();

        let inner = &self.inner;
        let max_retries = self.max_retries;
        let attempts = AtomicU32::new(0);

        let operation = || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                match inner.complete(prompt, context).await {
                    Ok(text) => Ok(text),
                    Err(e) if e.is_transient() && attempt < max_retries => {
                        tracing::warn!(
                            attempt = attempt + 1,
                            max_retries,
                            error = %e,
                            "Transient model error, retrying"
                        );
                        match e {
                            LlmError::RateLimited { retry_after_ms } => Err(
                                backoff::Error::retry_after(e, Duration::from_millis(retry_after_ms)),
                            ),
                            other => Err(backoff::Error::transient(other)),
                        }
                    }
                    Err(e) => Err(backoff::Error::permanent(e)),
                }
            }
        };

        backoff::future::retry(policy, operation).await
    }
}
