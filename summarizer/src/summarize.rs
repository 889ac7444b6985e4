//! Summarization with bounded retry and exponential backoff.
//!
//! Contract: at most `max_attempts` calls per chapter text, delay doubling
//! from `initial_delay` up to `max_delay` between attempts, terminal
//! `RetriesExhausted` after the last attempt.

use std::time::Duration;

use crate::error::{Result, SummaryError};
use crate::provider::{ChatProvider, ChatRequest};

/// Generation settings matching typical chapter-summary usage.
const SUMMARY_TEMPERATURE: f32 = 0.7;
const SUMMARY_MAX_TOKENS: u32 = 1000;

/// Configuration for retry behavior.
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
        }
    }
}

/// Summarizes chapter text through an injected chat provider.
///
/// The system prompt and retry policy are fixed at construction; the
/// summarizer holds no mutable state and calls are independent.
pub struct Summarizer {
    provider: Box<dyn ChatProvider>,
    system_prompt: String,
    retry: RetryConfig,
}

impl Summarizer {
    /// Create a summarizer with the default retry policy
    pub fn new(provider: Box<dyn ChatProvider>, system_prompt: &str) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.to_string(),
            retry: RetryConfig::default(),
        }
    }

    /// Override the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Get the underlying provider name for display
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Summarize one chapter's text.
    ///
    /// Every failure is treated as retryable until attempts are exhausted;
    /// the last error is folded into `RetriesExhausted`.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let request = ChatRequest {
            prompt: text.to_string(),
            system_prompt: Some(self.system_prompt.clone()),
            max_tokens: Some(SUMMARY_MAX_TOKENS),
            temperature: Some(SUMMARY_TEMPERATURE),
        };

        let mut delay = self.retry.initial_delay;
        let mut last_error = None;

        for attempt in 1..=self.retry.max_attempts {
            match self.provider.complete(request.clone()).await {
                Ok(response) => return Ok(response.content.trim().to_string()),
                Err(e) => {
                    if attempt < self.retry.max_attempts {
                        log::warn!(
                            "summarization attempt {}/{} failed, retrying in {:?}: {}",
                            attempt,
                            self.retry.max_attempts,
                            delay,
                            e
                        );
                        tokio::time::sleep(delay).await;
                        delay = Duration::from_secs_f32(
                            (delay.as_secs_f32() * self.retry.backoff_factor)
                                .min(self.retry.max_delay.as_secs_f32()),
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(SummaryError::RetriesExhausted {
            attempts: self.retry.max_attempts,
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts made".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockProvider;

    fn overloaded() -> SummaryError {
        SummaryError::ServerOverloaded {
            message: "overloaded".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_first_try() {
        let summarizer = Summarizer::new(
            Box::new(MockProvider::always_succeeds("  a summary  ")),
            "summarize",
        );
        let result = summarizer.summarize("chapter text").await.unwrap();
        assert_eq!(result, "a summary");
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_from_transient_failures() {
        let summarizer = Summarizer::new(
            Box::new(MockProvider::fails_then_succeeds(2, overloaded(), "ok")),
            "summarize",
        );
        let result = summarizer.summarize("chapter text").await;
        assert_eq!(result.unwrap(), "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_retries() {
        let summarizer =
            Summarizer::new(Box::new(MockProvider::always_fails(overloaded())), "summarize");
        let result = summarizer.summarize("chapter text").await;
        match result {
            Err(SummaryError::RetriesExhausted { attempts, message }) => {
                assert_eq!(attempts, 3);
                assert!(message.contains("overloaded"));
            }
            other => panic!("expected RetriesExhausted, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_attempt_budget() {
        let summarizer =
            Summarizer::new(Box::new(MockProvider::always_fails(overloaded())), "summarize")
                .with_retry(RetryConfig {
                    max_attempts: 5,
                    ..RetryConfig::default()
                });
        match summarizer.summarize("chapter text").await {
            Err(SummaryError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 5),
            other => panic!("expected RetriesExhausted, got {:?}", other.map(|_| ())),
        }
    }
}
