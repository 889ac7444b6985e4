//! Mock chat provider for testing
//!
//! Simulates transient failures and successful responses so that retry
//! behavior can be tested without a network.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, SummaryError};
use crate::provider::{ChatProvider, ChatRequest, ChatResponse};

/// A mock provider for testing retry behavior
pub struct MockProvider {
    /// Number of times to fail before succeeding (0 = always succeed)
    fail_count: AtomicUsize,
    /// Current call count
    call_count: AtomicUsize,
    /// Error to return on failure (None = always succeed)
    fail_with: Mutex<Option<SummaryError>>,
    /// Response content to return on success
    success_response: String,
}

impl MockProvider {
    /// Create a provider that fails `n` times with the given error, then succeeds
    pub fn fails_then_succeeds(n: usize, error: SummaryError, response: &str) -> Self {
        Self {
            fail_count: AtomicUsize::new(n),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(Some(error)),
            success_response: response.to_string(),
        }
    }

    /// Create a provider that always fails with the given error
    pub fn always_fails(error: SummaryError) -> Self {
        Self {
            fail_count: AtomicUsize::new(usize::MAX),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(Some(error)),
            success_response: String::new(),
        }
    }

    /// Create a provider that always succeeds
    pub fn always_succeeds(response: &str) -> Self {
        Self {
            fail_count: AtomicUsize::new(0),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(None),
            success_response: response.to_string(),
        }
    }

    /// Get the number of times complete() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse> {
        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst);
        let fail_count = self.fail_count.load(Ordering::SeqCst);

        if call_num < fail_count {
            let error = self.fail_with.lock().unwrap();
            if let Some(err) = error.as_ref() {
                return Err(clone_error(err));
            }
        }

        Ok(ChatResponse {
            content: self.success_response.clone(),
            model: "mock-model".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Clone a SummaryError (needed because SummaryError doesn't implement Clone)
fn clone_error(err: &SummaryError) -> SummaryError {
    match err {
        SummaryError::ApiError {
            message,
            status_code,
        } => SummaryError::ApiError {
            message: message.clone(),
            status_code: *status_code,
        },
        SummaryError::ServerOverloaded { message } => SummaryError::ServerOverloaded {
            message: message.clone(),
        },
        SummaryError::RateLimited { retry_after } => SummaryError::RateLimited {
            retry_after: *retry_after,
        },
        SummaryError::RetriesExhausted { attempts, message } => SummaryError::RetriesExhausted {
            attempts: *attempts,
            message: message.clone(),
        },
        SummaryError::ConfigError(s) => SummaryError::ConfigError(s.clone()),
    }
}
