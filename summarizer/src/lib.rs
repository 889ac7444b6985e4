//! Chapter summarization client for the epub-digest workspace
//!
//! Wraps an OpenAI-compatible chat-completions API behind a provider trait
//! and adds bounded retry with exponential backoff. The caller injects all
//! configuration (endpoint, key, model, system prompt) at construction time.

pub mod error;
pub mod provider;
pub mod providers;
pub mod summarize;

pub use error::{Result, SummaryError};
pub use provider::{ChatProvider, ChatRequest, ChatResponse};
pub use providers::{MockProvider, OpenAiProvider};
pub use summarize::{RetryConfig, Summarizer};
