use async_trait::async_trait;

use crate::error::Result;

/// Request to send to a chat-completion provider
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Response from a chat-completion provider
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
}

/// Trait for chat-completion providers
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Execute a completion request
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;
}
