//! Chat-completion provider implementations

pub mod mock;
mod openai;

pub use mock::MockProvider;
pub use openai::OpenAiProvider;
