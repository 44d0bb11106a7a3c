use async_trait::async_trait;

use crate::domain::{ChatPrompt, DomainError};

/// An interface for sending chat-style prompts to an LLM and receiving text responses.
///
/// Implementors encapsulate transport, serialization and vendor-specific API
/// details, so [`crate::application::AskQuestionUseCase`] stays decoupled from
/// any particular provider or HTTP client library.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send the prompt's system turn followed by its human turn and return the
    /// assistant's reply as plain text.
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, DomainError>;

    /// Get the model identifier requests are sent to.
    fn model_name(&self) -> &str;
}
