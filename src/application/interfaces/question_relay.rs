use async_trait::async_trait;

use crate::domain::{DomainError, Question};

/// Client side of the prompt relay: hands a question to the relay and returns
/// the raw answer text.
///
/// Errors distinguish a non-success status ([`DomainError::Transport`]) from a
/// body without a usable answer ([`DomainError::Format`]).
#[async_trait]
pub trait QuestionRelay: Send + Sync {
    async fn ask(&self, question: &Question) -> Result<String, DomainError>;
}
