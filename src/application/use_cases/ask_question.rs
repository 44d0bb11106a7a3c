use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::application::ChatClient;
use crate::domain::{ChatPrompt, DomainError, Question, SystemPrompt};

/// Sampling temperature for every answer; low so answers stay close to the charter.
pub const ANSWER_TEMPERATURE: f32 = 0.1;
/// Upper bound on the length of a generated answer, in tokens.
pub const ANSWER_MAX_TOKENS: u32 = 1000;

/// Core of the prompt relay: wraps a question in the system prompt and asks
/// the model once. No retries; callers decide whether to ask again.
pub struct AskQuestionUseCase {
    chat_client: Arc<dyn ChatClient>,
    system_prompt: SystemPrompt,
}

impl AskQuestionUseCase {
    pub fn new(chat_client: Arc<dyn ChatClient>, system_prompt: SystemPrompt) -> Self {
        Self {
            chat_client,
            system_prompt,
        }
    }

    pub async fn execute(&self, question: &str) -> Result<String, DomainError> {
        let question = Question::new(question)
            .ok_or_else(|| DomainError::invalid_input("question must not be blank"))?;

        let prompt = self.build_prompt(&question);
        info!(
            "Asking {} ({} chars)",
            self.chat_client.model_name(),
            question.as_str().chars().count()
        );

        let start_time = Instant::now();
        let answer = self.chat_client.complete(&prompt).await?;
        debug!(
            "Model answered with {} chars in {:?}",
            answer.chars().count(),
            start_time.elapsed()
        );

        Ok(answer)
    }

    pub fn model_name(&self) -> &str {
        self.chat_client.model_name()
    }

    fn build_prompt(&self, question: &Question) -> ChatPrompt {
        ChatPrompt::new(self.system_prompt.as_str(), question.as_str())
            .with_temperature(ANSWER_TEMPERATURE)
            .with_max_tokens(ANSWER_MAX_TOKENS)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct RecordingChatClient {
        reply: Result<String, String>,
        prompts: Mutex<Vec<ChatPrompt>>,
    }

    impl RecordingChatClient {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<ChatPrompt> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatClient for RecordingChatClient {
        async fn complete(&self, prompt: &ChatPrompt) -> Result<String, DomainError> {
            self.prompts.lock().unwrap().push(prompt.clone());
            self.reply.clone().map_err(DomainError::upstream)
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn forwards_question_with_fixed_parameters() {
        let client = Arc::new(RecordingChatClient::replying("1. Content: Amen"));
        let use_case = AskQuestionUseCase::new(client.clone(), SystemPrompt::new("Be brief."));

        let answer = use_case.execute("What is faith?").await.unwrap();
        assert_eq!(answer, "1. Content: Amen");

        let prompts = client.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].system(), "Be brief.");
        assert_eq!(prompts[0].user(), "What is faith?");
        assert_eq!(prompts[0].temperature(), ANSWER_TEMPERATURE);
        assert_eq!(prompts[0].max_tokens(), ANSWER_MAX_TOKENS);
    }

    #[tokio::test]
    async fn blank_question_never_reaches_the_model() {
        let client = Arc::new(RecordingChatClient::replying("unused"));
        let use_case = AskQuestionUseCase::new(client.clone(), SystemPrompt::new("x"));

        let err = use_case.execute("   ").await.unwrap_err();
        assert!(err.is_invalid_input());
        assert!(client.prompts().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_returned_after_a_single_attempt() {
        let client = Arc::new(RecordingChatClient::failing("rate limited"));
        let use_case = AskQuestionUseCase::new(client.clone(), SystemPrompt::new("x"));

        let err = use_case.execute("Who wrote Hebrews?").await.unwrap_err();
        assert!(matches!(err, DomainError::Upstream(_)));
        assert_eq!(client.prompts().len(), 1);
    }
}
