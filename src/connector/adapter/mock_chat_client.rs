use async_trait::async_trait;
use tracing::debug;

use crate::application::ChatClient;
use crate::domain::{ChatPrompt, DomainError};

/// Offline stand-in for a model provider. Answers every question with the
/// same four-section layout, echoing the question back in the content.
pub struct MockChatClient;

impl MockChatClient {
    pub fn new() -> Self {
        Self
    }

    fn compose_answer(question: &str) -> String {
        let question = question.trim();
        format!(
            "1. Content:\n\
             You asked: \"{question}\". The Scriptures speak to every question of life, \
             and the Gospel of Jesus Christ is the thread that runs through all of them.\n\
             2. Key Takeaways:\n\
             - Scripture is the final authority\n\
             - Every part of the Bible points to Christ\n\
             3. Reflection Question:\n\
             How does this passage shape the way you follow Christ today?\n\
             4. Biblical References:\n\
             - 2 Timothy 3:16\n\
             - Luke 24:27"
        )
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, DomainError> {
        debug!("MockChatClient answering {} chars", prompt.user().len());
        Ok(Self::compose_answer(prompt.user()))
    }

    fn model_name(&self) -> &str {
        "mock-chat"
    }
}
