use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{AskQuestionUseCase, ChatClient};
use crate::connector::adapter::{load_system_prompt, MockChatClient, OpenAiClient};
use crate::domain::SystemPrompt;

pub struct ContainerConfig {
    /// Answer with [`MockChatClient`] instead of calling the model provider.
    pub mock_llm: bool,
    /// File holding the system prompt; the bundled prompt is used when `None`.
    pub system_prompt_path: Option<PathBuf>,
}

/// Wires the relay's dependencies together once at startup.
pub struct Container {
    chat_client: Arc<dyn ChatClient>,
    system_prompt: SystemPrompt,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let chat_client: Arc<dyn ChatClient> = if config.mock_llm {
            debug!("Using mock chat client");
            Arc::new(MockChatClient::new())
        } else {
            let client = OpenAiClient::from_env();
            debug!("Using OpenAI chat client with model {}", client.model_name());
            Arc::new(client)
        };

        let system_prompt = load_system_prompt(config.system_prompt_path.as_deref())?;

        Ok(Self::with_chat_client(chat_client, system_prompt))
    }

    /// Build a container around an already constructed client.
    pub fn with_chat_client(chat_client: Arc<dyn ChatClient>, system_prompt: SystemPrompt) -> Self {
        Self {
            chat_client,
            system_prompt,
        }
    }

    pub fn ask_question_use_case(&self) -> AskQuestionUseCase {
        AskQuestionUseCase::new(self.chat_client.clone(), self.system_prompt.clone())
    }

    pub fn model_name(&self) -> &str {
        self.chat_client.model_name()
    }
}
