mod http_question_relay;
mod mock_chat_client;
mod openai_client;
mod system_prompt_loader;

pub use http_question_relay::*;
pub use mock_chat_client::*;
pub use openai_client::{OpenAiClient, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use system_prompt_loader::*;
