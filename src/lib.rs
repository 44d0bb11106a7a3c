pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    AskQuestionUseCase, ChatClient, ConversationController, QuestionRelay, RevealConfig,
    RevealHandle, SubmitOutcome,
};

pub use connector::terminal::ChatSession;
pub use connector::{
    load_system_prompt, Container, ContainerConfig, HttpQuestionRelay, MockChatClient,
    OpenAiClient, Router, SYSTEM_PROMPT_ENV,
};

pub use domain::{
    parse_response, ChatPrompt, ConversationState, DomainError, HistoryEntry, Question,
    StructuredResponse, SystemPrompt,
};
