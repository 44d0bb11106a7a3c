mod chat_prompt;
mod conversation_state;
mod history_entry;
mod question;
mod structured_response;

pub use chat_prompt::*;
pub use conversation_state::*;
pub use history_entry::*;
pub use question::*;
pub use structured_response::*;
