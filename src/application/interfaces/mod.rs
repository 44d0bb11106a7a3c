mod chat_client;
mod question_relay;

pub use chat_client::*;
pub use question_relay::*;
