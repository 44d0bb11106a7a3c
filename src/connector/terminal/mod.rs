//! Terminal front-end for a conversation session.

mod chat_session;
mod formatter;

pub use chat_session::*;
pub use formatter::*;
