mod ask_question;
mod conversation;

pub use ask_question::*;
pub use conversation::*;
