use super::{HistoryEntry, StructuredResponse};

/// Observable state of a conversation session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    /// Text currently in the input box.
    pub query: String,
    /// The answer being shown; `None` while a request is in flight.
    pub response: Option<StructuredResponse>,
    pub loading: bool,
    /// True while the content of `response` is still being revealed.
    pub is_typing: bool,
    pub history: Vec<HistoryEntry>,
}

impl ConversationState {
    pub fn selected_entry(&self) -> Option<&HistoryEntry> {
        self.history.iter().find(|entry| entry.is_selected())
    }

    pub fn find_entry(&self, id: &str) -> Option<&HistoryEntry> {
        self.history.iter().find(|entry| entry.id() == id)
    }
}
