use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StructuredResponse;
use crate::domain::DomainError;

/// One completed question/answer exchange in the session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    id: String,
    question: String,
    /// The answer as serialized [`StructuredResponse`] JSON.
    answer: String,
    selected: bool,
}

impl HistoryEntry {
    /// Record an answered question. The id is a UUID v7, so ids sort in
    /// creation order.
    pub fn new(question: impl Into<String>, answer: &StructuredResponse) -> Result<Self, DomainError> {
        Ok(Self {
            id: Uuid::now_v7().to_string(),
            question: question.into(),
            answer: answer.to_json()?,
            selected: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn decoded_answer(&self) -> Result<StructuredResponse, DomainError> {
        StructuredResponse::from_json(&self.answer)
    }
}
