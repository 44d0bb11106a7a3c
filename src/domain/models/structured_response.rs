use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Prefix of the explanatory content shown when a submission fails.
pub const ERROR_CONTENT_PREFIX: &str = "An error occurred while processing your request";

/// An answer split into the four sections the front-end lays out.
///
/// Every field defaults to empty; a missing section is never `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredResponse {
    content: String,
    key_takeaways: Vec<String>,
    reflection_question: String,
    biblical_references: Vec<String>,
}

impl StructuredResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// A synthetic response whose content explains a failed submission.
    pub fn error(message: Option<&str>) -> Self {
        let message = message.unwrap_or("Unknown error");
        Self::new(format!("{ERROR_CONTENT_PREFIX}: {message}"))
    }

    pub fn with_key_takeaways(mut self, takeaways: Vec<String>) -> Self {
        self.key_takeaways = takeaways;
        self
    }

    pub fn with_reflection_question(mut self, question: impl Into<String>) -> Self {
        self.reflection_question = question.into();
        self
    }

    pub fn with_biblical_references(mut self, references: Vec<String>) -> Self {
        self.biblical_references = references;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn key_takeaways(&self) -> &[String] {
        &self.key_takeaways
    }

    pub fn reflection_question(&self) -> &str {
        &self.reflection_question
    }

    pub fn biblical_references(&self) -> &[String] {
        &self.biblical_references
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
            && self.key_takeaways.is_empty()
            && self.reflection_question.is_empty()
            && self.biblical_references.is_empty()
    }

    /// Length of `content` in characters, the unit the typing reveal advances by.
    pub fn content_char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Copy of this response with only the first `chars` characters of
    /// `content`; the other sections are kept whole.
    pub fn with_revealed_content(&self, chars: usize) -> Self {
        Self {
            content: self.content.chars().take(chars).collect(),
            ..self.clone()
        }
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string(self)
            .map_err(|e| DomainError::internal(format!("failed to serialize answer: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json).map_err(|e| DomainError::format(format!("stored answer: {e}")))
    }
}
