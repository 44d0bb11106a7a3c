/// A question typed by the user. Never blank; the text is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_rejected() {
        assert!(Question::new("").is_none());
        assert!(Question::new("   \n\t").is_none());
    }

    #[test]
    fn test_text_is_not_trimmed() {
        let question = Question::new("  Who was Melchizedek? ").unwrap();
        assert_eq!(question.as_str(), "  Who was Melchizedek? ");
    }
}
