use crate::domain::{HistoryEntry, StructuredResponse};

/// Render the three sections that follow the main content.
pub fn format_sections(response: &StructuredResponse) -> String {
    let mut output = String::new();

    if !response.key_takeaways().is_empty() {
        output.push_str("\nKey Takeaways\n");
        for takeaway in response.key_takeaways() {
            output.push_str(&format!("  • {}\n", takeaway));
        }
    }

    if !response.reflection_question().is_empty() {
        output.push_str("\nReflection Question\n");
        output.push_str(&format!("  {}\n", response.reflection_question()));
    }

    if !response.biblical_references().is_empty() {
        output.push_str("\nBiblical References\n");
        output.push_str(&format!("  {}\n", response.biblical_references().join(" · ")));
    }

    output
}

/// Render a full answer: content first, then the remaining sections.
pub fn format_response(response: &StructuredResponse) -> String {
    let mut output = format!("{}\n", response.content());
    output.push_str(&format_sections(response));
    output
}

pub fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No questions asked yet.".to_string();
    }

    let mut output = format!("{} question(s) this session:\n\n", entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let marker = if entry.is_selected() { '*' } else { ' ' };
        output.push_str(&format!(
            "{marker} {}. {}\n     id: {}\n",
            i + 1,
            entry.question(),
            entry.id()
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_response_lists_all_sections() {
        let response = StructuredResponse::new("God is love.")
            .with_key_takeaways(vec!["Love".to_string(), "Grace".to_string()])
            .with_reflection_question("Whom will you love today?")
            .with_biblical_references(vec!["1 John 4:8".to_string(), "John 3:16".to_string()]);

        let output = format_response(&response);

        assert!(output.starts_with("God is love.\n"));
        assert!(output.contains("Key Takeaways\n  • Love\n  • Grace\n"));
        assert!(output.contains("Reflection Question\n  Whom will you love today?\n"));
        assert!(output.contains("Biblical References\n  1 John 4:8 · John 3:16\n"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let output = format_response(&StructuredResponse::new("Only content"));
        assert_eq!(output, "Only content\n");
    }

    #[test]
    fn test_format_history_marks_selection() {
        let answer = StructuredResponse::new("a");
        let mut selected = HistoryEntry::new("Second question", &answer).unwrap();
        selected.set_selected(true);
        let entries = vec![HistoryEntry::new("First question", &answer).unwrap(), selected];

        let output = format_history(&entries);

        assert!(output.starts_with("2 question(s) this session:"));
        assert!(output.contains("  1. First question\n"));
        assert!(output.contains("* 2. Second question\n"));
    }

    #[test]
    fn test_format_empty_history() {
        assert_eq!(format_history(&[]), "No questions asked yet.");
    }
}
