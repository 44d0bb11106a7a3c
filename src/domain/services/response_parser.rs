//! Splits a model answer into the sections of a [`StructuredResponse`].
//!
//! The model is asked to answer as a numbered list:
//!
//! ```text
//! 1. Content: ...
//! 2. Key Takeaways: - ... - ...
//! 3. Reflection Question: ...
//! 4. Biblical References: - ... - ...
//! ```
//!
//! Model output is free text, so this is a tolerant segmenter rather than a
//! grammar: anything that does not fit leaves the affected fields empty (or
//! attributed to the wrong section) and parsing never fails.

use crate::domain::StructuredResponse;

const CONTENT_LABEL: &str = "Content:";
const KEY_TAKEAWAYS_LABEL: &str = "Key Takeaways:";
const REFLECTION_QUESTION_LABEL: &str = "Reflection Question:";
const BIBLICAL_REFERENCES_LABEL: &str = "Biblical References:";

const LIST_ITEM_SEPARATOR: char = '-';

/// Parse a raw model answer.
///
/// Text before the first list marker is discarded, so a string without any
/// marker (including a field previously extracted by this function) parses to
/// an all-empty response.
pub fn parse_response(raw: &str) -> StructuredResponse {
    let sections = split_on_list_markers(raw);
    let section = |index: usize| sections.get(index).copied();

    let content = section(1)
        .map(|text| strip_label(text, CONTENT_LABEL))
        .unwrap_or_default();
    let key_takeaways = section(2)
        .map(|text| split_list(&strip_label(text, KEY_TAKEAWAYS_LABEL)))
        .unwrap_or_default();
    let reflection_question = section(3)
        .map(|text| strip_label(text, REFLECTION_QUESTION_LABEL))
        .unwrap_or_default();
    let biblical_references = section(4)
        .map(|text| split_list(&strip_label(text, BIBLICAL_REFERENCES_LABEL)))
        .unwrap_or_default();

    StructuredResponse::new(content)
        .with_key_takeaways(key_takeaways)
        .with_reflection_question(reflection_question)
        .with_biblical_references(biblical_references)
}

/// Split `text` on every numbered-list marker: one or more ASCII digits, a
/// period, then at least one whitespace character. The first element is the
/// text before the first marker and may be empty.
fn split_on_list_markers(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut section_start = 0;
    let mut cursor = 0;

    while cursor < text.len() {
        match match_list_marker(&text[cursor..]) {
            Some(marker_len) => {
                sections.push(&text[section_start..cursor]);
                cursor += marker_len;
                section_start = cursor;
            }
            None => {
                // Advance one character, staying on a char boundary.
                let step = text[cursor..].chars().next().map_or(1, char::len_utf8);
                cursor += step;
            }
        }
    }

    sections.push(&text[section_start..]);
    sections
}

/// Byte length of the list marker at the start of `text`, if there is one.
fn match_list_marker(text: &str) -> Option<usize> {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let rest = text[digits..].strip_prefix('.')?;
    let whitespace: usize = rest
        .chars()
        .take_while(|c| c.is_whitespace())
        .map(char::len_utf8)
        .sum();
    if whitespace == 0 {
        return None;
    }

    Some(digits + 1 + whitespace)
}

/// Remove the first occurrence of `label` and trim the remainder.
fn strip_label(section: &str, label: &str) -> String {
    section.replacen(label, "", 1).trim().to_string()
}

/// Split a bulleted section into its items. Empty fragments are dropped
/// before trimming, matching how the front-end has always split lists.
fn split_list(section: &str) -> Vec<String> {
    section
        .split(LIST_ITEM_SEPARATOR)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| fragment.trim().to_string())
        .collect()
}
