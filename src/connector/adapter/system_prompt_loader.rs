use std::path::Path;

use tracing::{info, warn};

use crate::domain::{DomainError, SystemPrompt};

pub const SYSTEM_PROMPT_ENV: &str = "SYSTEM_PROMPT_PATH";

const BUNDLED_SYSTEM_PROMPT: &str = include_str!("../../../prompts/system_prompt.md");

/// The charter shipped with the binary.
pub fn bundled_system_prompt() -> SystemPrompt {
    SystemPrompt::new(BUNDLED_SYSTEM_PROMPT.trim())
}

/// Load the system prompt from `path`, or fall back to the bundled charter
/// when no path is configured or the file is blank.
///
/// A configured file that cannot be read is an error rather than a silent
/// fallback.
pub fn load_system_prompt(path: Option<&Path>) -> Result<SystemPrompt, DomainError> {
    let Some(path) = path else {
        return Ok(bundled_system_prompt());
    };

    let text = std::fs::read_to_string(path).map_err(|e| {
        DomainError::configuration(format!(
            "cannot read system prompt {}: {e}",
            path.display()
        ))
    })?;

    if text.trim().is_empty() {
        warn!(
            "System prompt {} is empty; using the bundled prompt",
            path.display()
        );
        return Ok(bundled_system_prompt());
    }

    info!("Loaded system prompt from {}", path.display());
    Ok(SystemPrompt::new(text.trim()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn bundled_prompt_is_not_empty() {
        let prompt = bundled_system_prompt();
        assert!(prompt.as_str().contains("Scriptures"));
    }

    #[test]
    fn no_path_uses_bundled_prompt() {
        assert_eq!(load_system_prompt(None).unwrap(), bundled_system_prompt());
    }

    #[test]
    fn file_contents_override_bundled_prompt() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "  Answer in one sentence.  ").unwrap();

        let prompt = load_system_prompt(Some(file.path())).unwrap();
        assert_eq!(prompt.as_str(), "Answer in one sentence.");
    }

    #[test]
    fn blank_file_falls_back_to_bundled_prompt() {
        let file = NamedTempFile::new().unwrap();
        assert_eq!(
            load_system_prompt(Some(file.path())).unwrap(),
            bundled_system_prompt()
        );
    }

    #[test]
    fn unreadable_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.md");

        let err = load_system_prompt(Some(&missing)).unwrap_err();
        assert!(err.is_configuration());
    }
}
