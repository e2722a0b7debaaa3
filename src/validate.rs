//! Input checks run before any network activity.

use std::fmt;

use crate::error::ValidationError;

/// Maximum characters for a user prompt.
pub const MAX_PROMPT_LENGTH: usize = 50_000;
/// Maximum characters for a system prompt.
pub const MAX_SYSTEM_PROMPT_LENGTH: usize = 10_000;

/// Which input is being validated; selects the length limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Prompt,
    SystemPrompt,
}

impl PromptKind {
    pub fn max_length(self) -> usize {
        match self {
            PromptKind::Prompt => MAX_PROMPT_LENGTH,
            PromptKind::SystemPrompt => MAX_SYSTEM_PROMPT_LENGTH,
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PromptKind::Prompt => "Prompt",
            PromptKind::SystemPrompt => "System prompt",
        };
        write!(f, "{name}")
    }
}

/// Rejects empty, oversized, or NUL-containing text.
///
/// Length is counted in characters, not bytes.
pub fn validate_prompt(text: &str, kind: PromptKind) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::Empty { kind });
    }
    let length = text.chars().count();
    let max = kind.max_length();
    if length > max {
        return Err(ValidationError::TooLong { kind, length, max });
    }
    if text.contains('\0') {
        return Err(ValidationError::InvalidCharacter { kind });
    }
    Ok(())
}

pub fn validate_temperature(temperature: f32) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&temperature) {
        Ok(())
    } else {
        Err(ValidationError::TemperatureOutOfRange(temperature))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn accepts_plain_prompt() {
        assert_eq!(validate_prompt("hello", PromptKind::Prompt), Ok(()));
    }

    #[test]
    fn rejects_empty_prompt() {
        assert_eq!(
            validate_prompt("", PromptKind::Prompt),
            Err(ValidationError::Empty {
                kind: PromptKind::Prompt
            })
        );
    }

    #[rstest]
    #[case(PromptKind::Prompt, MAX_PROMPT_LENGTH)]
    #[case(PromptKind::SystemPrompt, MAX_SYSTEM_PROMPT_LENGTH)]
    fn length_limit_is_inclusive(#[case] kind: PromptKind, #[case] max: usize) {
        assert!(validate_prompt(&"a".repeat(max), kind).is_ok());
        assert_eq!(
            validate_prompt(&"a".repeat(max + 1), kind),
            Err(ValidationError::TooLong {
                kind,
                length: max + 1,
                max
            })
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let text = "é".repeat(MAX_SYSTEM_PROMPT_LENGTH);
        assert!(text.len() > MAX_SYSTEM_PROMPT_LENGTH);
        assert!(validate_prompt(&text, PromptKind::SystemPrompt).is_ok());
    }

    #[test]
    fn rejects_nul_byte() {
        assert_eq!(
            validate_prompt("x\0y", PromptKind::Prompt),
            Err(ValidationError::InvalidCharacter {
                kind: PromptKind::Prompt
            })
        );
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(0.7, true)]
    #[case(1.0, true)]
    #[case(-0.1, false)]
    #[case(1.5, false)]
    #[case(f32::NAN, false)]
    fn temperature_range(#[case] temperature: f32, #[case] ok: bool) {
        assert_eq!(validate_temperature(temperature).is_ok(), ok);
    }
}
