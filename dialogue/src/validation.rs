//! Validation state carried between steps: the rules the next answer is checked against.

use formbot_core::{DialogueError, InboundEvent};
use regex::Regex;

use crate::prompt::{Prompt, MATCH_ALL};

/// Error text used until the first prompt is accepted.
pub const DEFAULT_CARRIED_ERROR: &str = "Неверный формат ввода. Попробуйте еще раз.";
pub const ATTACHMENT_REQUIRED_TEXT: &str = "Необходимо прикрепить фото";

/// Why an answer was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    MissingAttachment,
    /// No text, or text not fully matching the pattern; carries the error text to show.
    Mismatch(String),
}

impl ValidationFailure {
    pub fn message(&self) -> &str {
        match self {
            ValidationFailure::MissingAttachment => ATTACHMENT_REQUIRED_TEXT,
            ValidationFailure::Mismatch(text) => text,
        }
    }
}

/// Rules taken from the last accepted prompt. Replaced wholesale, never mutated.
#[derive(Debug, Clone)]
pub struct ValidationState {
    source: String,
    pattern: Regex,
    error_text: String,
    requires_attachment: bool,
}

impl ValidationState {
    /// Compiles `pattern` with full-match semantics.
    pub fn new(
        pattern: &str,
        error_text: &str,
        requires_attachment: bool,
    ) -> Result<Self, DialogueError> {
        let anchored = format!("^(?:{})$", pattern);
        let compiled = Regex::new(&anchored).map_err(|e| DialogueError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            pattern: compiled,
            error_text: error_text.to_string(),
            requires_attachment,
        })
    }

    /// Match-all state a dialogue starts with.
    pub fn initial() -> Result<Self, DialogueError> {
        Self::new(MATCH_ALL, DEFAULT_CARRIED_ERROR, false)
    }

    pub fn from_prompt(prompt: &Prompt) -> Result<Self, DialogueError> {
        Self::new(
            prompt.input_pattern(),
            prompt.error(),
            prompt.requires_attachment(),
        )
    }

    /// Attachment requirement is checked first; the pattern only applies when no attachment is required.
    pub fn check(&self, event: &InboundEvent) -> Result<(), ValidationFailure> {
        if self.requires_attachment {
            return if event.has_attachment() {
                Ok(())
            } else {
                Err(ValidationFailure::MissingAttachment)
            };
        }
        match event.text.as_deref() {
            Some(text) if self.pattern.is_match(text) => Ok(()),
            _ => Err(ValidationFailure::Mismatch(self.error_text.clone())),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.source
    }

    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    pub fn requires_attachment(&self) -> bool {
        self.requires_attachment
    }
}
