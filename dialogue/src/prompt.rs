//! Prompt: what a step shows the user and how the answer to it is validated.

use formbot_core::{InlineButton, Keyboard, ReplyButton};

pub const DEFAULT_ROW_SIZE: usize = 2;
pub const MATCH_ALL: &str = ".*";
pub const DEFAULT_ERROR_TEXT: &str = "Неверный формат ввода";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Buttons {
    None,
    Reply(Vec<ReplyButton>),
    Inline(Vec<InlineButton>),
}

/// Rendered output of a step plus the validation rules for the answer that follows it.
///
/// Only `text` changes after construction (a validation error suffix may be appended).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    buttons: Buttons,
    row_size: usize,
    input_pattern: String,
    error_text: String,
    requires_attachment: bool,
    can_advance: bool,
}

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Buttons::None,
            row_size: DEFAULT_ROW_SIZE,
            input_pattern: MATCH_ALL.to_string(),
            error_text: DEFAULT_ERROR_TEXT.to_string(),
            requires_attachment: false,
            can_advance: true,
        }
    }

    /// Reply buttons; replaces any inline buttons.
    pub fn reply_buttons(mut self, buttons: Vec<ReplyButton>) -> Self {
        self.buttons = Buttons::Reply(buttons);
        self
    }

    /// Inline buttons; replaces any reply buttons.
    pub fn inline_buttons(mut self, buttons: Vec<InlineButton>) -> Self {
        self.buttons = Buttons::Inline(buttons);
        self
    }

    pub fn row_size(mut self, row_size: usize) -> Self {
        self.row_size = row_size;
        self
    }

    /// Regex the next answer must fully match.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.input_pattern = pattern.into();
        self
    }

    pub fn error_text(mut self, error_text: impl Into<String>) -> Self {
        self.error_text = error_text.into();
        self
    }

    /// The next answer must carry an attachment; its text is not checked.
    pub fn require_attachment(mut self) -> Self {
        self.requires_attachment = true;
        self
    }

    /// Keeps the step at the front of the queue after it is shown.
    pub fn hold(mut self) -> Self {
        self.can_advance = false;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Appends `<i>error</i>` after a blank line.
    pub fn append_error(&mut self, error: &str) {
        self.text.push_str("\n\n<i>");
        self.text.push_str(error);
        self.text.push_str("</i>");
    }

    /// Buttons laid out `row_size` per row, or `None` when the prompt has none.
    pub fn keyboard(&self) -> Option<Keyboard> {
        let keyboard = match &self.buttons {
            Buttons::None => return None,
            Buttons::Reply(buttons) => Keyboard::Reply {
                buttons: buttons.clone(),
                row_size: self.row_size,
            },
            Buttons::Inline(buttons) => Keyboard::Inline {
                buttons: buttons.clone(),
                row_size: self.row_size,
            },
        };
        (!keyboard.is_empty()).then_some(keyboard)
    }

    pub fn input_pattern(&self) -> &str {
        &self.input_pattern
    }

    pub fn error(&self) -> &str {
        &self.error_text
    }

    pub fn requires_attachment(&self) -> bool {
        self.requires_attachment
    }

    pub fn can_advance(&self) -> bool {
        self.can_advance
    }
}
