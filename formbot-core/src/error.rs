//! Error types for the bot core.
//!
//! [`FormbotError`] is the top-level error; [`DialogueError`] covers faults raised while a dialogue runs.

use thiserror::Error;

/// Top-level error for formbot (database, outbound channel, dialogue, config, IO).
#[derive(Error, Debug)]
pub enum FormbotError {
    #[error("Database error: {0}")]
    Database(String),

    /// Send, edit, delete or download against the messaging transport failed.
    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Dialogue error: {0}")]
    Dialogue(#[from] DialogueError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Faults raised by step generators and terminal actions.
#[derive(Error, Debug)]
pub enum DialogueError {
    #[error("Invalid input pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Missing answer: {0}")]
    MissingAnswer(String),

    #[error("Execution failed: {0}")]
    Execution(String),
}

/// Result type for core operations; uses [`FormbotError`].
pub type Result<T> = std::result::Result<T, FormbotError>;
