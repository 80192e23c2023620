//! Outbound channel abstraction for sending, editing and deleting messages.
//!
//! [`Bot`] is transport-agnostic; the Telegram implementation lives in `formbot-telegram`.

use crate::error::Result;
use crate::types::{ChatId, Keyboard, MessageId};
use async_trait::async_trait;
use std::path::Path;

/// Outbound channel. Every call may block the calling dispatch lane until the transport answers.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends an HTML-formatted message with optional buttons and returns its id.
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageId>;
    /// Replaces the text of an already-sent message. Callers treat an error as "send a new message instead".
    async fn edit_message(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<()>;
    /// Deletes a message. Callers log and ignore failures.
    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()>;
    /// Sends a local file as a document with a caption.
    async fn send_document(&self, chat_id: ChatId, path: &Path, caption: &str) -> Result<()>;
}
