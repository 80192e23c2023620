//! Mock implementation of [`formbot_core::Bot`] for integration tests.
//!
//! Records every send, edit, delete and document call in order so tests can assert on what the
//! chat would look like without hitting Telegram. Sent messages get increasing ids from 100.

use async_trait::async_trait;
use formbot_core::{Bot, ChatId, FormbotError, Keyboard, MessageId, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Edit {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    },
    Delete {
        chat_id: ChatId,
        message_id: MessageId,
    },
    Document {
        chat_id: ChatId,
        path: PathBuf,
        caption: String,
    },
}

pub struct MockBot {
    next_id: AtomicI32,
    fail_edits: AtomicBool,
    calls: Mutex<Vec<Call>>,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI32::new(100),
            fail_edits: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Every subsequent edit fails, forcing the send fallback.
    pub fn fail_edits(&self) {
        self.fail_edits.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Texts of sent messages, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn edited_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Edit { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn deleted_ids(&self) -> Vec<MessageId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete { message_id, .. } => Some(message_id),
                _ => None,
            })
            .collect()
    }

    /// Last text shown to the user, whether sent or edited.
    pub fn last_shown_text(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|c| match c {
            Call::Send { text, .. } | Call::Edit { text, .. } => Some(text),
            _ => None,
        })
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageId> {
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(Call::Send {
            chat_id,
            message_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(message_id)
    }

    async fn edit_message(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<()> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(FormbotError::Channel("message can't be edited".to_string()));
        }
        self.calls.lock().unwrap().push(Call::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Delete { chat_id, message_id });
        Ok(())
    }

    async fn send_document(&self, chat_id: ChatId, path: &Path, caption: &str) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Document {
            chat_id,
            path: path.to_path_buf(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}
