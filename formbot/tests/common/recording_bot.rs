//! Recording [`formbot_core::Bot`]: keeps every outbound call so tests can replay the chat.

use async_trait::async_trait;
use formbot_core::{Bot, ChatId, Keyboard, MessageId, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Text {
        message_id: MessageId,
        text: String,
        has_keyboard: bool,
    },
    Edit {
        message_id: MessageId,
        text: String,
    },
    Delete(MessageId),
    Document {
        chat_id: ChatId,
        path: PathBuf,
        caption: String,
    },
}

pub struct RecordingBot {
    next_id: AtomicI32,
    outbound: Mutex<Vec<Outbound>>,
}

impl RecordingBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI32::new(100),
            outbound: Mutex::new(Vec::new()),
        })
    }

    pub fn outbound(&self) -> Vec<Outbound> {
        self.outbound.lock().unwrap().clone()
    }

    /// Text the user currently sees last, sent or edited.
    pub fn last_shown_text(&self) -> Option<String> {
        self.outbound().into_iter().rev().find_map(|o| match o {
            Outbound::Text { text, .. } | Outbound::Edit { text, .. } => Some(text),
            _ => None,
        })
    }

    /// Every text ever shown, sent or edited, in order.
    pub fn shown_texts(&self) -> Vec<String> {
        self.outbound()
            .into_iter()
            .filter_map(|o| match o {
                Outbound::Text { text, .. } | Outbound::Edit { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn documents(&self) -> Vec<(PathBuf, String)> {
        self.outbound()
            .into_iter()
            .filter_map(|o| match o {
                Outbound::Document { path, caption, .. } => Some((path, caption)),
                _ => None,
            })
            .collect()
    }

    /// Id of the newest message sent with a keyboard; button presses refer to it.
    pub fn last_keyboard_message(&self) -> Option<MessageId> {
        self.outbound().into_iter().rev().find_map(|o| match o {
            Outbound::Text {
                message_id,
                has_keyboard: true,
                ..
            } => Some(message_id),
            _ => None,
        })
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(
        &self,
        _chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageId> {
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.outbound.lock().unwrap().push(Outbound::Text {
            message_id,
            text: text.to_string(),
            has_keyboard: keyboard.is_some(),
        });
        Ok(message_id)
    }

    async fn edit_message(&self, _chat_id: ChatId, message_id: MessageId, text: &str) -> Result<()> {
        self.outbound.lock().unwrap().push(Outbound::Edit {
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, _chat_id: ChatId, message_id: MessageId) -> Result<()> {
        self.outbound
            .lock()
            .unwrap()
            .push(Outbound::Delete(message_id));
        Ok(())
    }

    async fn send_document(&self, chat_id: ChatId, path: &Path, caption: &str) -> Result<()> {
        self.outbound.lock().unwrap().push(Outbound::Document {
            chat_id,
            path: path.to_path_buf(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}
