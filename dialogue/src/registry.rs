//! Registry of active dialogues: a stack per chat, the top being the current dialogue.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use formbot_core::ChatId;
use tracing::debug;

use crate::dialogue::Dialogue;

/// Handle to a registered dialogue. Per-chat ordering comes from the dispatch router, so the
/// inner lock is never contended by two events of the same chat.
pub type SharedDialogue = Arc<tokio::sync::Mutex<Dialogue>>;

struct Entry {
    id: u64,
    dialogue: SharedDialogue,
}

/// Chat id → stack of active dialogues. A chat is present only while its stack is non-empty.
#[derive(Default)]
pub struct DialogueRegistry {
    table: Mutex<HashMap<ChatId, Vec<Entry>>>,
}

impl DialogueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<ChatId, Vec<Entry>>> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Pushes `dialogue` on top of the chat's stack and returns its handle.
    pub fn push(&self, dialogue: Dialogue) -> SharedDialogue {
        let chat_id = dialogue.chat_id();
        let id = dialogue.id();
        let shared = Arc::new(tokio::sync::Mutex::new(dialogue));
        let mut table = self.table();
        let stack = table.entry(chat_id).or_default();
        stack.push(Entry {
            id,
            dialogue: shared.clone(),
        });
        debug!(chat_id = chat_id, dialogue_id = id, depth = stack.len(), "Dialogue registered");
        shared
    }

    /// Current dialogue of the chat.
    pub fn peek(&self, chat_id: ChatId) -> Option<SharedDialogue> {
        self.table()
            .get(&chat_id)
            .and_then(|stack| stack.last())
            .map(|e| e.dialogue.clone())
    }

    /// Removes and returns the current dialogue of the chat.
    pub fn pop(&self, chat_id: ChatId) -> Option<SharedDialogue> {
        let mut table = self.table();
        let stack = table.get_mut(&chat_id)?;
        let entry = stack.pop();
        if stack.is_empty() {
            table.remove(&chat_id);
        }
        entry.map(|e| e.dialogue)
    }

    /// Removes the dialogue with `dialogue_id` wherever it sits in the chat's stack.
    pub fn remove(&self, chat_id: ChatId, dialogue_id: u64) -> bool {
        let mut table = self.table();
        let Some(stack) = table.get_mut(&chat_id) else {
            return false;
        };
        let before = stack.len();
        stack.retain(|e| e.id != dialogue_id);
        let removed = stack.len() != before;
        if stack.is_empty() {
            table.remove(&chat_id);
        }
        if removed {
            debug!(chat_id = chat_id, dialogue_id = dialogue_id, "Dialogue removed");
        }
        removed
    }

    pub fn has_active(&self, chat_id: ChatId) -> bool {
        self.table().contains_key(&chat_id)
    }

    /// Stack depth for the chat.
    pub fn depth(&self, chat_id: ChatId) -> usize {
        self.table().get(&chat_id).map_or(0, Vec::len)
    }

    /// Number of chats with at least one active dialogue.
    pub fn active_chats(&self) -> usize {
        self.table().len()
    }
}
