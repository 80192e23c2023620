//! In-memory [`formbot_core::UserStore`] for handler tests.

use async_trait::async_trait;
use formbot_core::{ChatId, Result, User, UserStore};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<ChatId, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds a user (e.g. locked or with a higher role).
    pub fn with_user(self, user: User) -> Self {
        self.users.lock().unwrap().insert(user.chat_id, user);
        self
    }

    pub fn get(&self, chat_id: ChatId) -> Option<User> {
        self.users.lock().unwrap().get(&chat_id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_chat_id(&self, chat_id: ChatId) -> Result<Option<User>> {
        Ok(self.get(chat_id))
    }

    async fn save(&self, user: &User) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let mut stored = user.clone();
        if stored.id == 0 {
            stored.id = users.len() as i64 + 1;
        }
        users.insert(stored.chat_id, stored.clone());
        Ok(stored)
    }
}
