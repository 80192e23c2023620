//! User store abstraction. Implementations must be safe to call from any dispatch lane.

use crate::error::Result;
use crate::types::{ChatId, User};
use async_trait::async_trait;

/// Lookup and persistence of [`User`] records keyed by chat id.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_chat_id(&self, chat_id: ChatId) -> Result<Option<User>>;
    /// Inserts or updates by chat id and returns the stored record (with its assigned id).
    async fn save(&self, user: &User) -> Result<User>;
}
