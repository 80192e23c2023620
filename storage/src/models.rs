//! User record model for persistence.
//!
//! Maps to the `users` table; converts to and from [`formbot_core::User`].

use chrono::{DateTime, Utc};
use formbot_core::{Role, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub chat_id: i64,
    pub username: Option<String>,
    /// Role level; see [`Role`].
    pub role: i32,
    pub locked: bool,
    pub utm: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        User {
            id: r.id,
            chat_id: r.chat_id,
            username: r.username,
            role: Role::new(r.role),
            locked: r.locked,
            utm: r.utm,
            created_at: r.created_at,
        }
    }
}

impl From<&User> for UserRecord {
    fn from(u: &User) -> Self {
        UserRecord {
            id: u.id,
            chat_id: u.chat_id,
            username: u.username.clone(),
            role: u.role.level(),
            locked: u.locked,
            utm: u.utm.clone(),
            created_at: u.created_at,
        }
    }
}
