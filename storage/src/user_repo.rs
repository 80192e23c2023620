//! User repository: persistence and lookup of users by chat id.
//!
//! One row per chat; `save` upserts on `chat_id`.

use async_trait::async_trait;
use formbot_core::{ChatId, Role, User, UserStore};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct UserRepository {
    pool_manager: SqlitePoolManager,
}

impl UserRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating users table if not exists");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chat_id INTEGER NOT NULL UNIQUE,
                username TEXT,
                role INTEGER NOT NULL DEFAULT 0,
                locked INTEGER NOT NULL DEFAULT 0,
                utm TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn find(&self, chat_id: ChatId) -> Result<Option<UserRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let record = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE chat_id = ?")
            .bind(chat_id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Inserts or updates by chat id; returns the stored row.
    pub async fn upsert(&self, record: &UserRecord) -> Result<UserRecord, StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO users (chat_id, username, role, locked, utm, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(chat_id) DO UPDATE SET
                username = excluded.username,
                role = excluded.role,
                locked = excluded.locked,
                utm = excluded.utm
            "#,
        )
        .bind(record.chat_id)
        .bind(&record.username)
        .bind(record.role)
        .bind(record.locked)
        .bind(&record.utm)
        .bind(record.created_at)
        .execute(pool)
        .await?;

        let stored = self
            .find(record.chat_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("user for chat {}", record.chat_id)))?;

        debug!(chat_id = stored.chat_id, user_id = stored.id, "Saved user");
        Ok(stored)
    }

    pub async fn set_locked(&self, chat_id: ChatId, locked: bool) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE users SET locked = ? WHERE chat_id = ?")
            .bind(locked)
            .bind(chat_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_role(&self, chat_id: ChatId, role: Role) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE chat_id = ?")
            .bind(role.level())
            .bind(chat_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(total.0)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_chat_id(&self, chat_id: ChatId) -> formbot_core::Result<Option<User>> {
        Ok(self.find(chat_id).await?.map(User::from))
    }

    async fn save(&self, user: &User) -> formbot_core::Result<User> {
        let stored = self.upsert(&UserRecord::from(user)).await?;
        Ok(stored.into())
    }
}
