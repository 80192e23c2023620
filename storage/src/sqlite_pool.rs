//! SQLite pool shared by every dispatch lane.

use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Lanes may write users concurrently; writers wait this long for the file lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// One WAL-mode SQLite pool; the database file is created when missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    pub async fn new(database_path: &str) -> Result<Self, sqlx::Error> {
        Self::with_max_connections(database_path, DEFAULT_MAX_CONNECTIONS).await
    }

    pub async fn with_max_connections(
        database_path: &str,
        max_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        info!(
            database_path = %database_path,
            max_connections = max_connections,
            "Opening SQLite pool"
        );

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
