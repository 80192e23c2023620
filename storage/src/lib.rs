//! Storage crate: user persistence over SQLite.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – UserRecord
//! - [`user_repo`] – UserRepository (SQLite), implements [`formbot_core::UserStore`]
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod models;
mod sqlite_pool;
mod user_repo;

pub use error::StorageError;
pub use models::UserRecord;
pub use sqlite_pool::SqlitePoolManager;
pub use user_repo::UserRepository;
