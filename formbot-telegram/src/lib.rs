//! # formbot-telegram
//!
//! Telegram transport layer: update classification into [`formbot_core::InboundEvent`],
//! [`formbot_core::Bot`] and [`formbot_core::AttachmentFetcher`] implementations, minimal config,
//! and the long-polling runner that feeds the dispatch router.
//! Handles only Telegram connectivity; dialogue logic lives in the `dialogue` crate.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{event_kind, TelegramUpdateWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::{run_polling, submit_update};
