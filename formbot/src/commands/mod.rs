//! Commands offered by the bot.

mod start;

pub use start::{summary, StartCommand, DOCUMENT_CAPTION};
