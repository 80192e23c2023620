//! # formbot
//!
//! Telegram questionnaire bot. Wires storage, the dialogue engine, the dispatch router and the
//! Telegram transport; loads config from env and polls until Ctrl-C.

pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod document;
pub mod handlers;
pub mod runner;

pub use cli::{load_config, Cli, Commands};
pub use commands::StartCommand;
pub use components::{
    build_bot_components, build_commands, build_document_generator, build_handler_chain,
    BotComponents,
};
pub use config::BaseConfig;
pub use document::TextDocumentGenerator;
pub use handlers::LoggingHandler;
pub use runner::run_bot;
