//! Component factory: builds the transport, storage, registry and handler chain from config.

use std::sync::Arc;

use anyhow::Result;
use dialogue::{CommandTable, ConversationHandler, DialogueRegistry};
use formbot_core::{AttachmentFetcher, Bot, DocumentGenerator, UserStore};
use formbot_telegram::TelegramBotAdapter;
use handler_chain::HandlerChain;
use storage::UserRepository;
use tracing::{error, info, instrument};

use crate::commands::StartCommand;
use crate::config::BaseConfig;
use crate::document::TextDocumentGenerator;
use crate::handlers::LoggingHandler;

/// Long-lived dependencies of a running bot.
#[derive(Clone)]
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    pub bot: Arc<TelegramBotAdapter>,
    pub users: Arc<UserRepository>,
    pub registry: Arc<DialogueRegistry>,
}

#[instrument(skip(config))]
pub async fn build_bot_components(config: &BaseConfig) -> Result<BotComponents> {
    let users = Arc::new(
        UserRepository::new(&config.database_url)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    database_url = %config.database_url,
                    "Failed to initialize user storage"
                );
                anyhow::anyhow!("Failed to initialize user storage: {}", e)
            })?,
    );

    let teloxide_bot = config.telegram().build_bot()?;
    let bot = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    info!(database_url = %config.database_url, "Components built");

    Ok(BotComponents {
        teloxide_bot,
        bot,
        users,
        registry: Arc::new(DialogueRegistry::new()),
    })
}

/// Commands available to users, in lookup order.
pub fn build_commands(
    config: &BaseConfig,
    fetcher: Arc<dyn AttachmentFetcher>,
    documents: Arc<dyn DocumentGenerator>,
) -> CommandTable {
    CommandTable::new().add(Arc::new(StartCommand::new(
        fetcher,
        documents,
        config.download_dir.clone(),
    )))
}

/// Default document generator writing under DOCUMENT_DIR.
pub fn build_document_generator(config: &BaseConfig) -> Arc<dyn DocumentGenerator> {
    Arc::new(TextDocumentGenerator::new(config.document_dir.clone()))
}

/// Chain: logging → conversation.
pub fn build_handler_chain(
    bot: Arc<dyn Bot>,
    users: Arc<dyn UserStore>,
    registry: Arc<DialogueRegistry>,
    commands: CommandTable,
) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(ConversationHandler::new(
            bot, users, registry, commands,
        )))
}
