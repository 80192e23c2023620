//! Entry point: init logging, validate config, build components, then poll until Ctrl-C.

use std::sync::Arc;

use anyhow::Result;
use dispatch::Router;
use formbot_core::init_tracing;
use formbot_telegram::run_polling;
use tracing::{info, instrument};

use crate::components::{
    build_bot_components, build_commands, build_document_generator, build_handler_chain,
};
use crate::config::BaseConfig;

#[instrument(skip(config))]
pub async fn run_bot(config: BaseConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        database_url = %config.database_url,
        lanes = config.router_lanes,
        "Initializing bot"
    );

    let components = build_bot_components(&config).await?;
    let commands = build_commands(
        &config,
        components.bot.clone(),
        build_document_generator(&config),
    );
    let chain = build_handler_chain(
        components.bot.clone(),
        components.users.clone(),
        components.registry.clone(),
        commands,
    );
    let router = Arc::new(Router::new(config.router_lanes)?);

    info!("Bot started successfully");
    run_polling(components.teloxide_bot.clone(), chain, router).await?;

    info!(
        active_dialogues = components.registry.active_chats(),
        "Bot stopped"
    );
    Ok(())
}
