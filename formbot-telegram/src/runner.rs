//! Long-polling runner: classifies every teloxide Update and hands it to the dispatch router,
//! which runs the handler chain on the chat's lane.

use std::sync::Arc;

use anyhow::Result;
use dispatch::{DispatchError, Router};
use formbot_core::ToCoreEvent;
use handler_chain::HandlerChain;
use teloxide::prelude::*;
use teloxide::types::Update;
use tracing::{debug, error, info, instrument};

use crate::adapters::TelegramUpdateWrapper;

/// Classifies `update` and queues the handler chain on its chat's lane.
///
/// Returns `Ok(false)` when the update belongs to no chat and was dropped.
pub fn submit_update(
    router: &Router,
    chain: &HandlerChain,
    update: &Update,
) -> std::result::Result<bool, DispatchError> {
    let Some(event) = TelegramUpdateWrapper(update).to_core() else {
        debug!(update_id = update.id.0, "Update without chat, dropped");
        return Ok(false);
    };

    info!(
        chat_id = event.chat_id,
        sender_id = event.sender_id,
        kind = ?event.kind,
        message_id = event.message_id,
        "Received event"
    );

    let chain = chain.clone();
    router.submit(event.chat_id, async move {
        info!(
            chat_id = event.chat_id,
            message_id = event.message_id,
            "step: processing event (handler chain started)"
        );
        if let Err(e) = chain.handle(&event).await {
            error!(error = %e, chat_id = event.chat_id, "Handler chain failed");
        }
    })?;
    Ok(true)
}

/// Polls Telegram until Ctrl-C, then drains the router.
#[instrument(skip(bot, chain, router))]
pub async fn run_polling(bot: teloxide::Bot, chain: HandlerChain, router: Arc<Router>) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(username = ?me.user.username, "Connected to Telegram"),
        Err(e) => error!(error = %e, "get_me failed"),
    }

    let lanes = router.clone();
    let handler = dptree::endpoint(move |update: Update| {
        let router = lanes.clone();
        let chain = chain.clone();
        async move {
            if let Err(e) = submit_update(&router, &chain, &update) {
                error!(error = %e, update_id = update.id.0, "Failed to dispatch update");
            }
            respond(())
        }
    });

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Polling stopped, draining dispatch lanes");
    router.shutdown();
    router.join().await;
    Ok(())
}
