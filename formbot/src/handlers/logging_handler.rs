//! Logs each inbound event before the conversation handler sees it.

use async_trait::async_trait;
use formbot_core::{Handler, HandlerResponse, InboundEvent, Result};
use tracing::{debug, info, instrument};

/// Logs in before() and the response in after(); always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, event))]
    async fn before(&self, event: &InboundEvent) -> Result<bool> {
        info!(
            chat_id = event.chat_id,
            sender_id = event.sender_id,
            username = %event.sender_username.as_deref().unwrap_or("unknown"),
            kind = ?event.kind,
            message_content = %event.text_or_empty(),
            has_attachment = event.has_attachment(),
            "Received event"
        );
        Ok(true)
    }

    #[instrument(skip(self, event, response))]
    async fn after(&self, event: &InboundEvent, response: &HandlerResponse) -> Result<()> {
        debug!(
            chat_id = event.chat_id,
            message_id = event.message_id,
            response = ?response,
            "Processed event"
        );
        Ok(())
    }
}
