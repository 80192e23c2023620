//! # Handler chain
//!
//! Runs a sequence of handlers for each inbound event. Each handler has optional before/handle/after:
//! all before run in order (any false stops the chain); then handle runs until one returns Stop;
//! then all after run in reverse.

use formbot_core::{Handler, HandlerResponse, InboundEvent, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Chain of handlers: before (all) → handle (until Stop) → after (reverse).
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs all before → handle until Stop → all after in reverse. Returns Stop if any handler
    /// consumed the event, otherwise Continue.
    #[instrument(skip(self, event), fields(chat_id = event.chat_id))]
    pub async fn handle(&self, event: &InboundEvent) -> Result<HandlerResponse> {
        let mut final_response = HandlerResponse::Continue;

        debug!(
            chat_id = event.chat_id,
            message_id = event.message_id,
            kind = ?event.kind,
            "step: handler_chain started"
        );

        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            let should_continue = h.before(event).await?;
            if !should_continue {
                info!(chat_id = event.chat_id, handler = %name, "step: before returned false, chain stopped");
                return Ok(HandlerResponse::Stop);
            }
        }

        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            let response = h.handle(event).await?;
            debug!(chat_id = event.chat_id, handler = %name, response = ?response, "step: handler handle done");

            if response == HandlerResponse::Stop {
                final_response = response;
                break;
            }
        }

        for h in self.handlers.iter().rev() {
            h.after(event, &final_response).await?;
        }

        debug!(
            chat_id = event.chat_id,
            message_id = event.message_id,
            response = ?final_response,
            "step: handler_chain finished"
        );

        Ok(final_response)
    }
}

// Tests live in tests/handler_chain_test.rs
