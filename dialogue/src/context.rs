//! Per-dialogue history of accepted events and auxiliary values.

use std::collections::HashMap;

use formbot_core::{ChatId, InboundEvent};

/// Accepted events in arrival order plus a free-form key/value map, owned by one chat.
#[derive(Debug, Clone)]
pub struct DialogueContext {
    chat_id: ChatId,
    events: Vec<InboundEvent>,
    data: HashMap<String, String>,
}

impl DialogueContext {
    pub fn new(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            events: Vec::new(),
            data: HashMap::new(),
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn record(&mut self, event: InboundEvent) {
        self.events.push(event);
    }

    /// Drops the most recent event; used when it failed validation.
    pub fn discard_last(&mut self) -> Option<InboundEvent> {
        self.events.pop()
    }

    pub fn events(&self) -> &[InboundEvent] {
        &self.events
    }

    pub fn event(&self, index: usize) -> Option<&InboundEvent> {
        self.events.get(index)
    }

    /// Text of the event at `index`, if any.
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.events.get(index).and_then(|e| e.text.as_deref())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}
