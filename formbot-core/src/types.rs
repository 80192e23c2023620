//! Core types: inbound event, user and role, keyboards, handler response, and the Handler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of one conversation. Telegram group chats use negative ids.
pub type ChatId = i64;

/// Transport message id (Telegram `message_id`).
pub type MessageId = i32;

/// Subtype of the raw update an [`InboundEvent`] was classified from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Message,
    CallbackQuery,
    InlineQuery,
    ChosenInlineQuery,
    EditedMessage,
    ChannelPost,
    EditedChannelPost,
    ShippingQuery,
    PreCheckoutQuery,
    Poll,
    PollAnswer,
    ChatJoinRequest,
    MyChatMember,
    ChatMember,
    Unknown,
}

/// Reference to a file attached to an inbound message; resolved later by an
/// [`AttachmentFetcher`](crate::AttachmentFetcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_id: String,
    pub file_size: u32,
}

/// Canonical inbound event, independent of the update subtype. Immutable once classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub chat_id: ChatId,
    pub sender_id: i64,
    pub sender_username: Option<String>,
    /// `-1` when the update kind carries no message.
    pub message_id: MessageId,
    pub text: Option<String>,
    pub attachment: Option<Attachment>,
    pub is_callback: bool,
    pub kind: EventKind,
    pub received_at: DateTime<Utc>,
}

impl InboundEvent {
    /// Plain text message event; the common case in tests and fixtures.
    pub fn text(chat_id: ChatId, message_id: MessageId, text: &str) -> Self {
        Self {
            chat_id,
            sender_id: chat_id,
            sender_username: None,
            message_id,
            text: Some(text.to_string()),
            attachment: None,
            is_callback: false,
            kind: EventKind::Message,
            received_at: Utc::now(),
        }
    }

    /// Button press carrying callback `data`; `message_id` is the message the button belongs to.
    pub fn callback(chat_id: ChatId, message_id: MessageId, data: &str) -> Self {
        Self {
            is_callback: true,
            kind: EventKind::CallbackQuery,
            ..Self::text(chat_id, message_id, data)
        }
    }

    /// Message carrying an attachment and an optional caption.
    pub fn with_attachment(
        chat_id: ChatId,
        message_id: MessageId,
        attachment: Attachment,
        caption: Option<&str>,
    ) -> Self {
        Self {
            text: caption.map(|s| s.to_string()),
            attachment: Some(attachment),
            ..Self::text(chat_id, message_id, "")
        }
    }

    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }

    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Privilege level. Commands are visible and usable when their required level is at most the user's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Role(i32);

impl Role {
    pub const USER: Role = Role(0);
    pub const ADMIN: Role = Role(i32::MAX);
    pub const MIN: Role = Role::USER;
    pub const MAX: Role = Role::ADMIN;

    pub const fn new(level: i32) -> Self {
        Role(level)
    }

    pub const fn level(self) -> i32 {
        self.0
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::USER
    }
}

/// Account of one chat partner. `id` is `0` until the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub chat_id: ChatId,
    pub username: Option<String>,
    pub role: Role,
    pub locked: bool,
    pub utm: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// New unlocked user at [`Role::USER`], created on first contact.
    pub fn new(chat_id: ChatId, username: Option<String>, utm: Option<String>) -> Self {
        Self {
            id: 0,
            chat_id,
            username,
            role: Role::USER,
            locked: false,
            utm,
            created_at: Utc::now(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Reply-keyboard button; pressing it sends its text as a regular message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyButton {
    pub text: String,
}

impl ReplyButton {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

/// Inline button: either sends callback data or opens a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub callback: String,
    pub url: Option<String>,
}

impl InlineButton {
    pub fn callback(text: &str, callback: &str) -> Self {
        Self {
            text: text.to_string(),
            callback: callback.to_string(),
            url: None,
        }
    }

    pub fn link(text: &str, url: &str) -> Self {
        Self {
            text: text.to_string(),
            callback: String::new(),
            url: Some(url.to_string()),
        }
    }
}

/// Buttons attached to an outbound message; reply and inline sets never mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyboard {
    Reply {
        buttons: Vec<ReplyButton>,
        row_size: usize,
    },
    Inline {
        buttons: Vec<InlineButton>,
        row_size: usize,
    },
}

impl Keyboard {
    pub fn row_size(&self) -> usize {
        match self {
            Keyboard::Reply { row_size, .. } | Keyboard::Inline { row_size, .. } => {
                (*row_size).max(1)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Keyboard::Reply { buttons, .. } => buttons.is_empty(),
            Keyboard::Inline { buttons, .. } => buttons.is_empty(),
        }
    }
}

/// Handler result for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; the event was consumed.
    Stop,
}

/// Converts a transport-specific update into a core [`InboundEvent`]. `None` when the update
/// does not belong to any chat.
pub trait ToCoreEvent: Send + Sync {
    fn to_core(&self) -> Option<InboundEvent>;
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _event: &InboundEvent) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the event. Return Stop to end the handle phase. Default: Continue.
    async fn handle(&self, _event: &InboundEvent) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _event: &InboundEvent,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}
