//! Adapters from Telegram (teloxide) updates to formbot_core types.
//! Depends only on teloxide and formbot_core type definitions.

use chrono::Utc;
use formbot_core::{Attachment, EventKind, InboundEvent, ToCoreEvent};
use teloxide::types::{CallbackQuery, Message, PhotoSize, Update, UpdateKind};

/// Message id used for update kinds that carry no message.
const NO_MESSAGE: i32 = -1;

/// Tag of the update subtype.
pub fn event_kind(kind: &UpdateKind) -> EventKind {
    match kind {
        UpdateKind::Message(_) => EventKind::Message,
        UpdateKind::CallbackQuery(_) => EventKind::CallbackQuery,
        UpdateKind::InlineQuery(_) => EventKind::InlineQuery,
        UpdateKind::ChosenInlineResult(_) => EventKind::ChosenInlineQuery,
        UpdateKind::EditedMessage(_) => EventKind::EditedMessage,
        UpdateKind::ChannelPost(_) => EventKind::ChannelPost,
        UpdateKind::EditedChannelPost(_) => EventKind::EditedChannelPost,
        UpdateKind::ShippingQuery(_) => EventKind::ShippingQuery,
        UpdateKind::PreCheckoutQuery(_) => EventKind::PreCheckoutQuery,
        UpdateKind::Poll(_) => EventKind::Poll,
        UpdateKind::PollAnswer(_) => EventKind::PollAnswer,
        UpdateKind::ChatJoinRequest(_) => EventKind::ChatJoinRequest,
        UpdateKind::MyChatMember(_) => EventKind::MyChatMember,
        UpdateKind::ChatMember(_) => EventKind::ChatMember,
        _ => EventKind::Unknown,
    }
}

/// Wraps a teloxide Update for conversion to core [`InboundEvent`].
///
/// Updates without a chat (inline queries, chosen inline results, shipping and pre-checkout
/// queries, polls, poll answers, unknown kinds) convert to `None`.
pub struct TelegramUpdateWrapper<'a>(pub &'a Update);

impl<'a> ToCoreEvent for TelegramUpdateWrapper<'a> {
    fn to_core(&self) -> Option<InboundEvent> {
        let kind = event_kind(&self.0.kind);
        match &self.0.kind {
            UpdateKind::Message(m)
            | UpdateKind::EditedMessage(m)
            | UpdateKind::ChannelPost(m)
            | UpdateKind::EditedChannelPost(m) => Some(from_message(m, kind)),
            UpdateKind::CallbackQuery(q) => Some(from_callback(q)),
            UpdateKind::ChatJoinRequest(r) => Some(InboundEvent {
                chat_id: r.from.id.0 as i64,
                sender_id: r.from.id.0 as i64,
                sender_username: r.from.username.clone(),
                message_id: NO_MESSAGE,
                text: None,
                attachment: None,
                is_callback: false,
                kind,
                received_at: r.date,
            }),
            UpdateKind::MyChatMember(u) | UpdateKind::ChatMember(u) => Some(InboundEvent {
                chat_id: u.chat.id.0,
                sender_id: u.from.id.0 as i64,
                sender_username: u.from.username.clone(),
                message_id: NO_MESSAGE,
                text: None,
                attachment: None,
                is_callback: false,
                kind,
                received_at: u.date,
            }),
            _ => None,
        }
    }
}

/// Largest photo size by file size.
fn largest_photo(photos: &[PhotoSize]) -> Option<Attachment> {
    photos.iter().max_by_key(|p| p.file.size).map(|p| Attachment {
        file_id: p.file.id.0.clone(),
        file_size: p.file.size,
    })
}

/// Web-app data wins over everything; a document message uses its caption (empty when absent).
fn message_text(msg: &Message) -> Option<String> {
    if let Some(data) = msg.web_app_data() {
        return Some(data.data.clone());
    }
    if msg.document().is_some() {
        return Some(msg.caption().unwrap_or("").to_string());
    }
    msg.text().map(|s| s.to_string())
}

fn from_message(msg: &Message, kind: EventKind) -> InboundEvent {
    let attachment = msg.photo().and_then(largest_photo).or_else(|| {
        msg.document().map(|d| Attachment {
            file_id: d.file.id.0.clone(),
            file_size: d.file.size,
        })
    });
    let (sender_id, sender_username) = match msg.from.as_ref() {
        Some(u) => (u.id.0 as i64, u.username.clone()),
        None => (msg.chat.id.0, msg.chat.username().map(|s| s.to_string())),
    };

    InboundEvent {
        chat_id: msg.chat.id.0,
        sender_id,
        sender_username,
        message_id: msg.id.0,
        text: message_text(msg),
        attachment,
        is_callback: false,
        kind,
        received_at: msg.date,
    }
}

fn from_callback(q: &CallbackQuery) -> InboundEvent {
    let sender_id = q.from.id.0 as i64;
    let (chat_id, message_id) = q
        .message
        .as_ref()
        .map(|m| (m.chat().id.0, m.id().0))
        .unwrap_or((sender_id, NO_MESSAGE));

    InboundEvent {
        chat_id,
        sender_id,
        sender_username: q.from.username.clone(),
        message_id,
        text: q.data.clone(),
        attachment: None,
        is_callback: true,
        kind: EventKind::CallbackQuery,
        received_at: Utc::now(),
    }
}
