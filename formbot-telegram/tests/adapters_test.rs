//! Classification of raw Telegram updates into core events, and their submission to the router.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dispatch::Router;
use formbot_core::{EventKind, Handler, HandlerResponse, InboundEvent, Result, ToCoreEvent};
use formbot_telegram::{event_kind, submit_update, TelegramUpdateWrapper};
use handler_chain::HandlerChain;
use serde_json::{json, Value};
use teloxide::types::Update;

fn sender() -> Value {
    json!({
        "id": 4242,
        "is_bot": false,
        "first_name": "Test",
        "username": "tester",
    })
}

fn private_chat() -> Value {
    json!({
        "id": 4242i64,
        "type": "private",
        "first_name": "Test",
    })
}

/// Base message body; `extra` fields are merged in.
fn message(extra: Value) -> Value {
    let mut body = json!({
        "message_id": 7,
        "date": 1700000000i64,
        "chat": private_chat(),
        "from": sender(),
    });
    if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            body.insert(k.clone(), v.clone());
        }
    }
    body
}

fn update(field: &str, payload: Value) -> Update {
    let json = json!({ "update_id": 1, field: payload });
    serde_json::from_str(&json.to_string()).expect("failed to deserialize mock update")
}

fn classify(update: &Update) -> Option<InboundEvent> {
    TelegramUpdateWrapper(update).to_core()
}

/// **Test: Plain text message keeps chat, sender, message id and text.**
#[test]
fn test_text_message() {
    let upd = update("message", message(json!({ "text": "/start promo" })));
    let event = classify(&upd).unwrap();

    assert_eq!(event.chat_id, 4242);
    assert_eq!(event.sender_id, 4242);
    assert_eq!(event.sender_username.as_deref(), Some("tester"));
    assert_eq!(event.message_id, 7);
    assert_eq!(event.text.as_deref(), Some("/start promo"));
    assert!(!event.is_callback);
    assert!(event.attachment.is_none());
    assert_eq!(event.kind, EventKind::Message);
}

/// **Test: Callback query takes chat and message id from the message the button belongs to.**
#[test]
fn test_callback_query() {
    let upd = update(
        "callback_query",
        json!({
            "id": "q1",
            "from": sender(),
            "chat_instance": "ci",
            "data": "male",
            "message": message(json!({ "message_id": 55, "text": "Gender?" })),
        }),
    );
    let event = classify(&upd).unwrap();

    assert_eq!(event.chat_id, 4242);
    assert_eq!(event.message_id, 55);
    assert_eq!(event.text.as_deref(), Some("male"));
    assert!(event.is_callback);
    assert_eq!(event.kind, EventKind::CallbackQuery);
}

/// **Test: Photo message carries the largest size as attachment; its caption is not used as text.**
#[test]
fn test_photo_uses_largest_size() {
    let upd = update(
        "message",
        message(json!({
            "photo": [
                { "file_id": "small", "file_unique_id": "s", "width": 90, "height": 90, "file_size": 100 },
                { "file_id": "big", "file_unique_id": "b", "width": 800, "height": 800, "file_size": 5000 },
                { "file_id": "medium", "file_unique_id": "m", "width": 320, "height": 320, "file_size": 900 },
            ],
            "caption": "me",
        })),
    );
    let event = classify(&upd).unwrap();

    let attachment = event.attachment.unwrap();
    assert_eq!(attachment.file_id, "big");
    assert_eq!(attachment.file_size, 5000);
    assert!(event.text.is_none());
}

/// **Test: Document message uses its caption as text, empty when absent.**
#[test]
fn test_document_caption() {
    let with_caption = update(
        "message",
        message(json!({
            "document": { "file_id": "doc1", "file_unique_id": "d1", "file_size": 10 },
            "caption": "passport",
        })),
    );
    let event = classify(&with_caption).unwrap();
    assert_eq!(event.text.as_deref(), Some("passport"));
    assert_eq!(event.attachment.unwrap().file_id, "doc1");

    let without_caption = update(
        "message",
        message(json!({
            "document": { "file_id": "doc2", "file_unique_id": "d2", "file_size": 10 },
        })),
    );
    assert_eq!(classify(&without_caption).unwrap().text.as_deref(), Some(""));
}

/// **Test: Web-app data becomes the event text.**
#[test]
fn test_web_app_data() {
    let upd = update(
        "message",
        message(json!({
            "web_app_data": { "data": "{\"size\":42}", "button_text": "Open" },
        })),
    );
    let event = classify(&upd).unwrap();
    assert_eq!(event.text.as_deref(), Some("{\"size\":42}"));
}

/// **Test: Edited message is classified with its own kind but the same chat.**
#[test]
fn test_edited_message_kind() {
    let upd = update(
        "edited_message",
        message(json!({ "text": "fixed", "edit_date": 1700000100i64 })),
    );
    assert_eq!(event_kind(&upd.kind), EventKind::EditedMessage);

    let event = classify(&upd).unwrap();
    assert_eq!(event.kind, EventKind::EditedMessage);
    assert_eq!(event.chat_id, 4242);
    assert_eq!(event.text.as_deref(), Some("fixed"));
}

/// **Test: Inline query belongs to no chat and is not classified.**
#[test]
fn test_inline_query_has_no_chat() {
    let upd = update(
        "inline_query",
        json!({ "id": "iq", "from": sender(), "query": "abc", "offset": "" }),
    );
    assert_eq!(event_kind(&upd.kind), EventKind::InlineQuery);
    assert!(classify(&upd).is_none());
}

struct Recorder {
    seen: Arc<Mutex<Vec<InboundEvent>>>,
}

#[async_trait]
impl Handler for Recorder {
    async fn handle(&self, event: &InboundEvent) -> Result<HandlerResponse> {
        self.seen.lock().unwrap().push(event.clone());
        Ok(HandlerResponse::Stop)
    }
}

/// **Test: Chat updates reach the chain through the router; chat-less updates are dropped.**
#[tokio::test]
async fn test_submit_update_routes_to_chain() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new().add_handler(Arc::new(Recorder { seen: seen.clone() }));
    let router = Router::new(2).unwrap();

    let text = update("message", message(json!({ "text": "hello" })));
    let inline = update(
        "inline_query",
        json!({ "id": "iq", "from": sender(), "query": "abc", "offset": "" }),
    );

    assert_eq!(submit_update(&router, &chain, &text), Ok(true));
    assert_eq!(submit_update(&router, &chain, &inline), Ok(false));

    router.shutdown();
    router.join().await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].text.as_deref(), Some("hello"));
}
