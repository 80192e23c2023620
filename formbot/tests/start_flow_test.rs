//! End-to-end `/start` questionnaire through the full handler chain with SQLite-backed users.

mod common;

use std::path::PathBuf;
use std::sync::Arc;

use common::fake_fetcher::FakeFetcher;
use common::recording_bot::{Outbound, RecordingBot};
use dialogue::DialogueRegistry;
use formbot::{build_commands, build_document_generator, build_handler_chain, BaseConfig};
use formbot_core::{Attachment, InboundEvent, UserStore};
use handler_chain::HandlerChain;
use storage::UserRepository;
use tempfile::TempDir;

const CHAT: i64 = 4242;

struct Harness {
    _dir: TempDir,
    config: BaseConfig,
    bot: Arc<RecordingBot>,
    fetcher: Arc<FakeFetcher>,
    users: Arc<UserRepository>,
    registry: Arc<DialogueRegistry>,
    chain: HandlerChain,
}

impl Harness {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = BaseConfig {
            bot_token: "test_token".to_string(),
            telegram_api_url: None,
            log_file: dir.path().join("formbot.log").display().to_string(),
            database_url: dir.path().join("users.db").display().to_string(),
            router_lanes: 2,
            download_dir: dir.path().join("downloads"),
            document_dir: dir.path().join("documents"),
        };

        let bot = RecordingBot::new();
        let fetcher = Arc::new(FakeFetcher::new());
        let users = Arc::new(UserRepository::new(&config.database_url).await.unwrap());
        let registry = Arc::new(DialogueRegistry::new());
        let commands = build_commands(&config, fetcher.clone(), build_document_generator(&config));
        let chain = build_handler_chain(bot.clone(), users.clone(), registry.clone(), commands);

        Self {
            _dir: dir,
            config,
            bot,
            fetcher,
            users,
            registry,
            chain,
        }
    }

    async fn send(&self, event: InboundEvent) {
        self.chain.handle(&event).await.unwrap();
    }

    async fn text(&self, message_id: i32, text: &str) {
        self.send(InboundEvent::text(CHAT, message_id, text)).await;
    }

    /// Presses a button on the newest keyboard message.
    async fn press(&self, data: &str) {
        let message_id = self.bot.last_keyboard_message().unwrap();
        self.send(InboundEvent::callback(CHAT, message_id, data)).await;
    }

    async fn photo(&self, message_id: i32, file_id: &str) {
        let attachment = Attachment {
            file_id: file_id.to_string(),
            file_size: 2048,
        };
        self.send(InboundEvent::with_attachment(CHAT, message_id, attachment, None))
            .await;
    }

    /// Runs the questionnaire up to the photo prompt.
    async fn answer_until_photo(&self) {
        self.text(1, "/start").await;
        self.press("agree").await;
        self.text(2, "Иванов Иван").await;
        self.text(3, "01.01.2000").await;
        self.press("male").await;
    }
}

/// **Test: Completing the questionnaire fetches the photo and sends the generated document.**
///
/// **Expected:** one document with caption "Ваша анкета" at `<document_dir>/<userId>-анкета.txt`
/// holding the answers; the photo was fetched into the download dir; no dialogue stays active.
#[tokio::test]
async fn test_questionnaire_completes_with_document() {
    let h = Harness::new().await;

    h.answer_until_photo().await;
    h.photo(4, "photo-1").await;

    let summary = h.bot.last_shown_text().unwrap();
    assert!(summary.starts_with("<b>Проверьте введенные данные:</b>"));
    assert!(summary.contains("Согласен с обработкой персональных данных"));
    assert!(summary.contains("Иванов Иван"));
    assert!(summary.contains("01.01.2000"));
    assert!(summary.contains("Мужской"));

    h.press("all_ok").await;

    assert!(!h.registry.has_active(CHAT));
    assert_eq!(
        h.fetcher.fetched(),
        vec![(
            "photo-1".to_string(),
            h.config.download_dir.join("photo-1.jpg")
        )]
    );

    let user = h.users.find_by_chat_id(CHAT).await.unwrap().unwrap();
    let expected: PathBuf = h.config.document_dir.join(format!("{}-анкета.txt", user.id));
    assert_eq!(
        h.bot.documents(),
        vec![(expected.clone(), "Ваша анкета".to_string())]
    );

    let document = tokio::fs::read_to_string(&expected).await.unwrap();
    assert!(document.contains("ФИО: Иванов Иван"));
    assert!(document.contains("Дата рождения: 01.01.2000"));
    assert!(document.contains("Пол: Мужской"));
}

/// **Test: User messages are not kept; only the newest prompt survives until the end.**
#[tokio::test]
async fn test_questionnaire_cleans_up_messages() {
    let h = Harness::new().await;

    h.answer_until_photo().await;
    h.photo(4, "photo-1").await;
    h.press("all_ok").await;

    let deleted: Vec<i32> = h
        .bot
        .outbound()
        .into_iter()
        .filter_map(|o| match o {
            Outbound::Delete(id) => Some(id),
            _ => None,
        })
        .collect();
    for user_message in [1, 2, 3, 4] {
        assert!(deleted.contains(&user_message), "user message {}", user_message);
    }
    for prompt in [100, 101, 102] {
        assert!(deleted.contains(&prompt), "prompt {}", prompt);
    }
}

/// **Test: A malformed birth date re-shows the date prompt with its error; a valid one proceeds.**
#[tokio::test]
async fn test_bad_birth_date_reprompts() {
    let h = Harness::new().await;

    h.text(1, "/start").await;
    h.press("agree").await;
    h.text(2, "Иванов Иван").await;
    h.text(3, "1 января 2000").await;

    let shown = h.bot.last_shown_text().unwrap();
    assert!(shown.starts_with("<b>Укажите дату рождения в формате dd.MM.yyyy:</b>"));
    assert!(shown.contains("Неверный формат даты"));
    assert!(h.registry.has_active(CHAT));

    h.text(4, "01.01.2000").await;
    assert_eq!(h.bot.last_shown_text().as_deref(), Some("<b>Выберите пол:</b>"));
}

/// **Test: Text sent where a photo is required is rejected with the attachment notice.**
#[tokio::test]
async fn test_photo_step_requires_attachment() {
    let h = Harness::new().await;

    h.answer_until_photo().await;
    h.text(4, "вот фото").await;

    let shown = h.bot.last_shown_text().unwrap();
    assert!(shown.starts_with("<b>Прикрепите фотографию:</b>"));
    assert!(shown.contains("Необходимо прикрепить фото"));
    assert!(h.fetcher.fetched().is_empty());
}

/// **Test: Pressing "Отмена" on the summary closes the dialogue without a document.**
#[tokio::test]
async fn test_cancel_on_summary_exits() {
    let h = Harness::new().await;

    h.answer_until_photo().await;
    h.photo(4, "photo-1").await;
    h.press("cancel").await;

    assert!(!h.registry.has_active(CHAT));
    assert!(h.bot.documents().is_empty());
    assert_eq!(h.bot.last_shown_text().as_deref(), Some("<b>Закрыто</b>"));
}

/// **Test: An unknown command gets the help listing with /start.**
#[tokio::test]
async fn test_unknown_text_lists_commands() {
    let h = Harness::new().await;

    h.text(1, "hello").await;

    let help = h.bot.last_shown_text().unwrap();
    assert!(help.starts_with("Кажется, вы ошиблись командой. Список всех команд:"));
    assert!(help.contains("/start - запустить бота"));
    assert!(!h.registry.has_active(CHAT));
}

/// **Test: First contact creates the user with the utm tag from the start payload.**
#[tokio::test]
async fn test_first_contact_stores_utm() {
    let h = Harness::new().await;

    h.text(1, "/start promo").await;

    let user = h.users.find_by_chat_id(CHAT).await.unwrap().unwrap();
    assert_eq!(user.utm.as_deref(), Some("promo"));
}
