//! `/start`: the questionnaire. Consent, full name, birth date, gender, photo, confirmation;
//! then the photo is fetched, the document generated and sent back.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use dialogue::{
    Command, CommandDescriptor, DialogueContext, DialoguePlan, MessageRetention, Prompt, Step,
};
use formbot_core::{
    AttachmentFetcher, Bot, ChatId, DialogueError, DocumentGenerator, InboundEvent, InlineButton,
    Result, User,
};
use tracing::{info, instrument};

pub const CONSENT_TEXT: &str = "<b>Согласие на обработку данных:</b>\n\
Нажимая кнопку \"Согласен\" вы соглашаетесь на обработку ваших данных \
в соответствии с политикой конфиденциальности.";
pub const PRIVACY_URL: &str = "https://policies.google.com/privacy?hl=en-US";
pub const NAME_TEXT: &str = "<b>Введите ФИО:</b>";
pub const BIRTH_DATE_TEXT: &str = "<b>Укажите дату рождения в формате dd.MM.yyyy:</b>";
pub const GENDER_TEXT: &str = "<b>Выберите пол:</b>";
pub const PHOTO_TEXT: &str = "<b>Прикрепите фотографию:</b>";
pub const SUMMARY_HEADER: &str = "<b>Проверьте введенные данные:</b>";
pub const DOCUMENT_CAPTION: &str = "Ваша анкета";

const AGREE: &str = "agree";
const MALE: &str = "male";
const FEMALE: &str = "female";

// Positions in the dialogue history; 0 is the command itself.
const NAME_INDEX: usize = 2;
const BIRTH_DATE_INDEX: usize = 3;
const GENDER_INDEX: usize = 4;
const PHOTO_INDEX: usize = 5;

fn gender_label(answer: &str) -> &'static str {
    if answer == MALE {
        "Мужской"
    } else {
        "Женский"
    }
}

/// Human-readable form of a button answer.
fn answer_label(answer: &str) -> &str {
    match answer {
        AGREE => "Согласен с обработкой персональных данных",
        MALE | FEMALE => gender_label(answer),
        other => other,
    }
}

/// Every non-blank answer after the command, one per line.
pub fn summary(context: &DialogueContext) -> String {
    let lines: Vec<&str> = context
        .events()
        .iter()
        .skip(1)
        .filter_map(|e| e.text.as_deref())
        .filter(|t| !t.trim().is_empty())
        .map(answer_label)
        .collect();
    format!("{}\n{}", SUMMARY_HEADER, lines.join("\n"))
}

fn steps() -> Vec<Step> {
    vec![
        Step::fixed(
            Prompt::new(CONSENT_TEXT)
                .inline_buttons(vec![
                    InlineButton::callback("Согласен", AGREE),
                    InlineButton::link("Подробнее", PRIVACY_URL),
                ])
                .row_size(2)
                .pattern(".*agree")
                .error_text("Для продолжения вы должны нажать кнопку \"Согласиться\""),
        ),
        Step::fixed(
            Prompt::new(NAME_TEXT)
                .pattern("[А-Яа-я]+ [А-Яа-я]+( [А-Яа-я]+)?")
                .error_text("Неверный формат ФИО: Фамилия и Имя должны быть заполнены обязательно"),
        ),
        Step::fixed(
            Prompt::new(BIRTH_DATE_TEXT)
                .pattern(r"\d{2}\.\d{2}\.\d{4}")
                .error_text("Неверный формат даты"),
        ),
        Step::fixed(
            Prompt::new(GENDER_TEXT)
                .inline_buttons(vec![
                    InlineButton::callback("Мужской", MALE),
                    InlineButton::callback("Женский", FEMALE),
                ])
                .row_size(2)
                .pattern(".*male|female")
                .error_text("Выберите один из вариантов"),
        ),
        Step::fixed(Prompt::new(PHOTO_TEXT).require_attachment()),
        Step::new(|_, _, context| {
            Ok(Prompt::new(summary(context))
                .inline_buttons(vec![
                    InlineButton::callback("Все верно", "all_ok"),
                    InlineButton::callback("Отмена", "cancel"),
                ])
                .row_size(2))
        }),
    ]
}

fn required_answer<'a>(context: &'a DialogueContext, index: usize, name: &str) -> Result<&'a str> {
    context
        .answer(index)
        .ok_or_else(|| DialogueError::MissingAnswer(name.to_string()).into())
}

pub struct StartCommand {
    descriptor: CommandDescriptor,
    fetcher: Arc<dyn AttachmentFetcher>,
    documents: Arc<dyn DocumentGenerator>,
    download_dir: PathBuf,
}

impl StartCommand {
    pub fn new(
        fetcher: Arc<dyn AttachmentFetcher>,
        documents: Arc<dyn DocumentGenerator>,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            descriptor: CommandDescriptor::system(&["/start"], "запустить бота"),
            fetcher,
            documents,
            download_dir: download_dir.into(),
        }
    }
}

#[async_trait]
impl Command for StartCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn plan(&self, _chat_id: ChatId) -> DialoguePlan {
        DialoguePlan::StepDriven {
            steps: steps(),
            retention: MessageRetention {
                user_messages: false,
                ..MessageRetention::default()
            },
        }
    }

    #[instrument(skip(self, bot, _event, context, user), fields(chat_id = context.chat_id()))]
    async fn execute(
        &self,
        bot: &dyn Bot,
        _event: &InboundEvent,
        context: &DialogueContext,
        user: &User,
    ) -> Result<()> {
        let full_name = required_answer(context, NAME_INDEX, "full name")?;
        let birth_date = required_answer(context, BIRTH_DATE_INDEX, "birth date")?;
        let gender = gender_label(required_answer(context, GENDER_INDEX, "gender")?);
        let photo = context
            .event(PHOTO_INDEX)
            .and_then(|e| e.attachment.as_ref())
            .ok_or_else(|| DialogueError::MissingAnswer("photo".to_string()))?;

        let destination = self.download_dir.join(format!("{}.jpg", photo.file_id));
        let local = self.fetcher.fetch(photo, &destination).await?;

        let answers = [
            full_name.to_string(),
            birth_date.to_string(),
            gender.to_string(),
        ];
        let document = self.documents.generate(user, &answers, &local).await?;

        bot.send_document(context.chat_id(), &document, DOCUMENT_CAPTION)
            .await?;
        info!(user_id = user.id, document = %document.display(), "Questionnaire sent");
        Ok(())
    }
}
