//! Wraps teloxide::Bot and implements [`formbot_core::Bot`] and [`formbot_core::AttachmentFetcher`].
//! Production code talks to Telegram through this; tests substitute another Bot impl.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use formbot_core::{
    Attachment, AttachmentFetcher, Bot as CoreBot, ChatId, FormbotError, InlineButton, Keyboard,
    MessageId, ReplyButton, Result,
};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{
    FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, KeyboardButton, KeyboardMarkup,
    MessageId as TgMessageId, ParseMode, ReplyMarkup,
};
use tracing::debug;

fn channel_error(e: impl std::fmt::Display) -> FormbotError {
    FormbotError::Channel(e.to_string())
}

fn inline_button(button: &InlineButton) -> Result<InlineKeyboardButton> {
    match button.url.as_deref() {
        Some(url) => {
            let url = reqwest::Url::parse(url).map_err(|e| {
                FormbotError::Channel(format!("Invalid button URL {}: {}", url, e))
            })?;
            Ok(InlineKeyboardButton::url(button.text.clone(), url))
        }
        None => Ok(InlineKeyboardButton::callback(
            button.text.clone(),
            button.callback.clone(),
        )),
    }
}

fn reply_button(button: &ReplyButton) -> KeyboardButton {
    KeyboardButton::new(button.text.clone())
}

/// Lays buttons out in rows of `row_size`.
fn to_markup(keyboard: &Keyboard) -> Result<ReplyMarkup> {
    let row_size = keyboard.row_size();
    match keyboard {
        Keyboard::Inline { buttons, .. } => {
            let rows = buttons
                .chunks(row_size)
                .map(|row| row.iter().map(inline_button).collect::<Result<Vec<_>>>())
                .collect::<Result<Vec<_>>>()?;
            Ok(InlineKeyboardMarkup::new(rows).into())
        }
        Keyboard::Reply { buttons, .. } => {
            let rows: Vec<Vec<KeyboardButton>> = buttons
                .chunks(row_size)
                .map(|row| row.iter().map(reply_button).collect())
                .collect();
            Ok(KeyboardMarkup::new(rows).into())
        }
    }
}

/// Thin wrapper around teloxide::Bot. All text goes out as HTML.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Underlying teloxide::Bot for direct API use.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageId> {
        let request = self
            .bot
            .send_message(teloxide::types::ChatId(chat_id), text.to_string())
            .parse_mode(ParseMode::Html);
        let sent = match keyboard.filter(|k| !k.is_empty()) {
            Some(keyboard) => request.reply_markup(to_markup(keyboard)?).await,
            None => request.await,
        }
        .map_err(channel_error)?;
        Ok(sent.id.0)
    }

    async fn edit_message(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<()> {
        self.bot
            .edit_message_text(
                teloxide::types::ChatId(chat_id),
                TgMessageId(message_id),
                text.to_string(),
            )
            .parse_mode(ParseMode::Html)
            .await
            .map_err(channel_error)?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        self.bot
            .delete_message(teloxide::types::ChatId(chat_id), TgMessageId(message_id))
            .await
            .map_err(channel_error)?;
        Ok(())
    }

    async fn send_document(&self, chat_id: ChatId, path: &Path, caption: &str) -> Result<()> {
        self.bot
            .send_document(
                teloxide::types::ChatId(chat_id),
                InputFile::file(path.to_path_buf()),
            )
            .caption(caption.to_string())
            .await
            .map_err(channel_error)?;
        Ok(())
    }
}

#[async_trait]
impl AttachmentFetcher for TelegramBotAdapter {
    async fn fetch(&self, attachment: &Attachment, destination: &Path) -> Result<PathBuf> {
        let file = self
            .bot
            .get_file(FileId(attachment.file_id.clone()))
            .await
            .map_err(channel_error)?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut dst = tokio::fs::File::create(destination).await?;
        self.bot
            .download_file(&file.path, &mut dst)
            .await
            .map_err(channel_error)?;

        debug!(
            file_id = %attachment.file_id,
            path = %destination.display(),
            "Attachment downloaded"
        );
        Ok(destination.to_path_buf())
    }
}
