//! Conversation handler: user resolution, lock and role checks, dialogue resumption and command start.

use std::sync::Arc;

use async_trait::async_trait;
use formbot_core::{
    Bot, ChatId, Handler, HandlerResponse, InboundEvent, Result, User, UserStore,
};
use tracing::{error, info, instrument, warn};

use crate::command::CommandTable;
use crate::dialogue::{Dialogue, DialogueState};
use crate::registry::{DialogueRegistry, SharedDialogue};

pub const LOCKED_TEXT: &str = "Ваш аккаунт заблокирован. Обратитесь к администратору.";
pub const HELP_HEADER: &str = "Кажется, вы ошиблись командой. Список всех команд:";
pub const NO_COMMANDS_TEXT: &str = "Команды не найдены.";
pub const PERMISSION_DENIED_TEXT: &str = "У вас недостаточно прав для выполнения этой команды.";
pub const EXECUTION_FAILED_TEXT: &str = "Произошла ошибка при выполнении команды.";

/// Text after the first space, e.g. `/start promo` → `promo`.
pub fn utm_tag(text: &str) -> Option<String> {
    text.split_once(' ')
        .map(|(_, rest)| rest.to_string())
        .filter(|s| !s.is_empty())
}

/// Final handler of the chain. Consumes every event it sees.
pub struct ConversationHandler {
    bot: Arc<dyn Bot>,
    users: Arc<dyn UserStore>,
    registry: Arc<DialogueRegistry>,
    commands: CommandTable,
}

impl ConversationHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        users: Arc<dyn UserStore>,
        registry: Arc<DialogueRegistry>,
        commands: CommandTable,
    ) -> Self {
        Self {
            bot,
            users,
            registry,
            commands,
        }
    }

    pub fn registry(&self) -> &Arc<DialogueRegistry> {
        &self.registry
    }

    async fn resolve_user(&self, event: &InboundEvent) -> Result<User> {
        if let Some(user) = self.users.find_by_chat_id(event.chat_id).await? {
            return Ok(user);
        }
        let user = User::new(
            event.chat_id,
            event.sender_username.clone(),
            utm_tag(event.text_or_empty()),
        );
        let saved = self.users.save(&user).await?;
        info!(chat_id = event.chat_id, user_id = saved.id, utm = ?saved.utm, "New user created");
        Ok(saved)
    }

    async fn notify(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.bot.send_message(chat_id, text, None).await {
            warn!(chat_id = chat_id, error = %e, "Failed to send notice");
        }
    }

    /// Advances `dialogue` once; unregisters it when it finishes or fails.
    async fn drive(&self, dialogue: SharedDialogue, event: &InboundEvent, user: &User) {
        let mut dialogue = dialogue.lock().await;
        let dialogue_id = dialogue.id();
        let result = dialogue.advance(self.bot.as_ref(), event, user).await;

        if !matches!(result, Ok(DialogueState::AwaitingStep)) {
            self.registry.remove(event.chat_id, dialogue_id);
        }

        match result {
            Ok(state) => {
                info!(chat_id = event.chat_id, dialogue_id = dialogue_id, state = ?state, "Dialogue advanced");
            }
            Err(e) => {
                error!(chat_id = event.chat_id, dialogue_id = dialogue_id, error = %e, "Dialogue execution failed");
                self.notify(event.chat_id, EXECUTION_FAILED_TEXT).await;
            }
        }
    }

    fn help_text(&self, user: &User) -> String {
        match self.commands.help_for(user.role) {
            Some(lines) => format!("{}\n{}", HELP_HEADER, lines),
            None => NO_COMMANDS_TEXT.to_string(),
        }
    }
}

#[async_trait]
impl Handler for ConversationHandler {
    #[instrument(skip(self, event), fields(chat_id = event.chat_id))]
    async fn handle(&self, event: &InboundEvent) -> Result<HandlerResponse> {
        let chat_id = event.chat_id;
        let user = self.resolve_user(event).await?;

        if user.locked {
            info!(chat_id = chat_id, user_id = user.id, "Locked user, ignoring");
            self.notify(chat_id, LOCKED_TEXT).await;
            return Ok(HandlerResponse::Stop);
        }

        if let Some(active) = self.registry.peek(chat_id) {
            self.drive(active, event, &user).await;
            return Ok(HandlerResponse::Stop);
        }

        let text = event.text_or_empty();
        let Some(command) = self.commands.find(text) else {
            info!(chat_id = chat_id, text = %text, "No command matched, sending help");
            self.notify(chat_id, &self.help_text(&user)).await;
            return Ok(HandlerResponse::Stop);
        };

        let descriptor = command.descriptor();
        if !descriptor.allows(user.role) {
            info!(
                chat_id = chat_id,
                user_role = user.role.level(),
                required_role = descriptor.required_role().level(),
                "Permission denied"
            );
            self.notify(chat_id, PERMISSION_DENIED_TEXT).await;
            return Ok(HandlerResponse::Stop);
        }

        let dialogue = match Dialogue::for_command(command.clone(), chat_id) {
            Ok(d) => d,
            Err(e) => {
                error!(chat_id = chat_id, error = %e, "Failed to start dialogue");
                self.notify(chat_id, EXECUTION_FAILED_TEXT).await;
                return Ok(HandlerResponse::Stop);
            }
        };
        info!(chat_id = chat_id, dialogue_id = dialogue.id(), command = %text, "Starting dialogue");

        if dialogue.is_step_driven() {
            let shared = self.registry.push(dialogue);
            self.drive(shared, event, &user).await;
        } else {
            let shared = Arc::new(tokio::sync::Mutex::new(dialogue));
            self.drive(shared, event, &user).await;
        }

        Ok(HandlerResponse::Stop)
    }
}
