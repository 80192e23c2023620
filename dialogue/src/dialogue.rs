//! Dialogue instance: the resumable step state machine.
//!
//! A dialogue is either pass-through (terminal action runs on the first event) or step-driven.
//! A step-driven dialogue validates every answer against the rules of the last accepted prompt,
//! re-prompts on failure, and keeps the chat tidy by editing or replacing its own messages.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use formbot_core::{Bot, ChatId, InboundEvent, MessageId, Result, User};
use tracing::{debug, error, info, warn};

use crate::command::{Command, DialoguePlan, MessageRetention};
use crate::context::DialogueContext;
use crate::prompt::Prompt;
use crate::step::Step;
use crate::validation::ValidationState;

/// Exact exit keyword, compared case-insensitively.
pub const EXIT_KEYWORD: &str = "Отмена";
/// Any text containing this also exits.
pub const EXIT_MARKER: &str = "cancel";
pub const CLOSED_NOTICE: &str = "<b>Закрыто</b>";

static NEXT_DIALOGUE_ID: AtomicU64 = AtomicU64::new(0);

/// Outcome of [`Dialogue::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    /// A prompt is outstanding; the dialogue stays registered.
    AwaitingStep,
    /// Steps exhausted and the terminal action ran.
    Complete,
    /// The user exited.
    Exited,
}

/// True when `text` is the exit keyword (any case) or contains the exit marker.
pub fn is_exit(text: &str) -> bool {
    text.to_lowercase() == EXIT_KEYWORD.to_lowercase() || text.contains(EXIT_MARKER)
}

/// Queue and bookkeeping of a step-driven dialogue.
#[derive(Debug)]
pub struct StepMachine {
    steps: VecDeque<Step>,
    last_step: Option<Step>,
    validation: ValidationState,
    bot_messages: VecDeque<MessageId>,
    user_messages: VecDeque<MessageId>,
    retention: MessageRetention,
}

impl StepMachine {
    pub fn new(steps: Vec<Step>, retention: MessageRetention) -> Result<Self> {
        Ok(Self {
            steps: steps.into(),
            last_step: None,
            validation: ValidationState::initial()?,
            bot_messages: VecDeque::new(),
            user_messages: VecDeque::new(),
            retention,
        })
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn bot_messages(&self) -> impl Iterator<Item = MessageId> + '_ {
        self.bot_messages.iter().copied()
    }

    pub fn user_messages(&self) -> impl Iterator<Item = MessageId> + '_ {
        self.user_messages.iter().copied()
    }

    /// Shows `prompt`: edits the latest bot message when possible, otherwise sends a new one.
    async fn render(&mut self, bot: &dyn Bot, chat_id: ChatId, prompt: &Prompt) {
        let keyboard = prompt.keyboard();

        if let (Some(&latest), None) = (self.bot_messages.back(), keyboard.as_ref()) {
            match bot.edit_message(chat_id, latest, prompt.text()).await {
                Ok(()) => {
                    self.delete_user_messages(bot, chat_id).await;
                    return;
                }
                Err(e) => {
                    info!(chat_id = chat_id, message_id = latest, error = %e, "Edit failed, sending new message");
                }
            }
        }

        match bot
            .send_message(chat_id, prompt.text(), keyboard.as_ref())
            .await
        {
            Ok(message_id) => {
                self.bot_messages.push_back(message_id);
                self.trim_bot_messages(bot, chat_id).await;
                self.delete_user_messages(bot, chat_id).await;
            }
            Err(e) => {
                error!(chat_id = chat_id, error = %e, "Failed to send prompt");
            }
        }
    }

    /// Deletes all but the newest bot message unless bot messages are retained.
    async fn trim_bot_messages(&mut self, bot: &dyn Bot, chat_id: ChatId) {
        if self.retention.bot_messages {
            return;
        }
        while self.bot_messages.len() > 1 {
            if let Some(id) = self.bot_messages.pop_front() {
                delete_quietly(bot, chat_id, id).await;
            }
        }
    }

    async fn delete_bot_messages(&mut self, bot: &dyn Bot, chat_id: ChatId) {
        if self.retention.bot_messages {
            return;
        }
        while let Some(id) = self.bot_messages.pop_front() {
            delete_quietly(bot, chat_id, id).await;
        }
    }

    async fn delete_user_messages(&mut self, bot: &dyn Bot, chat_id: ChatId) {
        if self.retention.user_messages {
            return;
        }
        while let Some(id) = self.user_messages.pop_front() {
            delete_quietly(bot, chat_id, id).await;
        }
    }

    async fn destroy(&mut self, bot: &dyn Bot, chat_id: ChatId) {
        self.delete_bot_messages(bot, chat_id).await;
        self.delete_user_messages(bot, chat_id).await;
    }
}

async fn delete_quietly(bot: &dyn Bot, chat_id: ChatId, message_id: MessageId) {
    match bot.delete_message(chat_id, message_id).await {
        Ok(()) => debug!(chat_id = chat_id, message_id = message_id, "Deleted message"),
        Err(e) => {
            warn!(chat_id = chat_id, message_id = message_id, error = %e, "Failed to delete message")
        }
    }
}

#[derive(Debug)]
enum DialogueKind {
    PassThrough,
    StepDriven(StepMachine),
}

/// One running dialogue of one chat.
pub struct Dialogue {
    id: u64,
    context: DialogueContext,
    command: Arc<dyn Command>,
    kind: DialogueKind,
    state: DialogueState,
}

impl Dialogue {
    /// Instantiates the dialogue `command` plans for `chat_id`.
    pub fn for_command(command: Arc<dyn Command>, chat_id: ChatId) -> Result<Self> {
        let kind = match command.plan(chat_id) {
            DialoguePlan::PassThrough => DialogueKind::PassThrough,
            DialoguePlan::StepDriven { steps, retention } => {
                DialogueKind::StepDriven(StepMachine::new(steps, retention)?)
            }
        };
        Ok(Self {
            id: NEXT_DIALOGUE_ID.fetch_add(1, Ordering::Relaxed),
            context: DialogueContext::new(chat_id),
            command,
            kind,
            state: DialogueState::AwaitingStep,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn chat_id(&self) -> ChatId {
        self.context.chat_id()
    }

    pub fn context(&self) -> &DialogueContext {
        &self.context
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn is_step_driven(&self) -> bool {
        matches!(self.kind, DialogueKind::StepDriven(_))
    }

    pub fn machine(&self) -> Option<&StepMachine> {
        match &self.kind {
            DialogueKind::StepDriven(machine) => Some(machine),
            DialogueKind::PassThrough => None,
        }
    }

    /// Feeds one event into the dialogue.
    ///
    /// A finished dialogue ignores further events. On error the dialogue has already cleaned up
    /// and is finished.
    pub async fn advance(
        &mut self,
        bot: &dyn Bot,
        event: &InboundEvent,
        user: &User,
    ) -> Result<DialogueState> {
        if self.state != DialogueState::AwaitingStep {
            debug!(dialogue_id = self.id, state = ?self.state, "Dialogue already finished");
            return Ok(self.state);
        }

        self.context.record(event.clone());

        let result = match &mut self.kind {
            DialogueKind::PassThrough => {
                self.state = DialogueState::Complete;
                self.command
                    .execute(bot, event, &self.context, user)
                    .await
                    .map(|_| DialogueState::Complete)
            }
            DialogueKind::StepDriven(machine) => {
                let outcome = step(
                    machine,
                    &mut self.context,
                    self.command.as_ref(),
                    bot,
                    event,
                    user,
                )
                .await;
                if outcome.is_err() {
                    machine.destroy(bot, self.context.chat_id()).await;
                }
                outcome
            }
        };

        self.state = match &result {
            Ok(state) => *state,
            Err(_) => DialogueState::Exited,
        };
        result
    }
}

async fn step(
    machine: &mut StepMachine,
    context: &mut DialogueContext,
    command: &dyn Command,
    bot: &dyn Bot,
    event: &InboundEvent,
    user: &User,
) -> Result<DialogueState> {
    let chat_id = context.chat_id();

    if !event.is_callback {
        machine.user_messages.push_back(event.message_id);
    }

    if event.text.as_deref().is_some_and(is_exit) {
        info!(chat_id = chat_id, "User exited dialogue");
        machine.destroy(bot, chat_id).await;
        if let Err(e) = bot.send_message(chat_id, CLOSED_NOTICE, None).await {
            warn!(chat_id = chat_id, error = %e, "Failed to send closing notice");
        }
        return Ok(DialogueState::Exited);
    }

    let Some(front) = machine.steps.front().cloned() else {
        machine.destroy(bot, chat_id).await;
        command.execute(bot, event, context, user).await?;
        return Ok(DialogueState::Complete);
    };

    let candidate = front.render(event, user, context)?;

    match machine.validation.check(event) {
        Err(failure) => {
            info!(
                chat_id = chat_id,
                expected = machine.validation.pattern(),
                received = ?event.text,
                reason = failure.message(),
                "Validation failed"
            );
            context.discard_last();
            let mut prompt = match &machine.last_step {
                Some(last) => last.render(event, user, context)?,
                None => candidate,
            };
            prompt.append_error(failure.message());
            machine.render(bot, chat_id, &prompt).await;
        }
        Ok(()) => {
            machine.validation = ValidationState::from_prompt(&candidate)?;
            debug!(
                chat_id = chat_id,
                pattern = machine.validation.pattern(),
                requires_attachment = machine.validation.requires_attachment(),
                "Validation passed, carried state replaced"
            );
            if candidate.can_advance() {
                machine.steps.pop_front();
            }
            machine.last_step = Some(front);
            machine.render(bot, chat_id, &candidate).await;
        }
    }

    Ok(DialogueState::AwaitingStep)
}
