//! Commands: descriptor, dialogue plan and terminal action; and the table they are looked up in.

use std::sync::Arc;

use async_trait::async_trait;
use formbot_core::{Bot, ChatId, InboundEvent, Result, Role, User};

use crate::context::DialogueContext;
use crate::step::Step;

/// Help text used when a command does not provide one.
pub const DEFAULT_HELP: &str = "[x]";

/// Trigger tokens, help line and minimum role of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    usage: Vec<String>,
    help: String,
    required_role: Role,
}

impl CommandDescriptor {
    pub fn new(usage: &[&str], help: &str, required_role: Role) -> Self {
        let help = if help.is_empty() { DEFAULT_HELP } else { help };
        Self {
            usage: usage.iter().map(|s| s.to_string()).collect(),
            help: help.to_string(),
            required_role,
        }
    }

    /// Admin-only command ([`Role::MAX`]); the default for regular commands.
    pub fn admin(usage: &[&str], help: &str) -> Self {
        Self::new(usage, help, Role::MAX)
    }

    /// System command, available to everyone ([`Role::MIN`]).
    pub fn system(usage: &[&str], help: &str) -> Self {
        Self::new(usage, help, Role::MIN)
    }

    pub fn usage(&self) -> &[String] {
        &self.usage
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn required_role(&self) -> Role {
        self.required_role
    }

    /// Exact equality against any trigger token.
    pub fn matches(&self, text: &str) -> bool {
        self.usage.iter().any(|u| u == text)
    }

    pub fn allows(&self, role: Role) -> bool {
        self.required_role <= role
    }

    /// `"tokens - help"` line for the help listing.
    pub fn help_line(&self) -> String {
        format!("{} - {}", self.usage.join(", "), self.help)
    }
}

/// Which message ids a step-driven dialogue keeps when it cleans up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRetention {
    pub bot_messages: bool,
    pub user_messages: bool,
}

impl Default for MessageRetention {
    fn default() -> Self {
        Self {
            bot_messages: false,
            user_messages: true,
        }
    }
}

/// Shape of the dialogue a command starts.
#[derive(Debug, Clone)]
pub enum DialoguePlan {
    /// Zero steps; the terminal action runs on the first event.
    PassThrough,
    StepDriven {
        steps: Vec<Step>,
        retention: MessageRetention,
    },
}

/// A command the conversation handler can start.
#[async_trait]
pub trait Command: Send + Sync {
    fn descriptor(&self) -> &CommandDescriptor;

    /// Dialogue factory. Default: pass-through.
    fn plan(&self, _chat_id: ChatId) -> DialoguePlan {
        DialoguePlan::PassThrough
    }

    /// Terminal action, run once when the dialogue completes with its full context.
    async fn execute(
        &self,
        bot: &dyn Bot,
        event: &InboundEvent,
        context: &DialogueContext,
        user: &User,
    ) -> Result<()>;
}

/// Ordered list of commands; lookup is first match in insertion order.
#[derive(Clone, Default)]
pub struct CommandTable {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn add(mut self, command: Arc<dyn Command>) -> Self {
        self.commands.push(command);
        self
    }

    pub fn find(&self, text: &str) -> Option<Arc<dyn Command>> {
        self.commands
            .iter()
            .find(|c| c.descriptor().matches(text))
            .cloned()
    }

    pub fn visible_for(&self, role: Role) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.commands
            .iter()
            .filter(move |c| c.descriptor().allows(role))
    }

    /// Help lines of the commands visible at `role`, one per line; `None` when nothing is visible.
    pub fn help_for(&self, role: Role) -> Option<String> {
        let lines: Vec<String> = self
            .visible_for(role)
            .map(|c| c.descriptor().help_line())
            .collect();
        (!lines.is_empty()).then(|| lines.join("\n"))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
