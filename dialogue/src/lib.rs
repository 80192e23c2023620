//! # dialogue
//!
//! Step-driven dialogues and the handler that drives them.
//!
//! - [`Prompt`], [`Step`]: what a step shows and how its answer is validated.
//! - [`Dialogue`]: resumable state machine over a queue of steps ([`Dialogue::advance`]).
//! - [`DialogueRegistry`]: per-chat stack of active dialogues.
//! - [`Command`], [`CommandTable`]: command descriptors, dialogue plans and terminal actions.
//! - [`ConversationHandler`]: the chain handler tying them together.

pub mod command;
pub mod context;
pub mod conversation;
pub mod dialogue;
pub mod prompt;
pub mod registry;
pub mod step;
pub mod validation;

pub use command::{Command, CommandDescriptor, CommandTable, DialoguePlan, MessageRetention};
pub use context::DialogueContext;
pub use conversation::ConversationHandler;
pub use dialogue::{is_exit, Dialogue, DialogueState, StepMachine};
pub use prompt::Prompt;
pub use registry::{DialogueRegistry, SharedDialogue};
pub use step::Step;
pub use validation::{ValidationFailure, ValidationState};
