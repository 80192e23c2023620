//! # formbot-core
//!
//! Core types and traits for the form bot: [`InboundEvent`], the outbound [`Bot`] channel,
//! [`Handler`], [`User`] and [`UserStore`], document collaborators, errors and tracing
//! initialization. Transport-agnostic; used by every other crate in the workspace.

pub mod bot;
pub mod document;
pub mod error;
pub mod logger;
pub mod store;
pub mod types;

pub use bot::Bot;
pub use document::{AttachmentFetcher, DocumentGenerator};
pub use error::{DialogueError, FormbotError, Result};
pub use logger::init_tracing;
pub use store::UserStore;
pub use types::{
    Attachment, ChatId, EventKind, Handler, HandlerResponse, InboundEvent, InlineButton, Keyboard,
    MessageId, ReplyButton, Role, ToCoreEvent, User,
};
