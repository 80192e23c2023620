//! Chain handlers that run ahead of the conversation handler.

mod logging_handler;

pub use logging_handler::LoggingHandler;
