//! Conversation log: message model plus the shared append/remove/replace log.

pub mod log;
pub mod model;

pub use log::{LogHandle, LogOp, MessageLog};
pub use model::{AccountMode, Message, MessageBody, MessageKind, SearchResult};
