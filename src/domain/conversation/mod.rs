//! Support conversation state

mod context;
mod message;

pub use context::Conversation;
pub use message::{ChatMessage, ChatRole};
