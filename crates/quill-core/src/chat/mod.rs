//! Conversation types exchanged with the model.

mod message;

pub use message::{ChatMessage, ChatRole, Conversation};
