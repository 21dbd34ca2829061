//! Application layer for Quill.
//!
//! Use cases that coordinate the domain layer with persistence and the model
//! transport: applying patches to the stored document, broadcasting change
//! events, and running a chat session from selection to accepted edit.

pub mod change_notifier;
pub mod chat_session;
pub mod document_patch_service;
pub mod system_prompt;

pub use change_notifier::ChangeNotifier;
pub use chat_session::{ChatReply, ChatSession, PendingEdit};
pub use document_patch_service::DocumentPatchService;
pub use system_prompt::render_system_prompt;
