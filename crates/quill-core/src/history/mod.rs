//! Undo/redo history of applied patches.
//!
//! - `model`: The immutable record of one applied patch (`HistoryEntry`)
//! - `manager`: The bounded cursor-based stack (`HistoryManager`)

mod manager;
mod model;

pub use manager::{DEFAULT_HISTORY_CAPACITY, DEFAULT_MAX_ENTRY_CHARS, HistoryManager};
pub use model::HistoryEntry;
