//! Domain layer for Quill: anchoring rendered selections to raw source text,
//! section context and outlines, tool-call parsing, fuzzy patch location and
//! the undo/redo history. Nothing here performs I/O.

pub mod anchor;
pub mod chat;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod patch;
pub mod secret;
pub mod structure;
pub mod tool;

// Re-export common error type
pub use error::{QuillError, Result};
