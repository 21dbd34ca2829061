//! Document domain module.
//!
//! - `model`: The in-memory snapshot of the persisted source (`Document`)
//! - `repository`: Repository trait for document persistence
//! - `event`: Change notifications broadcast after a write

mod event;
mod model;
mod repository;

pub use event::DocumentEvent;
pub use model::Document;
pub use repository::DocumentRepository;
