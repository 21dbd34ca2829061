use serde::{Deserialize, Serialize};

/// Snapshot of the raw source text.
///
/// The raw text is the byte-exact persisted content and the only
/// authoritative copy; rendered views are derived from it and never read back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    raw_text: String,
}

impl Document {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Replaces the snapshot with freshly loaded content.
    pub fn reload(&mut self, raw_text: impl Into<String>) {
        self.raw_text = raw_text.into();
    }

    pub fn line_count(&self) -> usize {
        self.raw_text.split('\n').count()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_text.is_empty()
    }
}
