use crate::patch::PatchRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One applied patch, kept as a content copy so it can be reversed later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub old_text: String,
    pub new_text: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            old_text: old_text.into(),
            new_text: new_text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Combined character count of both sides.
    pub fn char_len(&self) -> usize {
        self.old_text.chars().count() + self.new_text.chars().count()
    }

    /// The patch that re-applies this change.
    pub fn forward(&self) -> PatchRequest {
        PatchRequest::new(self.old_text.clone(), self.new_text.clone())
    }

    /// The patch that reverts this change.
    pub fn backward(&self) -> PatchRequest {
        self.forward().reversed()
    }
}
