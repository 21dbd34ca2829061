//! Patch request and outcome types.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The unit of mutation: replace `old_text` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchRequest {
    /// Raw anchor text expected to be present in the document.
    pub old_text: String,
    /// Replacement text.
    pub new_text: String,
}

impl PatchRequest {
    pub fn new(old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            old_text: old_text.into(),
            new_text: new_text.into(),
        }
    }

    /// Returns the request with roles swapped, used to undo an applied patch.
    pub fn reversed(&self) -> Self {
        Self {
            old_text: self.new_text.clone(),
            new_text: self.old_text.clone(),
        }
    }
}

/// Which matching tier located the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Verbatim containment after line-ending normalization.
    Exact,
    /// Containment after trimming trailing whitespace and trailing blank lines.
    TrailingWhitespace,
    /// Regex allowing trailing spaces/tabs before each line break.
    FlexibleSpacing,
}

/// A span of the original document located by [`super::PatchLocator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSpan {
    /// Byte range into the original (un-normalized) document.
    pub range: Range<usize>,
    /// Text of the match as it appears in the normalized view.
    pub matched: String,
    pub tier: MatchTier,
}

/// Result of a successfully applied patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOutcome {
    pub tier: MatchTier,
    /// Byte offset where the replacement starts in the updated document.
    pub start: usize,
    /// Number of bytes removed from the original document.
    pub replaced_len: usize,
    /// Number of bytes inserted.
    pub inserted_len: usize,
}
