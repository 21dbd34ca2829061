//! Pre-write checks on proposed replacement text.

use crate::error::{QuillError, Result};

/// Wire and markdown fence delimiter.
pub const FENCE: &str = "```";

/// Counts non-overlapping occurrences of `needle` in `haystack`.
///
/// An empty needle never matches.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Returns true when `text` contains an odd number of triple-backtick fences.
pub fn has_unbalanced_fences(text: &str) -> bool {
    count_occurrences(text, FENCE) % 2 != 0
}

/// Rejects replacement text with unbalanced fences.
pub fn ensure_balanced_fences(text: &str) -> Result<()> {
    if has_unbalanced_fences(text) {
        return Err(QuillError::unsafe_edit(
            "unbalanced code fences detected. Please close all ``` blocks.",
        ));
    }
    Ok(())
}

/// Converts CRLF line endings to LF.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}
