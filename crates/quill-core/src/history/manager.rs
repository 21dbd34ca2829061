//! Bounded linear undo/redo log.

use super::model::HistoryEntry;
use crate::error::{QuillError, Result};
use crate::patch::PatchApplier;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
pub const DEFAULT_MAX_ENTRY_CHARS: usize = 50_000;

/// Linear undo/redo stack over applied patches.
///
/// `cursor` points at the most recently applied entry; `None` means every
/// entry has been undone (or there are none). Entries after the cursor are
/// the redo branch and are discarded by the next insertion.
#[derive(Debug)]
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
    capacity: usize,
    max_entry_chars: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY, DEFAULT_MAX_ENTRY_CHARS)
    }
}

impl HistoryManager {
    pub fn new(capacity: usize, max_entry_chars: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            capacity: capacity.max(1),
            max_entry_chars,
        }
    }

    /// Records an applied patch.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The entry was appended and the cursor moved onto it
    /// - `Err(HistoryOverflow)`: The entry is too large and was not stored;
    ///   the history is left untouched
    pub fn add_to_history(
        &mut self,
        old_text: impl Into<String>,
        new_text: impl Into<String>,
    ) -> Result<()> {
        let entry = HistoryEntry::new(old_text, new_text);
        let size = entry.char_len();
        if size > self.max_entry_chars {
            tracing::warn!(
                size,
                limit = self.max_entry_chars,
                "Change too large to store in undo history"
            );
            return Err(QuillError::HistoryOverflow {
                size,
                limit: self.max_entry_chars,
            });
        }

        self.entries.truncate(self.cursor.map_or(0, |c| c + 1));

        if self.entries.len() >= self.capacity {
            self.entries.remove(0);
            tracing::debug!("History limit reached, removed oldest entry");
        }

        self.entries.push(entry);
        self.cursor = Some(self.entries.len() - 1);
        tracing::info!(
            entries = self.entries.len(),
            cursor = self.entries.len() - 1,
            size,
            "History updated"
        );
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.next_index() < self.entries.len()
    }

    /// Reverts the entry under the cursor through `applier`.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. The cursor moves
    /// only after the applier succeeds.
    pub async fn undo(&mut self, applier: &dyn PatchApplier) -> Result<bool> {
        let Some(index) = self.cursor else {
            tracing::debug!("Cannot undo: at beginning of history");
            return Ok(false);
        };

        applier.apply_patch(&self.entries[index].backward()).await?;
        self.cursor = index.checked_sub(1);
        tracing::info!(cursor = ?self.cursor, "Undo successful");
        Ok(true)
    }

    /// Re-applies the entry after the cursor through `applier`.
    ///
    /// Returns `Ok(false)` when there is nothing to redo. The cursor moves
    /// only after the applier succeeds.
    pub async fn redo(&mut self, applier: &dyn PatchApplier) -> Result<bool> {
        let next = self.next_index();
        let Some(entry) = self.entries.get(next) else {
            tracing::debug!("Cannot redo: at end of history");
            return Ok(false);
        };

        applier.apply_patch(&entry.forward()).await?;
        self.cursor = Some(next);
        tracing::info!(cursor = next, "Redo successful");
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the most recently applied entry, `None` before the first.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
        tracing::debug!("History cleared");
    }

    /// Total characters held across all entries.
    pub fn memory_usage(&self) -> usize {
        self.entries.iter().map(HistoryEntry::char_len).sum()
    }

    /// Approximate footprint assuming two bytes per character.
    pub fn memory_usage_formatted(&self) -> String {
        let bytes = self.memory_usage() * 2;
        if bytes < 1024 {
            format!("{bytes}B")
        } else if bytes < 1024 * 1024 {
            format!("{:.2}KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.2}MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    fn next_index(&self) -> usize {
        self.cursor.map_or(0, |c| c + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{PatchLocator, PatchOutcome, PatchRequest};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Applies patches to an in-memory buffer.
    struct BufferApplier {
        text: Mutex<String>,
    }

    impl BufferApplier {
        fn new(text: &str) -> Self {
            Self {
                text: Mutex::new(text.to_string()),
            }
        }

        fn text(&self) -> String {
            self.text.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PatchApplier for BufferApplier {
        async fn apply_patch(&self, request: &PatchRequest) -> Result<PatchOutcome> {
            let mut text = self.text.lock().unwrap();
            let (updated, outcome) = PatchLocator::new().apply(&text, request)?;
            *text = updated;
            Ok(outcome)
        }
    }

    #[test]
    fn eviction_keeps_capacity_and_drops_oldest() {
        let mut history = HistoryManager::default();
        for i in 0..51 {
            history.add_to_history(format!("old {i}"), format!("new {i}")).unwrap();
        }

        assert_eq!(history.len(), 50);
        assert_eq!(history.current_index(), Some(49));
        assert!(history.entries().iter().all(|e| e.old_text != "old 0"));
        assert_eq!(history.entries()[0].old_text, "old 1");
    }

    #[test]
    fn oversized_entry_is_rejected_without_touching_history() {
        let mut history = HistoryManager::new(50, 10);
        history.add_to_history("a", "b").unwrap();

        let err = history.add_to_history("0123456", "789012").unwrap_err();
        assert!(err.is_history_overflow());
        assert_eq!(history.len(), 1);
        assert_eq!(history.current_index(), Some(0));
    }

    #[tokio::test]
    async fn undo_redo_round_trip() {
        let applier = BufferApplier::new("intro\nA\noutro\n");
        applier
            .apply_patch(&PatchRequest::new("A", "B"))
            .await
            .unwrap();
        let mut history = HistoryManager::default();
        history.add_to_history("A", "B").unwrap();

        assert!(history.undo(&applier).await.unwrap());
        assert_eq!(applier.text(), "intro\nA\noutro\n");
        assert_eq!(history.current_index(), None);
        assert!(!history.can_undo());

        assert!(history.redo(&applier).await.unwrap());
        assert_eq!(applier.text(), "intro\nB\noutro\n");
        assert_eq!(history.current_index(), Some(0));
        assert!(!history.can_redo());
    }

    #[tokio::test]
    async fn failed_undo_keeps_cursor() {
        let applier = BufferApplier::new("unrelated content");
        let mut history = HistoryManager::default();
        history.add_to_history("A", "B").unwrap();

        let err = history.undo(&applier).await.unwrap_err();
        assert!(err.is_patch_not_found());
        assert_eq!(history.current_index(), Some(0));
    }

    #[tokio::test]
    async fn nothing_to_undo_or_redo() {
        let applier = BufferApplier::new("");
        let mut history = HistoryManager::default();
        assert!(!history.undo(&applier).await.unwrap());
        assert!(!history.redo(&applier).await.unwrap());
    }

    #[test]
    fn new_change_after_undo_discards_redo_branch() {
        let mut history = HistoryManager::default();
        history.add_to_history("a", "b").unwrap();
        history.add_to_history("b", "c").unwrap();
        history.cursor = Some(0);

        history.add_to_history("b", "d").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[1].new_text, "d");
        assert!(!history.can_redo());
    }

    #[test]
    fn memory_usage_is_reported_in_utf16_bytes() {
        let mut history = HistoryManager::default();
        assert_eq!(history.memory_usage_formatted(), "0B");

        history.add_to_history("x".repeat(300), "y".repeat(300)).unwrap();
        assert_eq!(history.memory_usage(), 600);
        assert_eq!(history.memory_usage_formatted(), "1.17KB");

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.current_index(), None);
    }
}
