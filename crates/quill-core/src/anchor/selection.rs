//! Selection state captured from the UI and its resolved anchors.

use super::resolver::{AnchorResolution, TextAnchorResolver};
use crate::document::Document;

/// The text the user visually selected in the rendered view.
///
/// Surrounding whitespace is trimmed on capture; an empty selection is not a
/// selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    rendered_text: String,
}

impl SelectionState {
    pub fn new(rendered_text: impl AsRef<str>) -> Option<Self> {
        let trimmed = rendered_text.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            rendered_text: trimmed.to_string(),
        })
    }

    pub fn rendered_text(&self) -> &str {
        &self.rendered_text
    }
}

/// Tracks selection changes and keeps the most recently resolved anchor.
///
/// The last anchor survives after the live selection is gone, e.g. once focus
/// moves to the chat input.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    resolver: TextAnchorResolver,
    last: Option<AnchorResolution>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves and remembers a new selection.
    pub fn on_selection_change(
        &mut self,
        selection: &SelectionState,
        document: &Document,
    ) -> &AnchorResolution {
        let resolved = self
            .resolver
            .resolve(selection.rendered_text(), document.raw_text());
        self.last.insert(resolved)
    }

    /// Re-resolves the live selection if there is one, otherwise returns the
    /// last resolved anchor.
    pub fn selected_text(
        &self,
        live: Option<&SelectionState>,
        document: &Document,
    ) -> Option<AnchorResolution> {
        match live {
            Some(selection) => Some(
                self.resolver
                    .resolve(selection.rendered_text(), document.raw_text()),
            ),
            None => self.last.clone(),
        }
    }

    /// The most recently resolved anchor.
    pub fn last_selected_text(&self) -> Option<&AnchorResolution> {
        self.last.as_ref()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
