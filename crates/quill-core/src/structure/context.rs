//! Section-scoped context around a raw anchor.

use super::header::is_section_header;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Text and contextual information around a selection.
///
/// `context_before` and `context_after` are reserved for windowed context.
/// The extractor returns the whole enclosing section in `full_context` and
/// leaves both empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContext {
    /// The raw anchor the context was computed for.
    pub selected_text: String,
    pub context_before: String,
    pub context_after: String,
    pub full_context: String,
    /// Line range `[start, end)` of the section, `None` when the anchor could
    /// not be located and no expansion happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_lines: Option<Range<usize>>,
}

impl TextContext {
    /// Returns true when windowed context is present.
    pub fn has_window(&self) -> bool {
        !self.context_before.is_empty() || !self.context_after.is_empty()
    }
}

/// Expands an anchor into the smallest enclosing section of the document.
#[derive(Debug, Default, Clone, Copy)]
pub struct SectionContextExtractor;

impl SectionContextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Returns the section containing `anchor`.
    ///
    /// The section runs from the nearest header at or before the anchor's first
    /// line (or document start) to the next header after the anchor (or
    /// document end). An anchor that cannot be located is returned alone.
    pub fn extract(&self, document: &str, anchor: &str) -> TextContext {
        let lines: Vec<&str> = document.split('\n').collect();
        let anchor_lines: Vec<&str> = anchor.split('\n').collect();

        let Some(start) = Self::find_anchor_start(&lines, &anchor_lines) else {
            tracing::debug!("Anchor not located; returning it without section context");
            return TextContext {
                selected_text: anchor.to_string(),
                full_context: anchor.to_string(),
                ..TextContext::default()
            };
        };
        let end = (start + anchor_lines.len()).min(lines.len());

        let section_start = (0..=start)
            .rev()
            .find(|&i| is_section_header(lines[i]))
            .unwrap_or(0);
        let section_end = (end..lines.len())
            .find(|&i| is_section_header(lines[i]))
            .unwrap_or(lines.len());

        tracing::debug!(section_start, section_end, "Resolved enclosing section");

        TextContext {
            selected_text: anchor.to_string(),
            context_before: String::new(),
            context_after: String::new(),
            full_context: lines[section_start..section_end].join("\n"),
            section_lines: Some(section_start..section_end),
        }
    }

    /// Exact multi-line match first, then the first line containing the
    /// anchor's first line.
    fn find_anchor_start(lines: &[&str], anchor_lines: &[&str]) -> Option<usize> {
        let exact = lines
            .windows(anchor_lines.len())
            .position(|window| window == anchor_lines);
        exact.or_else(|| {
            let first = anchor_lines.first()?;
            lines.iter().position(|line| line.contains(first))
        })
    }
}
