//! Three-tier location of patch targets inside a possibly drifted document.
//!
//! Matching runs against a line-ending-normalized view of the document, but the
//! located span is reported in byte offsets of the original text so the splice
//! leaves everything outside the match untouched.

use super::model::{LocatedSpan, MatchTier, PatchOutcome, PatchRequest};
use super::safety::{ensure_balanced_fences, normalize_line_endings};
use crate::error::{QuillError, Result};
use regex::RegexBuilder;
use std::ops::Range;

/// Compiled patterns for very large anchors can exceed the default limit.
const FLEXIBLE_PATTERN_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// LF-normalized view of a document with a byte map back to the original.
struct NormalizedView {
    text: String,
    /// `origin[i]` is the original offset of normalized byte `i`; one extra
    /// trailing entry maps the end of the text.
    origin: Vec<usize>,
}

impl NormalizedView {
    fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len() + 1);
        let mut chars = original.char_indices().peekable();

        while let Some((idx, ch)) = chars.next() {
            if ch == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
                chars.next();
                // The LF stands for the whole CRLF pair, so it maps to the CR.
                text.push('\n');
                origin.push(idx);
                continue;
            }
            text.push(ch);
            origin.extend(idx..idx + ch.len_utf8());
        }
        origin.push(original.len());

        Self { text, origin }
    }

    fn original_range(&self, range: &Range<usize>) -> Range<usize> {
        self.origin[range.start]..self.origin[range.end]
    }
}

/// Strips trailing spaces/tabs from every line and drops trailing blank lines.
fn trim_trailing_whitespace(text: &str) -> String {
    let trimmed: Vec<&str> = text
        .split('\n')
        .map(|line| line.trim_end_matches([' ', '\t']))
        .collect();
    trimmed.join("\n").trim_end_matches('\n').to_string()
}

/// Locates patch targets with progressively relaxed matching.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatchLocator;

impl PatchLocator {
    pub fn new() -> Self {
        Self
    }

    /// Finds the span of `document` that `old_text` refers to.
    ///
    /// Tiers, first success wins: exact containment, containment of the
    /// trailing-whitespace-trimmed form, and a regex allowing trailing
    /// spaces/tabs before each line break.
    ///
    /// # Errors
    ///
    /// `PatchNotFound` with the searched length and a short prefix when no
    /// tier matches.
    pub fn locate(&self, document: &str, old_text: &str) -> Result<LocatedSpan> {
        let view = NormalizedView::new(document);
        let needle = normalize_line_endings(old_text);

        if needle.is_empty() {
            return Err(QuillError::patch_not_found(old_text));
        }

        if let Some(start) = view.text.find(&needle) {
            tracing::debug!(start, len = needle.len(), "Exact match");
            return Ok(Self::span(&view, start..start + needle.len(), MatchTier::Exact));
        }

        let trimmed = trim_trailing_whitespace(&needle);
        if !trimmed.is_empty()
            && let Some(start) = view.text.find(&trimmed)
        {
            tracing::debug!(
                start,
                len = trimmed.len(),
                "Found match after trimming trailing whitespace/newlines"
            );
            return Ok(Self::span(
                &view,
                start..start + trimmed.len(),
                MatchTier::TrailingWhitespace,
            ));
        }

        let pattern = regex::escape(&needle).replace('\n', "[\\t ]*\\n");
        match RegexBuilder::new(&pattern)
            .size_limit(FLEXIBLE_PATTERN_SIZE_LIMIT)
            .build()
        {
            Ok(re) => {
                if let Some(m) = re.find(&view.text) {
                    tracing::debug!(
                        start = m.start(),
                        len = m.len(),
                        "Found match via regex with flexible whitespace"
                    );
                    return Ok(Self::span(&view, m.range(), MatchTier::FlexibleSpacing));
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "Flexible-spacing pattern could not be compiled");
            }
        }

        tracing::debug!(len = old_text.len(), "Text not found in document");
        Err(QuillError::patch_not_found(old_text))
    }

    fn span(view: &NormalizedView, normalized: Range<usize>, tier: MatchTier) -> LocatedSpan {
        LocatedSpan {
            range: view.original_range(&normalized),
            matched: view.text[normalized].to_string(),
            tier,
        }
    }

    /// Replaces `span` in `document` with `new_text`.
    pub fn splice(document: &str, span: &LocatedSpan, new_text: &str) -> String {
        let mut updated =
            String::with_capacity(document.len() - span.range.len() + new_text.len());
        updated.push_str(&document[..span.range.start]);
        updated.push_str(new_text);
        updated.push_str(&document[span.range.end..]);
        updated
    }

    /// Validates, locates and applies `request` against `document`.
    ///
    /// The fence check on `new_text` runs before any match attempt. Returns the
    /// updated document text and a summary of the replacement.
    pub fn apply(&self, document: &str, request: &PatchRequest) -> Result<(String, PatchOutcome)> {
        let new_text = normalize_line_endings(&request.new_text);
        ensure_balanced_fences(&new_text)?;

        let span = self.locate(document, &request.old_text)?;
        let updated = Self::splice(document, &span, &new_text);
        let outcome = PatchOutcome {
            tier: span.tier,
            start: span.range.start,
            replaced_len: span.range.len(),
            inserted_len: new_text.len(),
        };
        Ok((updated, outcome))
    }
}
