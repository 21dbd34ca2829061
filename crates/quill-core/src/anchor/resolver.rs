//! Maps rendered selections back to raw source text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEADING_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:section|chapter)\*?\{").expect("valid heading command pattern")
});

static ATX_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+\s*").expect("valid ATX pattern"));

static EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*|__|\*|_").expect("valid emphasis pattern"));

/// How an anchor was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnchorKind {
    /// The rendered text occurs verbatim in the source.
    Exact,
    /// Matched line by line after stripping formatting.
    Formatted { lines: usize },
    /// Nothing matched; the rendered text is used as-is.
    Degraded,
}

/// The raw-text span identified for a rendered selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorResolution {
    pub text: String,
    pub kind: AnchorKind,
}

impl AnchorResolution {
    pub fn is_degraded(&self) -> bool {
        self.kind == AnchorKind::Degraded
    }
}

/// Removes heading wrappers, leading `#` runs and emphasis markers.
pub fn strip_formatting(text: &str) -> String {
    let without_command = HEADING_COMMAND.replace_all(text, "");
    let without_braces = without_command.replace('}', "");
    let without_marker = ATX_MARKER.replace(&without_braces, "");
    EMPHASIS.replace_all(&without_marker, "").trim().to_string()
}

/// Reconciles a rendered selection with the raw source text.
///
/// Resolution never fails: when nothing matches, the rendered text is returned
/// and marked [`AnchorKind::Degraded`] so callers can tell a lost anchor from a
/// missing patch target later on.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextAnchorResolver;

impl TextAnchorResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, rendered: &str, raw: &str) -> AnchorResolution {
        if raw.contains(rendered) {
            tracing::debug!("Found exact match in raw text");
            return AnchorResolution {
                text: rendered.to_string(),
                kind: AnchorKind::Exact,
            };
        }

        if let Some(text) = Self::match_formatted_lines(rendered, raw) {
            let lines = text.split('\n').count();
            tracing::debug!(lines, "Found raw text with formatting");
            return AnchorResolution {
                text,
                kind: AnchorKind::Formatted { lines },
            };
        }

        tracing::warn!(
            "Could not find raw text for selection, using rendered text (may cause update failures)"
        );
        AnchorResolution {
            text: rendered.to_string(),
            kind: AnchorKind::Degraded,
        }
    }

    /// The first raw line whose stripped form contains the stripped first
    /// rendered line starts the match; it extends to as many raw lines as the
    /// selection has.
    fn match_formatted_lines(rendered: &str, raw: &str) -> Option<String> {
        let rendered_lines: Vec<&str> = rendered.split('\n').collect();
        let first = strip_formatting(rendered_lines.first()?);
        if first.is_empty() {
            return None;
        }

        let raw_lines: Vec<&str> = raw.split('\n').collect();
        let start = raw_lines
            .iter()
            .position(|line| strip_formatting(line).contains(&first))?;
        let end = (start + rendered_lines.len()).min(raw_lines.len());
        Some(raw_lines[start..end].join("\n"))
    }
}
