//! Compact document outlines for prompts that cannot carry the whole file.

use super::header::{header_title, is_section_header};
use serde::{Deserialize, Serialize};

/// Default length cap for section previews.
pub const DEFAULT_MAX_PREVIEW_CHARS: usize = 400;

/// Lightweight document section for outline/context without sending the full file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSection {
    pub title: String,
    /// Line index of the header.
    pub start_line: usize,
    /// Exclusive end line: the next header or the line count.
    pub end_line: usize,
    /// Raw section text truncated to the preview length.
    pub text_preview: String,
}

/// Builds outlines by splitting the document at header lines.
#[derive(Debug, Clone, Copy)]
pub struct OutlineBuilder {
    max_preview_chars: usize,
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self {
            max_preview_chars: DEFAULT_MAX_PREVIEW_CHARS,
        }
    }
}

impl OutlineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_preview_chars(mut self, max_preview_chars: usize) -> Self {
        self.max_preview_chars = max_preview_chars;
        self
    }

    /// Returns one section per header line, in document order.
    ///
    /// A document without headers yields an empty outline.
    pub fn build(&self, document: &str) -> Vec<DocumentSection> {
        let lines: Vec<&str> = document.split('\n').collect();
        let headers: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| is_section_header(line))
            .map(|(i, _)| i)
            .collect();

        headers
            .iter()
            .enumerate()
            .map(|(n, &start)| {
                let end = headers.get(n + 1).copied().unwrap_or(lines.len());
                let preview: String = lines[start..end]
                    .join("\n")
                    .chars()
                    .take(self.max_preview_chars)
                    .collect();
                DocumentSection {
                    title: header_title(lines[start]),
                    start_line: start,
                    end_line: end,
                    text_preview: preview,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_doc(headers: &[usize], len: usize) -> String {
        (0..len)
            .map(|i| {
                if headers.contains(&i) {
                    format!("# Section {i}")
                } else {
                    format!("line {i}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn sections_span_between_headers() {
        let doc = numbered_doc(&[0, 10, 25], 30);
        let outline = OutlineBuilder::new().build(&doc);

        let ranges: Vec<(usize, usize)> =
            outline.iter().map(|s| (s.start_line, s.end_line)).collect();
        assert_eq!(ranges, vec![(0, 10), (10, 25), (25, 30)]);
        assert_eq!(outline[1].title, "Section 10");
    }

    #[test]
    fn previews_are_truncated_and_raw() {
        let doc = "\\section*{Big}\n".to_string() + &"word ".repeat(200);
        let outline = OutlineBuilder::new().with_max_preview_chars(20).build(&doc);
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].title, "Big");
        assert_eq!(outline[0].text_preview, "\\section*{Big}\nword ");
    }

    #[test]
    fn headerless_document_has_no_outline() {
        assert!(OutlineBuilder::new().build("just\nplain\ntext").is_empty());
    }

    #[test]
    fn default_preview_cap_is_400_chars() {
        let doc = format!("## Long\n{}", "x".repeat(1000));
        let outline = OutlineBuilder::default().build(&doc);
        assert_eq!(outline[0].text_preview.chars().count(), 400);
    }
}
