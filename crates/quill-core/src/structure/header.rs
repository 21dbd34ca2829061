//! Section header detection shared by context extraction and outlining.

use once_cell::sync::Lazy;
use regex::Regex;

/// Markdown ATX headers of any level, or LaTeX `\section{` / `\chapter{`
/// commands (starred or not), at the start of a line.
static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\\section\*?\{|\\chapter\*?\{|#{1,6}\s)").expect("valid header pattern")
});

static ATX_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+\s*").expect("valid ATX pattern"));

static LATEX_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:section|chapter)\*?\{([^}]*)\}.*").expect("valid LaTeX heading pattern")
});

/// Longest fallback title taken from the raw header line.
const FALLBACK_TITLE_CHARS: usize = 80;

/// Returns true if `line` opens a new section.
pub fn is_section_header(line: &str) -> bool {
    HEADER.is_match(line)
}

/// Extracts a readable title from a header line.
///
/// Falls back to the first characters of the trimmed line when stripping the
/// header syntax leaves nothing.
pub fn header_title(line: &str) -> String {
    let without_marker = ATX_MARKER.replace(line, "");
    let title = LATEX_HEADING.replace(&without_marker, "$1");
    let title = title.trim();
    if title.is_empty() {
        line.trim().chars().take(FALLBACK_TITLE_CHARS).collect()
    } else {
        title.to_string()
    }
}
