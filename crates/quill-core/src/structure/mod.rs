//! Document structure: section headers, section-scoped context and outlines.

mod context;
mod header;
mod outline;

pub use context::{SectionContextExtractor, TextContext};
pub use header::{header_title, is_section_header};
pub use outline::{DEFAULT_MAX_PREVIEW_CHARS, DocumentSection, OutlineBuilder};
