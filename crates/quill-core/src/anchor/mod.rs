//! Anchor resolution: from a rendered selection to the raw source span.

mod resolver;
mod selection;

pub use resolver::{AnchorKind, AnchorResolution, TextAnchorResolver, strip_formatting};
pub use selection::{SelectionState, SelectionTracker};
