//! Patch domain module.
//!
//! # Module Structure
//!
//! - `model`: Request/outcome types (`PatchRequest`, `PatchOutcome`, `MatchTier`)
//! - `locator`: Three-tier span location and splicing (`PatchLocator`)
//! - `safety`: Pre-write checks on replacement text
//! - `applier`: Trait for components that apply and persist patches

mod applier;
mod locator;
mod model;
pub mod safety;

pub use applier::PatchApplier;
pub use locator::PatchLocator;
pub use model::{LocatedSpan, MatchTier, PatchOutcome, PatchRequest};
