use super::model::{PatchOutcome, PatchRequest};
use crate::error::Result;
use async_trait::async_trait;

/// Applies a patch to the persisted document.
///
/// Implementations perform one read-modify-write cycle per call. No
/// coordination between concurrent callers is provided.
#[async_trait]
pub trait PatchApplier: Send + Sync {
    /// Locates `request.old_text`, replaces it and persists the document.
    ///
    /// # Returns
    ///
    /// - `Ok(PatchOutcome)`: The document was updated and written
    /// - `Err(UnsafeEdit)`: `new_text` was rejected before matching
    /// - `Err(PatchNotFound)`: No matching tier located `old_text`
    /// - `Err(_)`: Reading or writing the document failed
    async fn apply_patch(&self, request: &PatchRequest) -> Result<PatchOutcome>;
}
