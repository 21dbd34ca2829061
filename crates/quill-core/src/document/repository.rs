//! Document repository trait.

use crate::error::Result;
use async_trait::async_trait;

/// Persistence for the single source document.
///
/// Implementations store one flat text file and overwrite it whole on save.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Loads the full document text.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The persisted content
    /// - `Err(NotFound)`: The document does not exist
    /// - `Err(_)`: Reading failed
    async fn load(&self) -> Result<String>;

    /// Overwrites the document with `content`.
    async fn save(&self, content: &str) -> Result<()>;
}
