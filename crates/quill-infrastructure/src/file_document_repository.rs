//! Flat-file document repository.
//!
//! The whole document lives in one UTF-8 text file that is overwritten on
//! every save.

use async_trait::async_trait;
use quill_core::document::DocumentRepository;
use quill_core::patch::safety::normalize_line_endings;
use quill_core::{QuillError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct FileDocumentRepository {
    path: PathBuf,
    normalize_line_endings: bool,
}

impl FileDocumentRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            normalize_line_endings: true,
        }
    }

    /// Controls whether CRLF is rewritten as LF on save.
    pub fn with_normalize_line_endings(mut self, normalize: bool) -> Self {
        self.normalize_line_endings = normalize;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentRepository for FileDocumentRepository {
    async fn load(&self) -> Result<String> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(QuillError::not_found(
                "Document",
                self.path.display().to_string(),
            )),
            Err(e) => Err(QuillError::io(format!(
                "Failed to read document {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| QuillError::io(format!("Failed to create directory: {}", e)))?;
        }

        let content = if self.normalize_line_endings {
            normalize_line_endings(content)
        } else {
            content.to_string()
        };

        fs::write(&self.path, content.as_bytes()).await.map_err(|e| {
            QuillError::io(format!(
                "Failed to write document {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %self.path.display(), bytes = content.len(), "Document saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileDocumentRepository::new(temp_dir.path().join("manual.mmd"));
        assert!(repo.load().await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn save_normalizes_line_endings() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileDocumentRepository::new(temp_dir.path().join("docs").join("manual.mmd"));

        repo.save("# Title\r\nbody\r\n").await.unwrap();
        assert_eq!(repo.load().await.unwrap(), "# Title\nbody\n");
    }

    #[tokio::test]
    async fn save_can_keep_line_endings() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileDocumentRepository::new(temp_dir.path().join("manual.mmd"))
            .with_normalize_line_endings(false);

        repo.save("a\r\nb").await.unwrap();
        assert_eq!(repo.load().await.unwrap(), "a\r\nb");
    }
}
