pub mod apply;
pub mod chat;
pub mod inspect;
pub mod outline;

use anyhow::{Context, Result};
use quill_core::config::QuillConfig;
use quill_core::document::{Document, DocumentRepository};
use quill_infrastructure::{FileDocumentRepository, load_config, load_config_from};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loaded configuration and the document store shared by all commands.
pub struct AppContext {
    pub config: QuillConfig,
    pub repository: Arc<FileDocumentRepository>,
}

impl AppContext {
    pub async fn load(config_path: Option<&Path>, document: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_config_from(path).await,
            None => load_config().await,
        }
        .context("Failed to load configuration")?;

        if let Some(document) = document {
            config.document.path = document;
        }

        let repository = Arc::new(
            FileDocumentRepository::new(config.document.path.clone())
                .with_normalize_line_endings(config.document.normalize_line_endings),
        );

        Ok(Self { config, repository })
    }

    pub async fn document(&self) -> Result<Document> {
        let raw = self
            .repository
            .load()
            .await
            .with_context(|| format!("Failed to load {}", self.repository.path().display()))?;
        Ok(Document::new(raw))
    }
}
