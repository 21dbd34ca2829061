//! Patch application against the persisted document.

use crate::change_notifier::ChangeNotifier;
use async_trait::async_trait;
use quill_core::document::{DocumentEvent, DocumentRepository};
use quill_core::patch::{PatchApplier, PatchLocator, PatchOutcome, PatchRequest};
use quill_core::{QuillError, Result};
use std::sync::Arc;

/// Applies patches with one read-modify-write cycle per call, then notifies
/// subscribers.
///
/// Concurrent callers are not coordinated; the last write wins.
pub struct DocumentPatchService {
    repository: Arc<dyn DocumentRepository>,
    notifier: Arc<ChangeNotifier>,
    locator: PatchLocator,
}

impl DocumentPatchService {
    pub fn new(repository: Arc<dyn DocumentRepository>, notifier: Arc<ChangeNotifier>) -> Self {
        Self {
            repository,
            notifier,
            locator: PatchLocator::new(),
        }
    }

    pub fn notifier(&self) -> &Arc<ChangeNotifier> {
        &self.notifier
    }
}

#[async_trait]
impl PatchApplier for DocumentPatchService {
    async fn apply_patch(&self, request: &PatchRequest) -> Result<PatchOutcome> {
        if request.old_text.is_empty() || request.new_text.is_empty() {
            return Err(QuillError::invalid_request(
                "Both old_text and new_text parameters are required",
            ));
        }

        let current = self.repository.load().await?;
        let (updated, outcome) = self.locator.apply(&current, request)?;
        self.repository.save(&updated).await?;

        tracing::info!(
            tier = ?outcome.tier,
            start = outcome.start,
            replaced = outcome.replaced_len,
            inserted = outcome.inserted_len,
            "Applied patch"
        );

        self.notifier.publish(DocumentEvent::ManualUpdated { ok: true });
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::patch::MatchTier;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryRepository {
        content: Mutex<String>,
        saves: Mutex<usize>,
    }

    impl MemoryRepository {
        fn with(content: &str) -> Arc<Self> {
            Arc::new(Self {
                content: Mutex::new(content.to_string()),
                saves: Mutex::new(0),
            })
        }
    }

    #[async_trait]
    impl DocumentRepository for MemoryRepository {
        async fn load(&self) -> Result<String> {
            Ok(self.content.lock().unwrap().clone())
        }

        async fn save(&self, content: &str) -> Result<()> {
            *self.content.lock().unwrap() = content.to_string();
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn service(repo: &Arc<MemoryRepository>) -> DocumentPatchService {
        DocumentPatchService::new(repo.clone(), Arc::new(ChangeNotifier::new()))
    }

    #[tokio::test]
    async fn applies_persists_and_notifies() {
        let repo = MemoryRepository::with("# Title\nHello   \nrest\n");
        let service = service(&repo);
        let mut events = service.notifier().subscribe();

        let outcome = service
            .apply_patch(&PatchRequest::new("Hello\nrest", "Goodbye\nrest"))
            .await
            .unwrap();

        assert_eq!(outcome.tier, MatchTier::FlexibleSpacing);
        assert_eq!(*repo.content.lock().unwrap(), "# Title\nGoodbye\nrest\n");
        assert_eq!(events.recv().await, Some(DocumentEvent::ManualUpdated { ok: true }));
    }

    #[tokio::test]
    async fn empty_fields_are_rejected() {
        let repo = MemoryRepository::with("text");
        let service = service(&repo);

        for request in [PatchRequest::new("", "x"), PatchRequest::new("text", "")] {
            let err = service.apply_patch(&request).await.unwrap_err();
            assert!(matches!(err, QuillError::InvalidRequest(_)));
        }
        assert_eq!(*repo.saves.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn unbalanced_fences_never_reach_the_file() {
        let repo = MemoryRepository::with("a ``` b");
        let service = service(&repo);

        let err = service
            .apply_patch(&PatchRequest::new("a", "```rust"))
            .await
            .unwrap_err();
        assert!(err.is_unsafe_edit());
        assert_eq!(*repo.saves.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_target_reports_diagnostics_and_keeps_file() {
        let repo = MemoryRepository::with("alpha\nbeta\n");
        let service = service(&repo);
        let mut events = service.notifier().subscribe();

        let err = service
            .apply_patch(&PatchRequest::new("gamma", "delta"))
            .await
            .unwrap_err();
        match err {
            QuillError::PatchNotFound {
                searched_length,
                first_chars,
            } => {
                assert_eq!(searched_length, 5);
                assert_eq!(first_chars, "gamma");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(*repo.content.lock().unwrap(), "alpha\nbeta\n");
        assert!(events.try_recv().is_err());
    }
}
