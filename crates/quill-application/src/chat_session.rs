//! Chat session use case.
//!
//! A session owns the conversation with the model, the current document
//! snapshot and selection, the edit awaiting review, and the undo history.
//! Every user turn is composed with selection context (or an outline when
//! nothing is selected), streamed through the transport, and inspected for a
//! tool call once complete.

use crate::system_prompt::render_system_prompt;
use quill_core::anchor::{AnchorResolution, SelectionState, SelectionTracker};
use quill_core::chat::{ChatMessage, Conversation};
use quill_core::config::QuillConfig;
use quill_core::document::{Document, DocumentEvent, DocumentRepository};
use quill_core::history::HistoryManager;
use quill_core::patch::{PatchApplier, PatchOutcome, PatchRequest};
use quill_core::structure::{DocumentSection, OutlineBuilder, SectionContextExtractor, TextContext};
use quill_core::tool::{FunctionCallParser, ToolCall, has_function_call};
use quill_core::{QuillError, Result};
use quill_interaction::{ChatTransport, StreamAccumulator, StreamUpdate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const OUTLINE_INTRO: &str = "Here is a compact outline of the document for context. Summaries or operations should reference sections by index:";

pub const APPLIED_MESSAGE: &str = "Applied changes successfully";
pub const REJECTED_MESSAGE: &str = "Changes rejected";

/// An edit proposed by the model, waiting for the user's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEdit {
    /// Raw anchor the edit replaces.
    pub old_text: String,
    pub new_text: String,
    /// The anchor could not be matched to the source when it was captured.
    pub anchor_degraded: bool,
}

/// Outcome of one user turn.
#[derive(Debug, Clone)]
pub enum ChatReply {
    /// A plain answer, appended to the conversation.
    Message(String),
    /// The model proposed an edit; see [`ChatSession::accept`] and
    /// [`ChatSession::reject`].
    Proposed(PendingEdit),
    /// The model called a tool that does not exist.
    ToolFailed(QuillError),
}

pub struct ChatSession {
    id: String,
    transport: Arc<dyn ChatTransport>,
    applier: Arc<dyn PatchApplier>,
    repository: Arc<dyn DocumentRepository>,
    system_prompt: String,
    conversation: Conversation,
    document: Document,
    selection: Option<SelectionState>,
    tracker: SelectionTracker,
    extractor: SectionContextExtractor,
    outline: OutlineBuilder,
    parser: FunctionCallParser,
    history: HistoryManager,
    pending: Option<PendingEdit>,
}

impl ChatSession {
    /// Loads the document and opens a conversation with a fresh system message.
    pub async fn start(
        transport: Arc<dyn ChatTransport>,
        applier: Arc<dyn PatchApplier>,
        repository: Arc<dyn DocumentRepository>,
        config: &QuillConfig,
    ) -> Result<Self> {
        let system_prompt = render_system_prompt()?;
        let document = Document::new(repository.load().await?);
        let id = Uuid::new_v4().to_string();
        tracing::info!(session_id = %id, lines = document.line_count(), "Chat session started");

        Ok(Self {
            id,
            transport,
            applier,
            repository,
            conversation: Conversation::new(system_prompt.clone()),
            system_prompt,
            document,
            selection: None,
            tracker: SelectionTracker::new(),
            extractor: SectionContextExtractor::new(),
            outline: OutlineBuilder::new().with_max_preview_chars(config.outline.max_preview_chars),
            parser: FunctionCallParser::new(),
            history: HistoryManager::new(config.history.capacity, config.history.max_entry_chars),
            pending: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn pending_edit(&self) -> Option<&PendingEdit> {
        self.pending.as_ref()
    }

    /// Records a new rendered selection. A blank selection clears the live one.
    pub fn select(&mut self, rendered: &str) -> Option<AnchorResolution> {
        self.selection = SelectionState::new(rendered);
        let selection = self.selection.as_ref()?;
        Some(self.tracker.on_selection_change(selection, &self.document).clone())
    }

    /// Drops the live selection; the last resolved anchor is kept.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// The raw anchor for the live selection, or the last one resolved.
    pub fn current_anchor(&self) -> Option<AnchorResolution> {
        self.tracker.selected_text(self.selection.as_ref(), &self.document)
    }

    pub fn context_for(&self, anchor: &str) -> TextContext {
        self.extractor.extract(self.document.raw_text(), anchor)
    }

    pub fn outline(&self) -> Vec<DocumentSection> {
        self.outline.build(self.document.raw_text())
    }

    /// Sends one user turn and inspects the completed response.
    ///
    /// `on_update` receives live render updates while the response streams.
    /// A transport failure is returned as an error and leaves the
    /// conversation unchanged.
    pub async fn send_message(
        &mut self,
        user_message: &str,
        on_update: impl FnMut(StreamUpdate),
    ) -> Result<ChatReply> {
        let user_message = user_message.trim();
        if user_message.is_empty() {
            return Err(QuillError::invalid_request("Message is empty"));
        }

        let anchor = self.current_anchor();
        let composed = match &anchor {
            Some(anchor) => {
                let context = self.context_for(&anchor.text);
                compose_message(user_message, Some(&anchor.text), Some(&context), &[])
            }
            None => compose_message(user_message, None, None, &self.outline()),
        };
        let mut request = self.conversation.messages().to_vec();
        request.push(ChatMessage::user(composed.clone()));

        let stream = self.transport.stream_chat(&request).await?;
        let full_text = StreamAccumulator::new().drain(stream, on_update).await?;
        self.conversation.push(ChatMessage::user(composed));

        let content = full_text.trim();
        if has_function_call(content)
            && let Some(call) = self.parser.parse(content)
        {
            return Ok(match ToolCall::try_from(&call) {
                Ok(ToolCall::UpdateText { new_text }) => {
                    let pending = PendingEdit {
                        old_text: anchor.as_ref().map(|a| a.text.clone()).unwrap_or_default(),
                        new_text,
                        anchor_degraded: anchor.as_ref().is_some_and(AnchorResolution::is_degraded),
                    };
                    tracing::info!(
                        session_id = %self.id,
                        old_len = pending.old_text.len(),
                        new_len = pending.new_text.len(),
                        "Edit proposed"
                    );
                    self.pending = Some(pending.clone());
                    ChatReply::Proposed(pending)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Model called an unknown tool");
                    ChatReply::ToolFailed(err)
                }
            });
        }

        self.conversation.push(ChatMessage::assistant(full_text.clone()));
        Ok(ChatReply::Message(full_text))
    }

    /// Applies the pending edit and records it for undo.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: Nothing is pending, or the edit has an empty side
    /// - `AnchorDegraded`: The target was not found and the anchor had
    ///   already been degraded when it was captured
    /// - Any error returned by the applier
    pub async fn accept(&mut self) -> Result<PatchOutcome> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| QuillError::invalid_request("No pending edit to accept"))?;

        let request = PatchRequest::new(pending.old_text.clone(), pending.new_text.clone());
        match self.applier.apply_patch(&request).await {
            Ok(outcome) => {
                if let Err(err) = self.history.add_to_history(pending.old_text, pending.new_text) {
                    tracing::warn!(error = %err, "Edit applied without an undo record");
                }
                self.conversation.push(ChatMessage::assistant(APPLIED_MESSAGE));
                self.reload_after_write().await;
                Ok(outcome)
            }
            Err(err) => {
                let err = if pending.anchor_degraded {
                    err.into_anchor_degraded()
                } else {
                    err
                };
                self.conversation
                    .push(ChatMessage::assistant(format!("Failed to apply changes: {err}")));
                Err(err)
            }
        }
    }

    /// Discards the pending edit. Returns false when nothing was pending.
    pub fn reject(&mut self) -> bool {
        if self.pending.take().is_none() {
            return false;
        }
        self.conversation.push(ChatMessage::assistant(REJECTED_MESSAGE));
        true
    }

    /// Starts over with only a fresh system message.
    pub fn new_chat(&mut self) {
        self.conversation.reset(self.system_prompt.clone());
        self.pending = None;
        tracing::info!(session_id = %self.id, "Started a new chat");
    }

    pub async fn undo(&mut self) -> Result<bool> {
        let moved = self.history.undo(self.applier.as_ref()).await?;
        if moved {
            self.reload_after_write().await;
        }
        Ok(moved)
    }

    pub async fn redo(&mut self) -> Result<bool> {
        let moved = self.history.redo(self.applier.as_ref()).await?;
        if moved {
            self.reload_after_write().await;
        }
        Ok(moved)
    }

    /// Re-reads the document from the repository.
    pub async fn reload_document(&mut self) -> Result<()> {
        let raw = self.repository.load().await?;
        self.document.reload(raw);
        Ok(())
    }

    /// Reacts to a change notification by reloading the document.
    pub async fn handle_event(&mut self, event: DocumentEvent) -> Result<()> {
        match event {
            DocumentEvent::ManualUpdated { ok: true } => self.reload_document().await,
            DocumentEvent::ManualUpdated { ok: false } => Ok(()),
        }
    }

    async fn reload_after_write(&mut self) {
        if let Err(err) = self.reload_document().await {
            tracing::warn!(error = %err, "Failed to reload document after write");
        }
    }
}

/// Builds the message sent to the model for one user turn.
///
/// With an anchor, windowed context is laid out in labelled blocks when
/// present; otherwise the enclosing section (when it extends past the anchor)
/// precedes the quoted anchor. Without an anchor, a non-empty outline is
/// appended as numbered sections.
pub fn compose_message(
    user_message: &str,
    anchor: Option<&str>,
    context: Option<&TextContext>,
    outline: &[DocumentSection],
) -> String {
    match (anchor, context) {
        (Some(_), Some(context)) if context.has_window() => format!(
            "{user_message}\n\nHere is the selected text with surrounding context:\n\n\
             --- CONTEXT BEFORE ---\n{}\n\n\
             --- SELECTED TEXT ---\n{}\n\n\
             --- CONTEXT AFTER ---\n{}",
            context.context_before, context.selected_text, context.context_after
        ),
        (Some(anchor), Some(context))
            if !context.full_context.is_empty() && context.full_context != anchor =>
        {
            format!(
                "{user_message}\n\n--- SECTION ---\n{}\n\nSelected text: \"{anchor}\"",
                context.full_context
            )
        }
        (Some(anchor), _) => format!("{user_message}\n\nSelected text: \"{anchor}\""),
        (None, _) if outline.is_empty() => user_message.to_string(),
        (None, _) => {
            let outline_text = outline
                .iter()
                .enumerate()
                .map(|(i, s)| format!("- [{}] {}\n{}", i + 1, s.title, s.text_preview))
                .collect::<Vec<_>>()
                .join("\n\n");
            format!("{user_message}\n\n{OUTLINE_INTRO}\n\n{outline_text}")
        }
    }
}
