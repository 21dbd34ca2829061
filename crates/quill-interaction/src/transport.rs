//! Transport seam between chat orchestration and a model provider.

use async_trait::async_trait;
use futures::Stream;
use quill_core::Result;
use quill_core::chat::ChatMessage;
use std::pin::Pin;

/// Lazy sequence of assistant text deltas for one request.
///
/// The stream ends on the provider's completion sentinel or when the
/// connection closes. An `Err` item ends the response early.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Streams a chat completion for a conversation.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends `messages` and returns the response as a stream of deltas.
    ///
    /// # Returns
    ///
    /// - `Ok(DeltaStream)`: The request was accepted
    /// - `Err(Transport)`: The request failed or was rejected by the provider
    async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<DeltaStream>;
}
