//! Chat Completions server-sent-event decoding.
//!
//! Byte chunks are decoded into SSE frames on a spawned task and forwarded as
//! text deltas over a bounded channel. The task ends on `[DONE]`, on
//! connection close, on a transport error or after the idle timeout.

use crate::transport::DeltaStream;
use bytes::Bytes;
use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use quill_core::{QuillError, Result};
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

const DONE_SENTINEL: &str = "[DONE]";

/// Spawns the decoder for `bytes` and returns the receiving side as a stream.
pub fn spawn_delta_stream<S, E>(bytes: S, idle_timeout: Duration) -> DeltaStream
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + Unpin + 'static,
    E: Display + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<Result<String>>(16);
    tokio::spawn(process_chat_sse(bytes, tx, idle_timeout));
    Box::pin(futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    }))
}

async fn process_chat_sse<S, E>(stream: S, tx: mpsc::Sender<Result<String>>, idle_timeout: Duration)
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: Display,
{
    let mut stream = stream.eventsource();

    loop {
        let sse = match timeout(idle_timeout, stream.next()).await {
            Ok(Some(Ok(ev))) => ev,
            Ok(Some(Err(e))) => {
                let _ = tx.send(Err(QuillError::transport(None, e.to_string()))).await;
                return;
            }
            Ok(None) => {
                tracing::debug!("SSE stream closed");
                return;
            }
            Err(_) => {
                let _ = tx
                    .send(Err(QuillError::transport(None, "idle timeout waiting for SSE")))
                    .await;
                return;
            }
        };

        if sse.data.trim() == DONE_SENTINEL {
            tracing::debug!("SSE stream completed");
            return;
        }

        // Partial or foreign frames are skipped.
        let chunk: serde_json::Value = match serde_json::from_str(&sse.data) {
            Ok(v) => v,
            Err(_) => continue,
        };

        let content = chunk
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("delta"))
            .and_then(|d| d.get("content"))
            .and_then(|c| c.as_str());

        if let Some(content) = content
            && !content.is_empty()
            && tx.send(Ok(content.to_string())).await.is_err()
        {
            tracing::debug!("Delta receiver dropped, abandoning stream");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn frame(content: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({ "choices": [{ "delta": { "content": content } }] })
        )
    }

    fn scripted(chunks: Vec<String>) -> impl Stream<Item = std::result::Result<Bytes, Infallible>> + Send + Unpin + 'static {
        futures::stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from(c))))
    }

    async fn collect(stream: DeltaStream) -> Vec<Result<String>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn yields_deltas_until_done() {
        let chunks = vec![
            frame("Hel"),
            frame("lo"),
            "data: [DONE]\n\n".to_string(),
            frame("ignored"),
        ];
        let deltas = collect(spawn_delta_stream(scripted(chunks), Duration::from_secs(5))).await;
        let text: Vec<String> = deltas.into_iter().map(|d| d.unwrap()).collect();
        assert_eq!(text, ["Hel", "lo"]);
    }

    #[tokio::test]
    async fn frames_split_across_chunks_are_reassembled() {
        let whole = frame("split");
        let (a, b) = whole.split_at(10);
        let chunks = vec![a.to_string(), b.to_string()];
        let deltas = collect(spawn_delta_stream(scripted(chunks), Duration::from_secs(5))).await;
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].as_ref().unwrap(), "split");
    }

    #[tokio::test]
    async fn unparseable_frames_are_skipped() {
        let chunks = vec![
            "data: {not json\n\n".to_string(),
            "data: {\"object\":\"chat.completion.chunk\"}\n\n".to_string(),
            frame("ok"),
        ];
        let deltas = collect(spawn_delta_stream(scripted(chunks), Duration::from_secs(5))).await;
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].as_ref().unwrap(), "ok");
    }

    #[tokio::test]
    async fn idle_stream_times_out() {
        let stalled = futures::stream::pending::<std::result::Result<Bytes, Infallible>>();
        let deltas = collect(spawn_delta_stream(stalled, Duration::from_millis(20))).await;
        assert_eq!(deltas.len(), 1);
        assert!(deltas[0].as_ref().unwrap_err().is_transport());
    }
}
