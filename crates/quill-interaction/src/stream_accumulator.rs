//! Folding streamed deltas into the final assistant response.

use crate::transport::DeltaStream;
use futures::StreamExt;
use quill_core::Result;
use quill_core::tool::has_function_call;

/// What the UI should do after a delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// Show the full text received so far.
    Render(String),
    /// A tool call started; clear any partial text already shown.
    Suppress,
    /// Nothing to show.
    Silent,
}

/// Accumulates deltas and decides when live rendering stops.
///
/// Once the accumulated text contains the tool-call marker, rendering is
/// suppressed for the rest of the response while accumulation continues.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    suppressed: bool,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, delta: &str) -> StreamUpdate {
        self.text.push_str(delta);
        if self.suppressed {
            return StreamUpdate::Silent;
        }
        if has_function_call(&self.text) {
            tracing::debug!("Tool call detected in stream, suppressing render");
            self.suppressed = true;
            return StreamUpdate::Suppress;
        }
        StreamUpdate::Render(self.text.clone())
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Drains `stream`, reporting each update, and returns the full text.
    ///
    /// A transport error aborts the fold; the partial text is discarded.
    pub async fn drain(
        mut self,
        mut stream: DeltaStream,
        mut on_update: impl FnMut(StreamUpdate),
    ) -> Result<String> {
        while let Some(delta) = stream.next().await {
            let update = self.push(&delta?);
            on_update(update);
        }
        Ok(self.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::QuillError;

    fn scripted(items: Vec<Result<String>>) -> DeltaStream {
        Box::pin(futures::stream::iter(items))
    }

    #[test]
    fn rendering_stops_at_the_marker() {
        let mut acc = StreamAccumulator::new();
        assert_eq!(acc.push("Sure. "), StreamUpdate::Render("Sure. ".into()));
        assert_eq!(acc.push("FUNCTION_"), StreamUpdate::Render("Sure. FUNCTION_".into()));
        assert_eq!(acc.push("CALL: update_text\n"), StreamUpdate::Suppress);
        assert_eq!(acc.push("```\nbody\n```"), StreamUpdate::Silent);
        assert!(acc.is_suppressed());
        assert_eq!(
            acc.into_text(),
            "Sure. FUNCTION_CALL: update_text\n```\nbody\n```"
        );
    }

    #[tokio::test]
    async fn drain_collects_the_whole_response() {
        let stream = scripted(vec![Ok("a".into()), Ok("b".into()), Ok("c".into())]);
        let mut renders = Vec::new();
        let text = StreamAccumulator::new()
            .drain(stream, |u| renders.push(u))
            .await
            .unwrap();
        assert_eq!(text, "abc");
        assert_eq!(renders.last(), Some(&StreamUpdate::Render("abc".into())));
    }

    #[tokio::test]
    async fn drain_aborts_on_transport_error() {
        let stream = scripted(vec![
            Ok("partial".into()),
            Err(QuillError::transport(None, "connection reset")),
            Ok("never".into()),
        ]);
        let err = StreamAccumulator::new()
            .drain(stream, |_| {})
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
