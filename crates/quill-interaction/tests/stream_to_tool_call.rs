//! SSE bytes through decoding and accumulation into a parsed tool call.

use bytes::Bytes;
use quill_core::tool::{FunctionCallParser, ToolCall};
use quill_interaction::sse::spawn_delta_stream;
use quill_interaction::{StreamAccumulator, StreamUpdate};
use std::convert::Infallible;
use std::time::Duration;

fn sse_body(deltas: &[&str]) -> Vec<Result<Bytes, Infallible>> {
    let mut body = String::new();
    for delta in deltas {
        let frame = serde_json::json!({ "choices": [{ "index": 0, "delta": { "content": delta } }] });
        body.push_str(&format!("data: {frame}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");

    // Deliver in uneven network-sized pieces.
    body.as_bytes()
        .chunks(7)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect()
}

#[tokio::test]
async fn streamed_tool_call_is_suppressed_then_parsed() {
    let chunks = sse_body(&[
        "I'll tighten it.\n",
        "FUNCTION_CALL: update_text\n",
        "```latex\n\\section*{Setup}\n",
        "Install first.\n```",
    ]);
    let stream = spawn_delta_stream(futures::stream::iter(chunks), Duration::from_secs(5));

    let mut updates = Vec::new();
    let text = StreamAccumulator::new()
        .drain(stream, |u| updates.push(u))
        .await
        .unwrap();

    assert_eq!(updates[0], StreamUpdate::Render("I'll tighten it.\n".into()));
    assert_eq!(updates[1], StreamUpdate::Suppress);
    assert!(updates[2..].iter().all(|u| *u == StreamUpdate::Silent));

    let call = FunctionCallParser::new().parse(&text).unwrap();
    assert_eq!(
        ToolCall::try_from(&call).unwrap(),
        ToolCall::UpdateText {
            new_text: "\\section*{Setup}\nInstall first.".into()
        }
    );
}
