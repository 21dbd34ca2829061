//! Extraction of a tool invocation from a completed model response.
//!
//! The wire shape is a marker line naming the function followed by a fenced
//! block whose content is the single `new_text` argument:
//!
//! ````text
//! FUNCTION_CALL: update_text
//! ```latex
//! \section*{Revised}
//! ```
//! ````

use crate::patch::safety::FENCE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Marker token that opens a tool-call declaration line.
pub const FUNCTION_CALL_MARKER: &str = "FUNCTION_CALL:";

/// Returns true if `text` contains the marker token.
///
/// Streaming consumers use this to stop rendering partial tool-call text
/// before its fence has closed.
pub fn has_function_call(text: &str) -> bool {
    text.contains(FUNCTION_CALL_MARKER)
}

/// A single parsed tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCall {
    pub function_name: String,
    pub parameters: HashMap<String, serde_json::Value>,
}

impl FunctionCall {
    /// Returns a string parameter, coercing non-string JSON values to text.
    pub fn string_param(&self, key: &str) -> Option<String> {
        self.parameters.get(key).map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        })
    }
}

/// Parser for the marker-and-fence protocol.
#[derive(Debug, Default, Clone, Copy)]
pub struct FunctionCallParser;

impl FunctionCallParser {
    pub fn new() -> Self {
        Self
    }

    /// Extracts at most one call from `response`.
    ///
    /// Returns `None` when there is no marker line, the function name is not a
    /// bare identifier, or no closed fence follows the marker line. A partial
    /// call is never reported.
    pub fn parse(&self, response: &str) -> Option<FunctionCall> {
        let lines: Vec<&str> = response.trim().split('\n').collect();
        let marker_index = lines
            .iter()
            .position(|line| line.trim().starts_with(FUNCTION_CALL_MARKER))?;

        let function_name = lines[marker_index]
            .trim()
            .strip_prefix(FUNCTION_CALL_MARKER)?
            .trim();
        if function_name.is_empty()
            || !function_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            tracing::debug!(function_name, "Ignoring marker line without a bare function name");
            return None;
        }

        let after = &lines[marker_index + 1..];
        let open = after
            .iter()
            .position(|line| line.trim().starts_with(FENCE))?;
        let body = &after[open + 1..];
        let close = body.iter().position(|line| line.trim().starts_with(FENCE))?;
        let new_text = body[..close].join("\n");

        tracing::debug!(function_name, len = new_text.len(), "Parsed function call from code fence");

        let mut parameters = HashMap::new();
        parameters.insert("new_text".to_string(), serde_json::Value::String(new_text));
        Some(FunctionCall {
            function_name: function_name.to_string(),
            parameters,
        })
    }
}
