use super::function_call::FunctionCall;
use crate::error::{QuillError, Result};
use strum::{Display, EnumIter, EnumMessage, EnumString, IntoEnumIterator};

/// Tools the model may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, EnumMessage)]
pub enum ToolName {
    /// Replace the selected text in the document.
    #[strum(to_string = "update_text", serialize = "replace_text")]
    UpdateText,
}

impl ToolName {
    /// Every wire name accepted, aliases included.
    pub fn available() -> Vec<String> {
        ToolName::iter()
            .flat_map(|tool| tool.get_serializations().iter().map(|s| s.to_string()))
            .collect()
    }
}

/// A supported tool invocation with its typed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    UpdateText { new_text: String },
}

impl ToolCall {
    pub fn name(&self) -> ToolName {
        match self {
            Self::UpdateText { .. } => ToolName::UpdateText,
        }
    }
}

impl TryFrom<&FunctionCall> for ToolCall {
    type Error = QuillError;

    fn try_from(call: &FunctionCall) -> Result<Self> {
        let tool: ToolName = call
            .function_name
            .parse()
            .map_err(|_| QuillError::UnknownTool {
                name: call.function_name.clone(),
                available: ToolName::available(),
            })?;

        match tool {
            ToolName::UpdateText => Ok(Self::UpdateText {
                new_text: call.string_param("new_text").unwrap_or_default(),
            }),
        }
    }
}
