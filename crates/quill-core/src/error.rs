//! Error types for the Quill application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Quill application.
///
/// The edit-related variants mirror the failure taxonomy of the editing
/// pipeline: anchor degradation, patch location, unsafe edits, history
/// overflow and transport failures. None of them is fatal to the process.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum QuillError {
    /// The selection could not be mapped back to raw text and the patch built
    /// from the degraded anchor was not found either.
    #[error(
        "Selection could not be matched to the source (searched {searched_length} chars starting with {first_chars:?})"
    )]
    AnchorDegraded {
        searched_length: usize,
        first_chars: String,
    },

    /// None of the matching tiers located the text to replace.
    #[error("Text not found in file (searched {searched_length} chars starting with {first_chars:?})")]
    PatchNotFound {
        searched_length: usize,
        first_chars: String,
    },

    /// The proposed text would corrupt downstream rendering.
    #[error("Unsafe edit: {0}")]
    UnsafeEdit(String),

    /// The change is too large to keep in the undo history.
    #[error("Change too large ({size} chars) to store in undo history. Limit: {limit}")]
    HistoryOverflow { size: usize, limit: usize },

    /// Failure talking to the model provider or the document store.
    #[error("Transport error{}: {message}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// A request that is missing required fields.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The model asked for a tool that does not exist.
    #[error("Function '{name}' not found. Available functions: {}", .available.join(", "))]
    UnknownTool {
        name: String,
        available: Vec<String>,
    },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuillError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a PatchNotFound error carrying a short prefix of the search text.
    pub fn patch_not_found(searched: &str) -> Self {
        Self::PatchNotFound {
            searched_length: searched.chars().count(),
            first_chars: searched.chars().take(50).collect(),
        }
    }

    /// Creates an UnsafeEdit error
    pub fn unsafe_edit(message: impl Into<String>) -> Self {
        Self::UnsafeEdit(message.into())
    }

    /// Creates a Transport error
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// Creates an InvalidRequest error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Re-labels a `PatchNotFound` as `AnchorDegraded`, keeping the diagnostics.
    ///
    /// Any other variant is returned untouched.
    pub fn into_anchor_degraded(self) -> Self {
        match self {
            Self::PatchNotFound {
                searched_length,
                first_chars,
            } => Self::AnchorDegraded {
                searched_length,
                first_chars,
            },
            other => other,
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a PatchNotFound error
    pub fn is_patch_not_found(&self) -> bool {
        matches!(self, Self::PatchNotFound { .. })
    }

    /// Check if this is an AnchorDegraded error
    pub fn is_anchor_degraded(&self) -> bool {
        matches!(self, Self::AnchorDegraded { .. })
    }

    /// Check if this is an UnsafeEdit error
    pub fn is_unsafe_edit(&self) -> bool {
        matches!(self, Self::UnsafeEdit(_))
    }

    /// Check if this is a HistoryOverflow error
    pub fn is_history_overflow(&self) -> bool {
        matches!(self, Self::HistoryOverflow { .. })
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true for the failures that must always be shown to the user.
    ///
    /// Anchor degradation on its own and a missing outline are recovered
    /// locally and never reach this check.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::AnchorDegraded { .. }
                | Self::PatchNotFound { .. }
                | Self::UnsafeEdit(_)
                | Self::Transport { .. }
                | Self::InvalidRequest(_)
                | Self::UnknownTool { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for QuillError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for QuillError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for QuillError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for QuillError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<regex::Error> for QuillError {
    fn from(err: regex::Error) -> Self {
        Self::Internal(format!("regex: {err}"))
    }
}

/// Conversion from anyhow::Error (transitional, should be removed eventually)
impl From<anyhow::Error> for QuillError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Conversion from String (for error messages)
impl From<String> for QuillError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, QuillError>`.
pub type Result<T> = std::result::Result<T, QuillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_not_found_keeps_a_short_prefix() {
        let long = "x".repeat(120);
        match QuillError::patch_not_found(&long) {
            QuillError::PatchNotFound {
                searched_length,
                first_chars,
            } => {
                assert_eq!(searched_length, 120);
                assert_eq!(first_chars.len(), 50);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn anchor_degraded_relabels_only_patch_not_found() {
        let relabeled = QuillError::patch_not_found("abc").into_anchor_degraded();
        assert!(relabeled.is_anchor_degraded());

        let untouched = QuillError::unsafe_edit("fence").into_anchor_degraded();
        assert!(untouched.is_unsafe_edit());
    }

    #[test]
    fn transport_display_includes_status_when_present() {
        let err = QuillError::transport(Some(401), "unauthorized");
        assert_eq!(err.to_string(), "Transport error (status 401): unauthorized");

        let err = QuillError::transport(None, "connection reset");
        assert_eq!(err.to_string(), "Transport error: connection reset");
    }

    #[test]
    fn unknown_tool_lists_available_functions() {
        let err = QuillError::UnknownTool {
            name: "delete_all".into(),
            available: vec!["update_text".into(), "replace_text".into()],
        };
        assert_eq!(
            err.to_string(),
            "Function 'delete_all' not found. Available functions: update_text, replace_text"
        );
    }
}
