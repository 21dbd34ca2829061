//! Configuration model.
//!
//! `QuillConfig` is read from `config.toml`; every field has a default so a
//! missing or partial file still yields a usable configuration. Secrets live
//! apart from it in `secret.json`.

use crate::history::{DEFAULT_HISTORY_CAPACITY, DEFAULT_MAX_ENTRY_CHARS};
use crate::structure::DEFAULT_MAX_PREVIEW_CHARS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mistral-small-latest";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct QuillConfig {
    pub document: DocumentConfig,
    pub provider: ProviderConfig,
    pub outline: OutlineConfig,
    pub history: HistoryConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DocumentConfig {
    pub path: PathBuf,
    /// Rewrite CRLF as LF on every save.
    pub normalize_line_endings: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("manual.mmd"),
            normalize_line_endings: true,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Seconds without a streamed chunk before the request is abandoned.
    pub idle_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            idle_timeout_secs: 60,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct OutlineConfig {
    pub max_preview_chars: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            max_preview_chars: DEFAULT_MAX_PREVIEW_CHARS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
    pub max_entry_chars: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            max_entry_chars: DEFAULT_MAX_ENTRY_CHARS,
        }
    }
}

/// Root structure of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default)]
    pub mistral: Option<MistralConfig>,
}

/// Mistral API credentials.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MistralConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}
