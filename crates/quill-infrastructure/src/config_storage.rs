//! Loading of `config.toml`.

use crate::paths::QuillPaths;
use quill_core::config::QuillConfig;
use quill_core::{QuillError, Result};
use std::path::Path;
use tokio::fs;

/// Loads the configuration from the default location.
///
/// A missing file yields the defaults.
pub async fn load_config() -> Result<QuillConfig> {
    load_config_from(&QuillPaths::config_file()?).await
}

/// Loads the configuration from `path`.
///
/// # Returns
///
/// - `Ok(QuillConfig)`: Parsed configuration, or defaults when the file does
///   not exist or is empty
/// - `Err(Serialization)`: The file exists but is not valid TOML
/// - `Err(Io)`: The file exists but could not be read
pub async fn load_config_from(path: &Path) -> Result<QuillConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(QuillConfig::default());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| QuillError::io(format!("Failed to read config file at {}: {}", path.display(), e)))?;

    if content.trim().is_empty() {
        return Ok(QuillConfig::default());
    }

    let config: QuillConfig = toml::from_str(&content)?;
    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}
