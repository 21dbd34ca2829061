//! Unified path management for quill configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/quill/             # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys
//! ```

use quill_core::{QuillError, Result};
use std::path::PathBuf;

pub struct QuillPaths;

impl QuillPaths {
    const APP_DIR: &'static str = "quill";

    /// Returns the quill configuration directory (e.g. `~/.config/quill/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or_else(|| QuillError::config("Cannot find home directory"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("secret.json"))
    }
}
