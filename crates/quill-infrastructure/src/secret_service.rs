//! Secret service implementation.
//!
//! Reads `secret.json` and fills in anything it lacks from the
//! `MISTRAL_API_KEY` / `MISTRAL_MODEL_NAME` environment variables.

use crate::paths::QuillPaths;
use quill_core::config::{MistralConfig, SecretConfig};
use quill_core::secret::SecretService;
use quill_core::{QuillError, Result};
use std::path::PathBuf;
use tokio::fs;

pub const API_KEY_ENV: &str = "MISTRAL_API_KEY";
pub const MODEL_NAME_ENV: &str = "MISTRAL_MODEL_NAME";

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct SecretServiceImpl {
    path: PathBuf,
    env: EnvLookup,
}

impl SecretServiceImpl {
    /// Uses `~/.config/quill/secret.json` and the process environment.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(QuillPaths::secret_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Replaces the environment lookup.
    pub fn with_env(mut self, env: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    async fn read_file(&self) -> Result<SecretConfig> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(SecretConfig::default());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| QuillError::io(format!("Failed to read secret file: {}", e)))?;
        if content.trim().is_empty() {
            return Ok(SecretConfig::default());
        }

        // Parse errors can echo input, so only the location is reported.
        serde_json::from_str(&content).map_err(|e| QuillError::Serialization {
            format: "JSON".to_string(),
            message: format!(
                "Failed to parse {} at line {}, column {}",
                self.path.display(),
                e.line(),
                e.column()
            ),
        })
    }

    fn apply_env(&self, mut secrets: SecretConfig) -> SecretConfig {
        let file_key = secrets
            .mistral
            .as_ref()
            .map(|m| m.api_key.clone())
            .filter(|k| !k.is_empty());

        let api_key = file_key.or_else(|| (self.env)(API_KEY_ENV).filter(|k| !k.is_empty()));
        let Some(api_key) = api_key else {
            return secrets;
        };

        let model_name = secrets
            .mistral
            .as_ref()
            .and_then(|m| m.model_name.clone())
            .or_else(|| (self.env)(MODEL_NAME_ENV));

        secrets.mistral = Some(MistralConfig {
            api_key,
            model_name,
        });
        secrets
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        let secrets = self.read_file().await?;
        let secrets = self.apply_env(secrets);
        tracing::debug!(
            has_mistral = secrets.mistral.is_some(),
            "Loaded secret configuration"
        );
        Ok(secrets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[tokio::test]
    async fn file_takes_precedence_over_env() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        fs::write(&path, r#"{"mistral":{"api_key":"from-file"}}"#)
            .await
            .unwrap();

        let service = SecretServiceImpl::with_path(&path).with_env(|key| match key {
            API_KEY_ENV => Some("from-env".into()),
            MODEL_NAME_ENV => Some("mistral-large-latest".into()),
            _ => None,
        });
        let mistral = service.load_secrets().await.unwrap().mistral.unwrap();
        assert_eq!(mistral.api_key, "from-file");
        assert_eq!(mistral.model_name.as_deref(), Some("mistral-large-latest"));
    }

    #[tokio::test]
    async fn env_fills_in_a_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::with_path(temp_dir.path().join("secret.json"))
            .with_env(|key| (key == API_KEY_ENV).then(|| "from-env".to_string()));

        let mistral = service.load_secrets().await.unwrap().mistral.unwrap();
        assert_eq!(mistral.api_key, "from-env");
        assert!(mistral.model_name.is_none());
    }

    #[tokio::test]
    async fn nothing_configured_yields_no_provider() {
        let temp_dir = TempDir::new().unwrap();
        let service =
            SecretServiceImpl::with_path(temp_dir.path().join("secret.json")).with_env(no_env);
        assert!(service.load_secrets().await.unwrap().mistral.is_none());
    }

    #[tokio::test]
    async fn malformed_file_does_not_leak_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        fs::write(&path, r#"{"mistral":{"api_key":"sk-secret""#)
            .await
            .unwrap();

        let err = SecretServiceImpl::with_path(&path)
            .with_env(no_env)
            .load_secrets()
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("sk-secret"));
    }
}
