//! MistralApiAgent - streaming client for the Mistral Chat Completions API.
//!
//! Configuration priority: ~/.config/quill/secret.json > environment variables.

use crate::sse::spawn_delta_stream;
use crate::transport::{ChatTransport, DeltaStream};
use async_trait::async_trait;
use futures::TryStreamExt;
use quill_core::chat::ChatMessage;
use quill_core::config::{ProviderConfig, SecretConfig};
use quill_core::{QuillError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Agent implementation that streams completions from the Mistral HTTP API.
#[derive(Clone)]
pub struct MistralApiAgent {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    idle_timeout: Duration,
}

impl MistralApiAgent {
    /// Creates an agent with the provider defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_provider(api_key, &ProviderConfig::default())
    }

    pub fn from_provider(api_key: impl Into<String>, provider: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_url: provider.api_url.clone(),
            model: provider.model.clone(),
            temperature: provider.temperature,
            max_tokens: provider.max_tokens,
            idle_timeout: Duration::from_secs(provider.idle_timeout_secs),
        }
    }

    /// Builds an agent from loaded secrets.
    ///
    /// A model name in the secrets overrides the configured model.
    pub fn try_from_secrets(secrets: &SecretConfig, provider: &ProviderConfig) -> Result<Self> {
        let mistral = secrets.mistral.as_ref().ok_or_else(|| {
            QuillError::config(
                "MISTRAL_API_KEY not found in ~/.config/quill/secret.json or environment variables",
            )
        })?;

        let agent = Self::from_provider(mistral.api_key.clone(), provider);
        Ok(match &mistral.model_name {
            Some(model) => agent.with_model(model.clone()),
            None => agent,
        })
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: true,
        }
    }
}

#[async_trait]
impl ChatTransport for MistralApiAgent {
    async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<DeltaStream> {
        tracing::debug!(url = %self.api_url, model = %self.model, messages = messages.len(), "POST (chat)");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|err| QuillError::transport(None, format!("Mistral API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Mistral error body".to_string());
            return Err(map_http_error(status, &body));
        }

        let bytes = response.bytes_stream().map_err(|err| err.to_string());
        Ok(spawn_delta_stream(bytes, self.idle_timeout))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn map_http_error(status: StatusCode, body: &str) -> QuillError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|wrapper| wrapper.error.map(|e| e.message).or(wrapper.message))
        .unwrap_or_else(|| {
            format!(
                "Mistral API error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )
        });
    QuillError::transport(Some(status.as_u16()), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::config::MistralConfig;

    #[test]
    fn request_body_matches_the_wire_shape() {
        let agent = MistralApiAgent::new("key");
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let body = serde_json::to_value(agent.request_body(&messages)).unwrap();

        assert_eq!(body["model"], "mistral-small-latest");
        assert_eq!(body["stream"], true);
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["messages"][1], serde_json::json!({ "role": "user", "content": "hi" }));
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn secrets_model_overrides_config() {
        let secrets = SecretConfig {
            mistral: Some(MistralConfig {
                api_key: "key".into(),
                model_name: Some("mistral-large-latest".into()),
            }),
        };
        let agent = MistralApiAgent::try_from_secrets(&secrets, &ProviderConfig::default()).unwrap();
        assert_eq!(agent.model(), "mistral-large-latest");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let result = MistralApiAgent::try_from_secrets(&SecretConfig::default(), &ProviderConfig::default());
        assert!(matches!(result, Err(QuillError::Config(_))));
    }

    #[test]
    fn http_errors_carry_status_and_provider_message() {
        let err = map_http_error(StatusCode::UNAUTHORIZED, r#"{"message":"Unauthorized"}"#);
        assert_eq!(err.to_string(), "Transport error (status 401): Unauthorized");

        let err = map_http_error(StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(
            err.to_string(),
            "Transport error (status 502): Mistral API error: 502 Bad Gateway"
        );
    }
}
