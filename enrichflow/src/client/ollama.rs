//! Ollama-backed generation client.

use super::{GenerationClient, GenerationRequest};
use crate::config::GenerationConfig;
use crate::errors::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Client for an Ollama-style generate endpoint.
///
/// Speaks the non-streaming protocol: POST the model, prompt, and token
/// budget; read the completed text from the `response` field.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: GenerationConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaClient {
    /// Creates a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Unavailable`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                GenerationError::unavailable(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { config, client })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }
}

#[async_trait]
impl GenerationClient for OllamaClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = OllamaRequest {
            model: &request.model,
            prompt: &request.prompt,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::unavailable(format!("request timed out: {e}"))
                } else {
                    GenerationError::unavailable(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(GenerationError::rejected_with_status(status.as_u16(), text));
        }

        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::rejected(format!("malformed service reply: {e}")))?;

        Ok(parsed.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let body = OllamaRequest {
            model: "phi4:latest",
            prompt: "Classify this item",
            max_tokens: 200,
            stream: false,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "phi4:latest",
                "prompt": "Classify this item",
                "max_tokens": 200,
                "stream": false
            })
        );
    }

    #[test]
    fn test_response_wire_shape() {
        let parsed: OllamaResponse =
            serde_json::from_str(r#"{"response": " fashion|confidence:92% "}"#).unwrap();
        assert_eq!(parsed.response, " fashion|confidence:92% ");
    }

    #[test]
    fn test_client_builds_from_default_config() {
        let client = OllamaClient::new(GenerationConfig::default()).unwrap();
        assert_eq!(
            client.config().endpoint,
            "http://127.0.0.1:11434/api/generate"
        );
    }
}
