//! Ollama backend implementation
//!
//! HTTP client for the Ollama generate API. The system and user prompts are
//! concatenated into a single prompt, and the request carries a transport
//! timeout so a hung server surfaces as an ordinary error at the fallback
//! boundary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::types::AIRequest;
use super::AIProvider;

/// Default transport timeout for generate calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaBackend {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a new instance with a different model.
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: model.to_string(),
            timeout: self.timeout,
        }
    }

    /// Create a new instance with a different transport timeout.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            timeout,
        }
    }

    /// Create from environment variables.
    ///
    /// Requires `OLLAMA_HOST`; `OLLAMA_MODEL` defaults to llama3.2.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        Some(Self::new(&host, &model))
    }
}

/// Request to the Ollama generate API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from the Ollama generate API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl AIProvider for OllamaBackend {
    async fn classify(&self, request: &AIRequest) -> Result<String> {
        let ollama_request = OllamaRequest {
            model: self.model.clone(),
            prompt: format!("{}\n\n{}", request.system_prompt, request.user_prompt),
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.timeout)
            .json(&ollama_request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Http(response.error_for_status().unwrap_err()));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        debug!(model = %self.model, "Ollama response: {}", ollama_response.response);

        Ok(ollama_response.response)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self
            .http_client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_trailing_slash() {
        let backend = OllamaBackend::new("http://localhost:11434/", "llama3.2");
        assert_eq!(backend.host(), "http://localhost:11434");
    }

    #[test]
    fn test_with_model() {
        let backend = OllamaBackend::new("http://localhost:11434", "llama3.2");
        let other = backend.with_model("gemma3");
        assert_eq!(other.model(), "gemma3");
        assert_eq!(backend.model(), "llama3.2");
    }

    #[tokio::test]
    async fn test_health_check_fails_without_server() {
        let backend = OllamaBackend::new("http://127.0.0.1:9", "llama3.2")
            .with_timeout(Duration::from_millis(200));
        assert!(!backend.health_check().await);
    }
}
