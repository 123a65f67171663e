//! Pluggable AI provider abstraction
//!
//! The AI client is an injected capability, never an ambient singleton: the
//! fallback classifier takes an optional [`AIClient`] handle and is fully
//! testable with the mock backend.
//!
//! - `AIProvider` trait: the single classify operation plus health/identity
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: [`OllamaBackend`], [`MockBackend`]

mod mock;
mod ollama;
pub mod parsing;
pub mod prompts;
pub mod types;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use types::{AIRequest, AiBatchEntry, AiTaxonomyResponse};

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for all AI providers
///
/// Providers should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Run one classification prompt and return the raw model text.
    async fn classify(&self, request: &AIRequest) -> Result<String>;

    /// Check if the provider is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for metrics)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `ollama` (default): Uses OLLAMA_HOST and OLLAMA_MODEL
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        match backend.to_lowercase().as_str() {
            "ollama" => OllamaBackend::from_env().map(AIClient::Ollama),
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to ollama");
                OllamaBackend::from_env().map(AIClient::Ollama)
            }
        }
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        AIClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

// Implement AIProvider for AIClient by delegating to the inner backend
#[async_trait]
impl AIProvider for AIClient {
    async fn classify(&self, request: &AIRequest) -> Result<String> {
        match self {
            AIClient::Ollama(b) => b.classify(request).await,
            AIClient::Mock(b) => b.classify(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AIClient::mock();
        assert!(client.health_check().await);
    }
}
