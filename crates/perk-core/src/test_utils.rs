//! Test utilities for perk-core
//!
//! Provides a mock taxonomy LLM server speaking the Ollama generate API, so
//! the full fallback path (HTTP round trip included) can be exercised in
//! integration tests without a running model.

use axum::{
    extract::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

use crate::ai::prompts::BATCH_HEADER;

/// Mock taxonomy server for testing and development
pub struct MockTaxonomyServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockTaxonomyServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockTaxonomyServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Tags endpoint response (health check)
async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: vec![ModelInfo {
            name: "llama3.2:latest".to_string(),
            modified_at: "2024-01-01T00:00:00Z".to_string(),
            size: 4_000_000_000,
        }],
    })
}

/// Generate endpoint: answers classification prompts by keyword, the way a
/// cooperative model would
async fn handle_generate(Json(request): Json<GenerateRequest>) -> Json<GenerateResponse> {
    let response = if request.prompt.contains(BATCH_HEADER) {
        batch_response(&request.prompt)
    } else {
        single_response(&request.prompt)
    };

    Json(GenerateResponse {
        model: request.model,
        response,
        done: true,
    })
}

fn taxonomy_for(text: &str) -> (&'static str, f64) {
    let t = text.to_lowercase();
    if t.contains("coffee") || t.contains("cafe") || t.contains("espresso") {
        ("coffee", 0.92)
    } else if t.contains("restaurant") || t.contains("pizza") || t.contains("grill") {
        ("dining", 0.9)
    } else if t.contains("market") || t.contains("grocery") {
        ("groceries", 0.88)
    } else if t.contains("hotel") || t.contains("lodging") {
        ("hotels", 0.9)
    } else if t.contains("gas") || t.contains("fuel") {
        ("gas", 0.88)
    } else {
        ("everything_else", 0.7)
    }
}

fn single_response(prompt: &str) -> String {
    // Classify based on the business line of the user prompt
    let business = prompt
        .lines()
        .find(|l| l.starts_with("Business: "))
        .unwrap_or(prompt);
    let (taxonomy, confidence) = taxonomy_for(business);
    format!(
        r#"{{"taxonomy": "{}", "confidence": {}, "reason": "mock server"}}"#,
        taxonomy, confidence
    )
}

fn batch_response(prompt: &str) -> String {
    let mut entries = Vec::new();
    for line in prompt.lines() {
        let line = line.trim();
        let Some((number, rest)) = line.split_once(". ") else {
            continue;
        };
        let Ok(index) = number.parse::<usize>() else {
            continue;
        };
        let name = rest.split(" | ").next().unwrap_or(rest);
        let (taxonomy, confidence) = taxonomy_for(name);
        entries.push(format!(
            r#"{{"index": {}, "taxonomy": "{}", "confidence": {}}}"#,
            index, taxonomy, confidence
        ));
    }
    format!("[{}]", entries.join(", "))
}

/// Ollama generate request
#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
}

/// Ollama generate response
#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}

/// Tags response for health checks
#[derive(Debug, Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
    modified_at: String,
    size: u64,
}
