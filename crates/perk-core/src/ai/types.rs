//! AI provider wire types
//!
//! These types are provider-agnostic and used across all backend
//! implementations.

use serde::{Deserialize, Serialize};

/// Prompt pair sent to a provider.
///
/// The system prompt carries the fixed, enumeration-constrained
/// instructions; the user prompt carries the business details.
#[derive(Debug, Clone, Serialize)]
pub struct AIRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Expected single-item response: one JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiTaxonomyResponse {
    pub taxonomy: String,
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
}

/// One entry of a batch response array, keyed by the 1-based item index
/// from the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiBatchEntry {
    pub index: usize,
    pub taxonomy: String,
    pub confidence: f64,
}
