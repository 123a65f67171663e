//! Mock provider for testing
//!
//! Returns predictable responses without a running LLM server. Responses
//! can be pinned with [`MockBackend::with_response`], forced to fail with
//! [`MockBackend::failing`], or left to the keyword-driven defaults that
//! mimic what a cooperative model would answer.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::prompts::BATCH_HEADER;
use super::types::AIRequest;
use super::AIProvider;

#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    canned: Option<String>,
    fail: bool,
}

impl MockBackend {
    /// Healthy mock with keyword-driven default responses.
    pub fn new() -> Self {
        Self {
            healthy: true,
            canned: None,
            fail: false,
        }
    }

    /// Mock that always returns the given response text.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            healthy: true,
            canned: Some(response.into()),
            fail: false,
        }
    }

    /// Mock whose classify call always errors.
    pub fn failing() -> Self {
        Self {
            healthy: true,
            canned: None,
            fail: true,
        }
    }

    /// Mock that reports itself unavailable.
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            canned: None,
            fail: false,
        }
    }
}

/// Keyword-driven default answer, the way a cooperative model would reply.
fn taxonomy_for(text: &str) -> (&'static str, f64) {
    let t = text.to_lowercase();
    if t.contains("starbucks") || t.contains("coffee") || t.contains("cafe") {
        ("coffee", 0.9)
    } else if t.contains("restaurant")
        || t.contains("diner")
        || t.contains("pizza")
        || t.contains("grill")
    {
        ("dining", 0.9)
    } else if t.contains("grocery") || t.contains("market") || t.contains("foods") {
        ("groceries", 0.85)
    } else if t.contains("gas") || t.contains("fuel") || t.contains("shell") {
        ("gas", 0.85)
    } else if t.contains("hotel")
        || t.contains("lodging")
        || t.contains("marriott")
        || t.contains("hilton")
    {
        ("hotels", 0.9)
    } else if t.contains("pharmacy") || t.contains("cvs") || t.contains("walgreens") {
        ("pharmacy", 0.9)
    } else if t.contains("airline") || t.contains("flight") {
        ("flights", 0.85)
    } else {
        ("everything_else", 0.75)
    }
}

fn single_response(user_prompt: &str) -> String {
    let (taxonomy, confidence) = taxonomy_for(user_prompt);
    format!(
        r#"{{"taxonomy": "{}", "confidence": {}, "reason": "mock classification"}}"#,
        taxonomy, confidence
    )
}

fn batch_response(user_prompt: &str) -> String {
    let mut entries = Vec::new();
    for line in user_prompt.lines() {
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

#[async_trait]
impl AIProvider for MockBackend {
    async fn classify(&self, request: &AIRequest) -> Result<String> {
        if self.fail {
            return Err(Error::Backend("mock backend configured to fail".into()));
        }
        if let Some(canned) = &self.canned {
            return Ok(canned.clone());
        }

        if request.user_prompt.contains(BATCH_HEADER) {
            Ok(batch_response(&request.user_prompt))
        } else {
            Ok(single_response(&request.user_prompt))
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::parsing::{parse_batch_entries, parse_taxonomy_response};

    fn request(user_prompt: &str) -> AIRequest {
        AIRequest {
            system_prompt: "classify".to_string(),
            user_prompt: user_prompt.to_string(),
        }
    }

    #[tokio::test]
    async fn test_single_keyword_response() {
        let mock = MockBackend::new();
        let text = mock
            .classify(&request("Business: Corner Coffee Shop"))
            .await
            .unwrap();
        let parsed = parse_taxonomy_response(&text).unwrap();
        assert_eq!(parsed.taxonomy, "coffee");
    }

    #[tokio::test]
    async fn test_batch_response_covers_indices() {
        let mock = MockBackend::new();
        let prompt = format!(
            "{}:\n1. Corner Coffee Shop\n2. Quick Fuel Stop | tags: gas_station",
            BATCH_HEADER
        );
        let text = mock.classify(&request(&prompt)).await.unwrap();
        let entries = parse_batch_entries(&text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[0].taxonomy, "coffee");
        assert_eq!(entries[1].taxonomy, "gas");
    }

    #[tokio::test]
    async fn test_canned_response() {
        let mock = MockBackend::with_response(r#"{"taxonomy": "hotels", "confidence": 1.0}"#);
        let text = mock.classify(&request("anything")).await.unwrap();
        assert!(text.contains("hotels"));
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockBackend::failing();
        assert!(mock.classify(&request("anything")).await.is_err());
    }

    #[tokio::test]
    async fn test_health() {
        assert!(MockBackend::new().health_check().await);
        assert!(!MockBackend::unhealthy().health_check().await);
    }
}
