//! JSON parsing helpers for AI responses
//!
//! Models often wrap the JSON payload in prose; these helpers locate and
//! extract it. Batch arrays are parsed entry by entry so a single malformed
//! entry does not discard the rest of the response.

use crate::error::{Error, Result};

use super::types::{AiBatchEntry, AiTaxonomyResponse};

fn truncate(s: &str) -> String {
    if s.len() > 200 {
        format!("{}...", &s[..200])
    } else {
        s.to_string()
    }
}

/// Parse a single-item classification from an AI response.
pub fn parse_taxonomy_response(response: &str) -> Result<AiTaxonomyResponse> {
    let response = response.trim();

    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            serde_json::from_str(json_str).map_err(|e| {
                Error::InvalidData(format!(
                    "Invalid JSON from AI: {} | Raw: {}",
                    e,
                    truncate(json_str)
                ))
            })
        }
        _ => Err(Error::InvalidData(format!(
            "No JSON found in AI response | Raw: {}",
            truncate(response)
        ))),
    }
}

/// Parse a batch classification array from an AI response.
///
/// Entries that fail to deserialize individually are skipped rather than
/// failing the whole array; the caller fills the gaps from the rule-based
/// path.
pub fn parse_batch_entries(response: &str) -> Result<Vec<AiBatchEntry>> {
    let response = response.trim();

    let start = response.find('[');
    let end = response.rfind(']');

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            let values: Vec<serde_json::Value> = serde_json::from_str(json_str).map_err(|e| {
                Error::InvalidData(format!(
                    "Invalid JSON array from AI: {} | Raw: {}",
                    e,
                    truncate(json_str)
                ))
            })?;

            Ok(values
                .into_iter()
                .filter_map(|value| serde_json::from_value(value).ok())
                .collect())
        }
        _ => Err(Error::InvalidData(format!(
            "No JSON array found in AI batch response | Raw: {}",
            truncate(response)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_taxonomy_response() {
        let response = r#"{"taxonomy": "coffee", "confidence": 0.92, "reason": "espresso bar"}"#;
        let result = parse_taxonomy_response(response).unwrap();
        assert_eq!(result.taxonomy, "coffee");
        assert!(result.confidence > 0.9);
        assert_eq!(result.reason, "espresso bar");
    }

    #[test]
    fn test_parse_taxonomy_response_with_surrounding_text() {
        let response = "Here is my answer:\n{\"taxonomy\": \"dining\", \"confidence\": 0.8, \"reason\": \"pizzeria\"}\nDone!";
        let result = parse_taxonomy_response(response).unwrap();
        assert_eq!(result.taxonomy, "dining");
    }

    #[test]
    fn test_parse_taxonomy_response_missing_reason() {
        let response = r#"{"taxonomy": "gas", "confidence": 0.7}"#;
        let result = parse_taxonomy_response(response).unwrap();
        assert_eq!(result.reason, "");
    }

    #[test]
    fn test_parse_taxonomy_response_no_json() {
        assert!(parse_taxonomy_response("I cannot classify this").is_err());
    }

    #[test]
    fn test_parse_batch_entries() {
        let response = r#"[
            {"index": 1, "taxonomy": "coffee", "confidence": 0.9},
            {"index": 3, "taxonomy": "gas", "confidence": 0.8}
        ]"#;
        let entries = parse_batch_entries(response).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[1].taxonomy, "gas");
    }

    #[test]
    fn test_parse_batch_skips_malformed_entries() {
        let response = r#"[
            {"index": 1, "taxonomy": "coffee", "confidence": 0.9},
            {"index": "two", "taxonomy": "gas"},
            {"index": 3, "taxonomy": "dining", "confidence": 0.7}
        ]"#;
        let entries = parse_batch_entries(response).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[1].index, 3);
    }

    #[test]
    fn test_parse_batch_no_array() {
        assert!(parse_batch_entries(r#"{"index": 1}"#).is_err());
    }
}
