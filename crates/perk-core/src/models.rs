//! Shared data models produced and consumed by the classification engine

use serde::{Deserialize, Serialize};

use crate::taxonomy::Taxonomy;

/// Raw merchant/business record as delivered by the place-search layer.
///
/// Everything except the name is optional; the engine degrades gracefully
/// when provider tags, place text, or the category code are missing.
#[derive(Debug, Clone, Default)]
pub struct MerchantRecord {
    /// Raw business name as the provider returned it
    pub name: String,
    /// Provider-supplied type tags (e.g. "cafe", "lodging")
    pub provider_tags: Vec<String>,
    /// Free-form descriptive text about the place, when available
    pub place_text: Option<String>,
    /// Standardized merchant category code, when available
    pub mcc: Option<u16>,
    /// Street address, forwarded to the AI prompt for disambiguation
    pub address: Option<String>,
}

impl MerchantRecord {
    /// Convenience constructor for a name-only record.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Taxonomy decision with calibrated confidence and candidate codes.
///
/// Created fresh per call and owned by the caller; never mutated after
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub taxonomy: Taxonomy,
    /// Candidate merchant category codes for the chosen taxonomy; never empty
    pub mcc_candidates: Vec<u16>,
    /// Trust signal in [0, 1]; not a statistical probability
    pub confidence: f64,
    /// Set when a brand-registry match decided the taxonomy
    pub brand_id: Option<String>,
}

/// Richly annotated merchant match with an audit trail.
///
/// `notes` records which signal contributed at each precedence step. It is
/// required output (the only way to test *why* a decision was made), not
/// optional logging.
#[derive(Debug, Clone)]
pub struct MerchantMatchResult {
    pub original_name: String,
    pub normalized_name: String,
    pub taxonomy: Taxonomy,
    pub confidence: f64,
    /// Named hotel chain, when resolved from the code or the name
    pub hotel_brand: Option<String>,
    /// Named airline, when resolved from the code or the name
    pub airline_brand: Option<String>,
    /// True when the category code decided the taxonomy
    pub code_based: bool,
    pub notes: Vec<String>,
}

/// Outcome of a fuzzy best-match search over a candidate list.
///
/// When no candidate clears the threshold, `candidate`/`index` are `None`
/// but `score` still carries the best score seen, for diagnostics.
#[derive(Debug, Clone)]
pub struct BestMatch {
    pub candidate: Option<String>,
    pub score: f64,
    pub index: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_record() {
        let record = MerchantRecord::named("Blue Bottle");
        assert_eq!(record.name, "Blue Bottle");
        assert!(record.provider_tags.is_empty());
        assert!(record.mcc.is_none());
    }

    #[test]
    fn test_classification_serializes() {
        let c = Classification {
            taxonomy: Taxonomy::Coffee,
            mcc_candidates: vec![5814],
            confidence: 1.0,
            brand_id: Some("starbucks".to_string()),
        };
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"coffee\""));
        assert!(json.contains("5814"));
    }
}
