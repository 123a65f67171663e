//! Merchant matcher
//!
//! Orchestrates the category code map, brand/chain detection, and the
//! rule-based classifier into one richly annotated match result. Precedence
//! is fixed and auditable: category code first, then brand detection from
//! the name, then keyword fallback, then a small alias confidence boost. A
//! later, lower-authority step never silently lowers confidence, and every
//! contributing step appends a human-readable note.

use tracing::debug;

use crate::brands::BrandRegistry;
use crate::classifier::{ClassifierConfig, RuleBasedClassifier};
use crate::error::Result;
use crate::mcc::{CategoryCodeMap, UNBRANDED};
use crate::models::{BestMatch, MerchantMatchResult};
use crate::normalize::{canonicalize, find_best_match, is_canonical_key, normalize, similarity};
use crate::taxonomy::Taxonomy;

/// Confidence assigned to a category-code match.
const CODE_CONFIDENCE: f64 = 0.95;
/// Boost when an alias resolved to a different canonical name.
const ALIAS_BOOST: f64 = 0.1;
/// Boost when the canonical name is a recognized well-known business.
const KNOWN_BUSINESS_BOOST: f64 = 0.05;

pub struct MerchantMatcher {
    brands: BrandRegistry,
    codes: CategoryCodeMap,
    classifier: RuleBasedClassifier,
}

impl MerchantMatcher {
    pub fn new() -> Result<Self> {
        Self::with_config(ClassifierConfig::default())
    }

    pub fn with_config(config: ClassifierConfig) -> Result<Self> {
        Ok(Self {
            brands: BrandRegistry::new(),
            codes: CategoryCodeMap::new(),
            classifier: RuleBasedClassifier::with_config(config)?,
        })
    }

    /// Match a merchant name (and optional category code) into the
    /// brand-aware taxonomy space.
    pub fn match_merchant(&self, name: &str, mcc: Option<u16>) -> MerchantMatchResult {
        let normalized = normalize(name);
        let canonical = canonicalize(name);

        let mut result = MerchantMatchResult {
            original_name: name.to_string(),
            normalized_name: normalized.clone(),
            taxonomy: Taxonomy::DEFAULT,
            confidence: 0.0,
            hotel_brand: None,
            airline_brand: None,
            code_based: false,
            notes: Vec::new(),
        };

        // 1. Category code: the primary-authority signal when present.
        if let Some(code) = mcc {
            if let Some(taxonomy) = self.codes.lookup(code) {
                result.taxonomy = taxonomy;
                result.confidence = CODE_CONFIDENCE;
                result.code_based = true;
                result.notes.push(format!("MCC {} mapped to {}", code, taxonomy));

                if let Some(hotel) = self.codes.hotel_brand_for_code(code) {
                    result
                        .notes
                        .push(format!("Hotel brand {} resolved from MCC {}", hotel, code));
                    result.hotel_brand = Some(hotel.to_string());
                }
                if let Some(airline) = self.codes.airline_brand_for_code(code) {
                    result
                        .notes
                        .push(format!("Airline brand {} resolved from MCC {}", airline, code));
                    result.airline_brand = Some(airline.to_string());
                }
            } else {
                result.notes.push(format!("MCC {} not recognized", code));
            }
        }

        // 2. Brand/chain detection from the name. A specific code-derived
        // brand is never overridden by the weaker name-based guess.
        let mut brand_matched = false;
        if let Some(brand) = self.brands.find(name) {
            brand_matched = true;
            match brand.taxonomy {
                Taxonomy::Hotels => {
                    let code_brand_is_specific = result
                        .hotel_brand
                        .as_deref()
                        .map(|b| b != UNBRANDED)
                        .unwrap_or(false);
                    if !code_brand_is_specific {
                        result
                            .notes
                            .push(format!("Hotel brand {} detected from name", brand.id));
                        result.hotel_brand = Some(brand.id.to_string());
                    }
                    if !result.code_based {
                        result.taxonomy = Taxonomy::Hotels;
                        result.confidence = result.confidence.max(1.0);
                        result.notes.push(format!("Brand {} classified as hotels", brand.id));
                    } else if result.taxonomy.is_travel_family() {
                        if result.taxonomy != Taxonomy::Hotels {
                            result
                                .notes
                                .push(format!("Generic {} upgraded to hotels", result.taxonomy));
                            result.taxonomy = Taxonomy::Hotels;
                        }
                        result.confidence = result.confidence.max(1.0);
                    }
                }
                Taxonomy::Flights => {
                    let code_brand_is_specific = result
                        .airline_brand
                        .as_deref()
                        .map(|b| b != UNBRANDED)
                        .unwrap_or(false);
                    if !code_brand_is_specific {
                        result
                            .notes
                            .push(format!("Airline brand {} detected from name", brand.id));
                        result.airline_brand = Some(brand.id.to_string());
                    }
                    if !result.code_based {
                        result.taxonomy = Taxonomy::Flights;
                        result.confidence = result.confidence.max(1.0);
                        result.notes.push(format!("Brand {} classified as flights", brand.id));
                    } else if result.taxonomy.is_travel_family() {
                        if result.taxonomy != Taxonomy::Flights {
                            result
                                .notes
                                .push(format!("Generic {} upgraded to flights", result.taxonomy));
                            result.taxonomy = Taxonomy::Flights;
                        }
                        result.confidence = result.confidence.max(1.0);
                    }
                }
                other => {
                    if !result.code_based {
                        result.taxonomy = other;
                        result.confidence = result.confidence.max(1.0);
                        result
                            .notes
                            .push(format!("Brand {} matched, classified as {}", brand.id, other));
                    } else if other.matches_family(result.taxonomy)
                        || result.taxonomy.matches_family(other)
                    {
                        result.confidence = result.confidence.max(1.0);
                        result
                            .notes
                            .push(format!("Brand {} confirms MCC taxonomy", brand.id));
                    } else {
                        result.notes.push(format!(
                            "Brand {} ({}) conflicts with MCC taxonomy {}, keeping code",
                            brand.id, other, result.taxonomy
                        ));
                    }
                }
            }
        }

        // 3. Keyword fallback, only when neither code nor brand decided.
        if !result.code_based && !brand_matched {
            let fallback = self.classifier.classify(name, &[], None);
            result.taxonomy = fallback.taxonomy;
            result.confidence = result.confidence.max(fallback.confidence);
            if fallback.taxonomy == Taxonomy::DEFAULT {
                result.notes.push("No signal, defaulted".to_string());
            } else {
                result
                    .notes
                    .push(format!("Keyword signal classified as {}", fallback.taxonomy));
            }
        }

        // 4. Alias confidence boost.
        if canonical != normalized {
            result.confidence = (result.confidence + ALIAS_BOOST).min(1.0);
            result
                .notes
                .push(format!("Alias resolved {} -> {}", normalized, canonical));
        } else if is_canonical_key(&canonical) {
            result.confidence = (result.confidence + KNOWN_BUSINESS_BOOST).min(1.0);
            result
                .notes
                .push(format!("Recognized well-known business {}", canonical));
        }

        debug!(
            name,
            taxonomy = %result.taxonomy,
            confidence = result.confidence,
            code_based = result.code_based,
            "merchant matched"
        );

        result
    }

    /// Taxonomy-only convenience over [`match_merchant`].
    ///
    /// [`match_merchant`]: MerchantMatcher::match_merchant
    pub fn best_category_for(&self, name: &str, mcc: Option<u16>) -> Taxonomy {
        self.match_merchant(name, mcc).taxonomy
    }

    /// Whether the merchant satisfies a reward rule targeting `target`,
    /// with the match confidence.
    ///
    /// Applies category-family widening: a named hotel brand satisfies the
    /// hotels family, and hotel/flight/rental-car results all satisfy the
    /// broader travel family.
    pub fn matches_category(&self, name: &str, target: Taxonomy, mcc: Option<u16>) -> (bool, f64) {
        let result = self.match_merchant(name, mcc);

        let mut matched = result.taxonomy.matches_family(target);
        if !matched {
            matched = match target {
                Taxonomy::Hotels => result.hotel_brand.is_some(),
                Taxonomy::Flights => result.airline_brand.is_some(),
                Taxonomy::Travel => {
                    result.hotel_brand.is_some() || result.airline_brand.is_some()
                }
                _ => false,
            };
        }

        (matched, result.confidence)
    }

    /// Match a list of `(name, code)` pairs independently, preserving input
    /// order. No cross-item state.
    pub fn match_batch(&self, items: &[(String, Option<u16>)]) -> Vec<MerchantMatchResult> {
        items
            .iter()
            .map(|(name, mcc)| self.match_merchant(name, *mcc))
            .collect()
    }

    /// Best fuzzy match for `target` among `candidates`.
    pub fn find_best_match(
        &self,
        target: &str,
        candidates: &[String],
        threshold: f64,
    ) -> BestMatch {
        find_best_match(target, candidates, threshold)
    }

    /// Edit-distance similarity between two names.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        similarity(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> MerchantMatcher {
        MerchantMatcher::new().unwrap()
    }

    #[test]
    fn test_code_authority() {
        let result = matcher().match_merchant("Unbranded Diner", Some(5812));
        assert_eq!(result.taxonomy, Taxonomy::Dining);
        assert_eq!(result.confidence, 0.95);
        assert!(result.code_based);
        assert!(result.notes.iter().any(|n| n == "MCC 5812 mapped to dining"));
    }

    #[test]
    fn test_hotel_code_resolves_brand() {
        let result = matcher().match_merchant("Downtown Lodging", Some(3509));
        assert_eq!(result.taxonomy, Taxonomy::Hotels);
        assert_eq!(result.hotel_brand.as_deref(), Some("marriott"));
        assert!(result.code_based);
    }

    #[test]
    fn test_airline_code_resolves_brand() {
        let result = matcher().match_merchant("Ticket Counter", Some(3058));
        assert_eq!(result.taxonomy, Taxonomy::Flights);
        assert_eq!(result.airline_brand.as_deref(), Some("delta"));
    }

    #[test]
    fn test_hotel_brand_from_name_without_code() {
        let result = matcher().match_merchant("Marriott Downtown Seattle", None);
        assert_eq!(result.taxonomy, Taxonomy::Hotels);
        assert_eq!(result.hotel_brand.as_deref(), Some("marriott"));
        assert_eq!(result.confidence, 1.0);
        assert!(result
            .notes
            .iter()
            .any(|n| n == "Hotel brand marriott detected from name"));
    }

    #[test]
    fn test_name_brand_fills_unbranded_hotel_code() {
        // 7011 is the generic lodging code; the name supplies the chain
        let result = matcher().match_merchant("Hilton Garden Inn", Some(7011));
        assert_eq!(result.taxonomy, Taxonomy::Hotels);
        assert_eq!(result.hotel_brand.as_deref(), Some("hilton"));
        assert!(result.code_based);
    }

    #[test]
    fn test_specific_code_brand_not_overridden_by_name() {
        // Code says Holiday Inn; a stray brand word in the name loses
        let result = matcher().match_merchant("Marriott Shuttle Stop", Some(3501));
        assert_eq!(result.hotel_brand.as_deref(), Some("holiday_inn"));
        assert!(result.code_based);
    }

    #[test]
    fn test_keyword_fallback_without_code_or_brand() {
        let result = matcher().match_merchant("Tony's Pizzeria", None);
        assert_eq!(result.taxonomy, Taxonomy::Dining);
        assert!(result.confidence >= 0.6);
        assert!(!result.code_based);
    }

    #[test]
    fn test_alias_boost() {
        // "The Pig" resolves through the alias table; confidence gets +0.1
        let result = matcher().match_merchant("The Pig", None);
        assert!(result
            .notes
            .iter()
            .any(|n| n.starts_with("Alias resolved")));
        assert!((result.confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_known_business_boost() {
        let result = matcher().match_merchant("Piggly Wiggly", None);
        assert!(result
            .notes
            .iter()
            .any(|n| n.starts_with("Recognized well-known business")));
        assert!((result.confidence - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_best_category_for() {
        let m = matcher();
        assert_eq!(m.best_category_for("Shell Gas Station", None), Taxonomy::Gas);
        assert_eq!(m.best_category_for("Anything", Some(5912)), Taxonomy::Pharmacy);
    }

    #[test]
    fn test_matches_category_family_widening() {
        let m = matcher();

        let (hotels_match, _) = m.matches_category("Marriott Downtown", Taxonomy::Hotels, None);
        assert!(hotels_match);

        let (travel_match, confidence) =
            m.matches_category("Marriott Downtown", Taxonomy::Travel, None);
        assert!(travel_match);
        assert_eq!(confidence, 1.0);

        let (flight_travel, _) = m.matches_category("Delta Air Lines", Taxonomy::Travel, None);
        assert!(flight_travel);

        let (dining_match, _) = m.matches_category("Marriott Downtown", Taxonomy::Dining, None);
        assert!(!dining_match);
    }

    #[test]
    fn test_match_batch_preserves_order() {
        let m = matcher();
        let items = vec![
            ("Starbucks".to_string(), None),
            ("Unbranded Diner".to_string(), Some(5812)),
            ("Acme Corp".to_string(), None),
        ];
        let results = m.match_batch(&items);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].taxonomy, Taxonomy::Coffee);
        assert_eq!(results[1].taxonomy, Taxonomy::Dining);
        assert_eq!(results[2].taxonomy, Taxonomy::EverythingElse);
    }

    #[test]
    fn test_notes_record_every_contributing_step() {
        let result = matcher().match_merchant("Starbucks Reserve", Some(5814));
        // Code step and brand step both contributed
        assert!(result.notes.iter().any(|n| n.contains("MCC 5814")));
        assert!(result.notes.iter().any(|n| n.contains("starbucks")));
    }
}
