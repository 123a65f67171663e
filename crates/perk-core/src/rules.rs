//! Weighted keyword and provider-tag voting rules
//!
//! Rules are data, not code paths: each rule set is an ordered list of
//! `(pattern, taxonomy, weight)` records compiled once at construction, and
//! voting is a pure fold over that list. Multiple rules may fire on the same
//! text and add to the same taxonomy.
//!
//! Free-text keyword weights sit in the 0.3–0.6 band; provider type tags are
//! a more reliable structured signal and are tuned higher (0.55–0.9).

use std::collections::HashMap;

use regex::Regex;

use crate::error::Result;
use crate::taxonomy::Taxonomy;

/// Free-text keyword rules. Patterns are case-insensitive and word-boundary
/// anchored; the cafe pattern accepts the accented form.
const KEYWORD_RULES: &[(&str, Taxonomy, f64)] = &[
    (r"(?i)\bcoffee\b", Taxonomy::Coffee, 0.6),
    (r"(?i)\bcaf[e\u{e9}]\b", Taxonomy::Coffee, 0.5),
    (r"(?i)\bespresso\b", Taxonomy::Coffee, 0.5),
    (r"(?i)\broast(ery|ers?)\b", Taxonomy::Coffee, 0.4),
    (r"(?i)\brestaurant\b", Taxonomy::Dining, 0.6),
    (r"(?i)\bdiner\b", Taxonomy::Dining, 0.55),
    (r"(?i)\bpizz(a|eria)\b", Taxonomy::Dining, 0.55),
    (r"(?i)\bsushi\b", Taxonomy::Dining, 0.55),
    (r"(?i)\btaqueria\b", Taxonomy::Dining, 0.55),
    (r"(?i)\bgrill\b", Taxonomy::Dining, 0.5),
    (r"(?i)\btacos?\b", Taxonomy::Dining, 0.5),
    (r"(?i)\bburgers?\b", Taxonomy::Dining, 0.5),
    (r"(?i)\bdeli\b", Taxonomy::Dining, 0.5),
    (r"(?i)\bramen\b", Taxonomy::Dining, 0.5),
    (r"(?i)\bbistro\b", Taxonomy::Dining, 0.5),
    (r"(?i)\beatery\b", Taxonomy::Dining, 0.5),
    (r"(?i)\b(bbq|barbecue)\b", Taxonomy::Dining, 0.5),
    (r"(?i)\bkitchen\b", Taxonomy::Dining, 0.4),
    (r"(?i)\bbakery\b", Taxonomy::Dining, 0.4),
    (r"(?i)\bgrocer(y|ies|s)?\b", Taxonomy::Groceries, 0.6),
    (r"(?i)\bsupermarket\b", Taxonomy::Groceries, 0.6),
    (r"(?i)\bfoods?\b", Taxonomy::Groceries, 0.35),
    (r"(?i)\bmarket\b", Taxonomy::Groceries, 0.35),
    (r"(?i)\bfuel\b", Taxonomy::Gas, 0.5),
    (r"(?i)\bgas\b", Taxonomy::Gas, 0.45),
    (r"(?i)\bpetroleum\b", Taxonomy::Gas, 0.45),
    (r"(?i)\bpharmacy\b", Taxonomy::Pharmacy, 0.6),
    (r"(?i)\bdrug\s?store\b", Taxonomy::Pharmacy, 0.55),
    (r"(?i)\bcinema\b", Taxonomy::Entertainment, 0.55),
    (r"(?i)\btheat(er|re)\b", Taxonomy::Entertainment, 0.5),
    (r"(?i)\barcade\b", Taxonomy::Entertainment, 0.5),
    (r"(?i)\bbowling\b", Taxonomy::Entertainment, 0.5),
    (r"(?i)\bhotel\b", Taxonomy::Hotels, 0.6),
    (r"(?i)\bmotel\b", Taxonomy::Hotels, 0.55),
    (r"(?i)\bresort\b", Taxonomy::Hotels, 0.5),
    (r"(?i)\binn\b", Taxonomy::Hotels, 0.45),
    (r"(?i)\bsuites\b", Taxonomy::Hotels, 0.45),
    (r"(?i)\blodge\b", Taxonomy::Hotels, 0.4),
    (r"(?i)\bair\s?(lines?|ways)\b", Taxonomy::Flights, 0.6),
    (r"(?i)\bcar rental\b", Taxonomy::RentalCars, 0.6),
    (r"(?i)\brent a car\b", Taxonomy::RentalCars, 0.55),
    (r"(?i)\bhome improvement\b", Taxonomy::HomeImprovement, 0.6),
    (r"(?i)\bhardware\b", Taxonomy::HomeImprovement, 0.55),
    (r"(?i)\blumber\b", Taxonomy::HomeImprovement, 0.5),
    (r"(?i)\belectronics\b", Taxonomy::Electronics, 0.6),
    (r"(?i)\bcomputers?\b", Taxonomy::Electronics, 0.45),
    (r"(?i)\bcruises?\b", Taxonomy::Travel, 0.5),
    (r"(?i)\btravel\b", Taxonomy::Travel, 0.4),
    (r"(?i)\bdepartment store\b", Taxonomy::Shopping, 0.55),
    (r"(?i)\bboutique\b", Taxonomy::Shopping, 0.4),
    (r"(?i)\boutlet\b", Taxonomy::Shopping, 0.4),
];

/// Provider type-tag rules. Tags are short structured tokens (often
/// underscore-joined), so patterns match substrings rather than word
/// boundaries.
const TAG_RULES: &[(&str, Taxonomy, f64)] = &[
    (r"(?i)coffee", Taxonomy::Coffee, 0.9),
    (r"(?i)cafe", Taxonomy::Coffee, 0.9),
    (r"(?i)restaurant", Taxonomy::Dining, 0.85),
    (r"(?i)takeaway", Taxonomy::Dining, 0.7),
    (r"(?i)meal_delivery", Taxonomy::Dining, 0.65),
    (r"(?i)^bar$", Taxonomy::Dining, 0.6),
    (r"(?i)bakery", Taxonomy::Dining, 0.6),
    (r"(?i)grocery|supermarket", Taxonomy::Groceries, 0.9),
    (r"(?i)convenience", Taxonomy::Groceries, 0.55),
    (r"(?i)gas_station|fuel", Taxonomy::Gas, 0.9),
    (r"(?i)pharmacy", Taxonomy::Pharmacy, 0.9),
    (r"(?i)drug_?store", Taxonomy::Pharmacy, 0.85),
    (r"(?i)movie_theater", Taxonomy::Entertainment, 0.85),
    (r"(?i)amusement|bowling|casino", Taxonomy::Entertainment, 0.7),
    (r"(?i)night_club", Taxonomy::Entertainment, 0.6),
    (r"(?i)lodging|hotel", Taxonomy::Hotels, 0.9),
    (r"(?i)car_rental", Taxonomy::RentalCars, 0.85),
    (r"(?i)travel_agency", Taxonomy::Travel, 0.75),
    (r"(?i)airport", Taxonomy::Flights, 0.7),
    (r"(?i)transit_station|taxi", Taxonomy::Travel, 0.6),
    (r"(?i)electronics_store", Taxonomy::Electronics, 0.85),
    (r"(?i)hardware_store", Taxonomy::HomeImprovement, 0.85),
    (r"(?i)home_goods", Taxonomy::HomeImprovement, 0.6),
    (r"(?i)department_store", Taxonomy::Shopping, 0.7),
    (r"(?i)clothing_store|shoe_store", Taxonomy::Shopping, 0.7),
    (r"(?i)shopping_mall", Taxonomy::Shopping, 0.65),
    (r"(?i)^store$", Taxonomy::Shopping, 0.55),
];

const COFFEE_CUE: &str = r"(?i)\bcaf[e\u{e9}]\b|coffee|espresso|latte|roastery";
const FOOD_CUE: &str =
    r"(?i)restaurant|\bpizz|grill|taqueria|burger|sushi|\bdeli\b|diner|tacos?\b|bbq|ramen|eatery|bakery";

/// One compiled voting rule.
#[derive(Debug)]
pub struct KeywordRule {
    pattern: Regex,
    pub taxonomy: Taxonomy,
    pub weight: f64,
}

fn compile(rules: &[(&str, Taxonomy, f64)]) -> Result<Vec<KeywordRule>> {
    rules
        .iter()
        .map(|(pattern, taxonomy, weight)| {
            Ok(KeywordRule {
                pattern: Regex::new(pattern)?,
                taxonomy: *taxonomy,
                weight: *weight,
            })
        })
        .collect()
}

/// Keyword rules over free text (business names, place descriptions).
#[derive(Debug)]
pub struct KeywordRuleSet {
    rules: Vec<KeywordRule>,
    coffee_cue: Regex,
    food_cue: Regex,
}

impl KeywordRuleSet {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: compile(KEYWORD_RULES)?,
            coffee_cue: Regex::new(COFFEE_CUE)?,
            food_cue: Regex::new(FOOD_CUE)?,
        })
    }

    /// Accumulate weight for every rule whose pattern matches anywhere in
    /// `text`.
    pub fn vote(&self, text: &str) -> HashMap<Taxonomy, f64> {
        let mut votes = HashMap::new();
        self.accumulate(text, &mut votes);
        votes
    }

    /// Fold this rule set's votes into an existing tally.
    pub fn accumulate(&self, text: &str, votes: &mut HashMap<Taxonomy, f64>) {
        for rule in &self.rules {
            if rule.pattern.is_match(text) {
                *votes.entry(rule.taxonomy).or_insert(0.0) += rule.weight;
            }
        }
    }

    /// Unmistakable coffee cue in the text (cafe, espresso, ...).
    pub fn has_coffee_cue(&self, text: &str) -> bool {
        self.coffee_cue.is_match(text)
    }

    /// Unmistakable food cue in the text (restaurant, pizza, ...).
    pub fn has_food_cue(&self, text: &str) -> bool {
        self.food_cue.is_match(text)
    }
}

/// Voting rules over provider-supplied type tags.
#[derive(Debug)]
pub struct ProviderTagMapper {
    rules: Vec<KeywordRule>,
}

impl ProviderTagMapper {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: compile(TAG_RULES)?,
        })
    }

    /// Accumulate weight for every rule matching any of the tags.
    pub fn vote(&self, tags: &[String]) -> HashMap<Taxonomy, f64> {
        let mut votes = HashMap::new();
        self.accumulate(tags, &mut votes);
        votes
    }

    /// Fold tag votes into an existing tally.
    pub fn accumulate(&self, tags: &[String], votes: &mut HashMap<Taxonomy, f64>) {
        for tag in tags {
            for rule in &self.rules {
                if rule.pattern.is_match(tag) {
                    *votes.entry(rule.taxonomy).or_insert(0.0) += rule.weight;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_votes_accumulate() {
        let rules = KeywordRuleSet::new().unwrap();
        let votes = rules.vote("Corner Coffee Cafe");
        // Both the coffee and cafe patterns fire and stack
        let coffee = votes.get(&Taxonomy::Coffee).copied().unwrap_or(0.0);
        assert!((coffee - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_accepts_accented_cafe() {
        let rules = KeywordRuleSet::new().unwrap();
        let votes = rules.vote("Joe's Caf\u{e9}");
        assert!(votes.get(&Taxonomy::Coffee).copied().unwrap_or(0.0) > 0.0);
    }

    #[test]
    fn test_keyword_no_match_is_empty() {
        let rules = KeywordRuleSet::new().unwrap();
        assert!(rules.vote("Acme Holdings").is_empty());
    }

    #[test]
    fn test_tag_weights_are_stronger() {
        let tags = ProviderTagMapper::new().unwrap();
        let votes = tags.vote(&["cafe".to_string()]);
        assert!(votes.get(&Taxonomy::Coffee).copied().unwrap_or(0.0) >= 0.55);
    }

    #[test]
    fn test_tag_votes_stack_across_tags() {
        let tags = ProviderTagMapper::new().unwrap();
        let votes = tags.vote(&["restaurant".to_string(), "bar".to_string()]);
        let dining = votes.get(&Taxonomy::Dining).copied().unwrap_or(0.0);
        assert!((dining - 1.45).abs() < 1e-9);
    }

    #[test]
    fn test_drugstore_prefers_pharmacy_over_store() {
        let tags = ProviderTagMapper::new().unwrap();
        let votes = tags.vote(&["drugstore".to_string()]);
        let pharmacy = votes.get(&Taxonomy::Pharmacy).copied().unwrap_or(0.0);
        let shopping = votes.get(&Taxonomy::Shopping).copied().unwrap_or(0.0);
        assert!(pharmacy > shopping);
    }

    #[test]
    fn test_cues() {
        let rules = KeywordRuleSet::new().unwrap();
        assert!(rules.has_coffee_cue("Joe's Caf\u{e9}"));
        assert!(rules.has_food_cue("Tony's Pizzeria"));
        assert!(!rules.has_coffee_cue("Acme Holdings"));
        assert!(!rules.has_food_cue("Acme Holdings"));
    }
}
