//! Rule-based merchant classifier
//!
//! Fuses the brand registry, provider tag votes, and keyword votes into one
//! taxonomy decision with a confidence score. Pure CPU, no network I/O, and
//! it never errors: absence of signal is represented by the default
//! taxonomy, not an exception.

use std::collections::HashMap;

use tracing::debug;

use crate::brands::BrandRegistry;
use crate::error::Result;
use crate::mcc::CategoryCodeMap;
use crate::models::{Classification, MerchantRecord};
use crate::rules::{KeywordRuleSet, ProviderTagMapper};
use crate::taxonomy::Taxonomy;

/// Tunable constants for the classifier.
///
/// These are deployment configuration, not algorithmic truths: the defaults
/// mean "rule-based is trusted above this, the nudge floor is raised to
/// that", and both can be re-tuned without touching the algorithm.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Confidence assigned when no signal produced anything
    pub default_confidence: f64,
    /// Confidence floor applied by the food/coffee ambiguity nudge
    pub food_cue_floor: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            default_confidence: 0.3,
            food_cue_floor: 0.6,
        }
    }
}

/// Classifier over the static brand/keyword/tag tables.
pub struct RuleBasedClassifier {
    brands: BrandRegistry,
    keywords: KeywordRuleSet,
    tags: ProviderTagMapper,
    codes: CategoryCodeMap,
    config: ClassifierConfig,
}

impl RuleBasedClassifier {
    pub fn new() -> Result<Self> {
        Self::with_config(ClassifierConfig::default())
    }

    pub fn with_config(config: ClassifierConfig) -> Result<Self> {
        Ok(Self {
            brands: BrandRegistry::new(),
            keywords: KeywordRuleSet::new()?,
            tags: ProviderTagMapper::new()?,
            codes: CategoryCodeMap::new(),
            config,
        })
    }

    /// Classify a merchant from its name, provider type tags, and optional
    /// place text.
    ///
    /// Precedence: a brand-registry hit decides the taxonomy outright at
    /// confidence 1.0; otherwise the highest accumulated tag/keyword vote
    /// wins with the clamped vote total as confidence; otherwise the
    /// default taxonomy at a low fixed confidence. A food/coffee ambiguity
    /// nudge rescues small food vendors that providers mis-tag as generic
    /// retail.
    pub fn classify(
        &self,
        name: &str,
        provider_tags: &[String],
        place_text: Option<&str>,
    ) -> Classification {
        let brand = self.brands.find(name);

        // Votes accumulate independently of the brand lookup
        let mut votes: HashMap<Taxonomy, f64> = HashMap::new();
        self.tags.accumulate(provider_tags, &mut votes);
        if let Some(text) = place_text {
            self.keywords.accumulate(text, &mut votes);
        }
        self.keywords.accumulate(name, &mut votes);

        let top_vote = top_vote(&votes);

        let (mut taxonomy, mut confidence, brand_id) = if let Some(brand) = brand {
            debug!(name, brand = brand.id, "brand registry match");
            (brand.taxonomy, 1.0, Some(brand.id.to_string()))
        } else if let Some((voted, total)) = top_vote {
            debug!(name, taxonomy = %voted, total, "vote-based classification");
            (voted, total.clamp(0.0, 1.0), None)
        } else {
            debug!(name, "no signal, defaulting");
            (Taxonomy::DEFAULT, self.config.default_confidence, None)
        };

        // Ambiguity nudge: the generic default is a common false result for
        // small food vendors whose provider tags say "store". Unmistakable
        // food/coffee cues in the combined text override it with a raised
        // confidence floor.
        if brand_id.is_none() {
            let combined = match place_text {
                Some(text) => format!("{} {}", name, text),
                None => name.to_string(),
            };
            let coffee = self.keywords.has_coffee_cue(&combined);
            let food = self.keywords.has_food_cue(&combined);

            if taxonomy.is_generic() && (coffee || food) {
                taxonomy = if coffee { Taxonomy::Coffee } else { Taxonomy::Dining };
                confidence = confidence.max(self.config.food_cue_floor);
                debug!(name, taxonomy = %taxonomy, "food cue override of generic default");
            } else if matches!(taxonomy, Taxonomy::Coffee | Taxonomy::Dining)
                && (coffee || food)
                && confidence < self.config.food_cue_floor
            {
                confidence = self.config.food_cue_floor;
                debug!(name, taxonomy = %taxonomy, "food cue confidence floor");
            }
        }

        Classification {
            taxonomy,
            mcc_candidates: self.codes.candidates_for(taxonomy).to_vec(),
            confidence: confidence.clamp(0.0, 1.0),
            brand_id,
        }
    }

    /// Classify a full merchant record.
    pub fn classify_record(&self, record: &MerchantRecord) -> Classification {
        self.classify(
            &record.name,
            &record.provider_tags,
            record.place_text.as_deref(),
        )
    }

    /// Candidate codes for a taxonomy, exposed for the fallback layer.
    pub fn mcc_candidates(&self, taxonomy: Taxonomy) -> &'static [u16] {
        self.codes.candidates_for(taxonomy)
    }
}

/// Highest-vote taxonomy with a deterministic tie-break on taxonomy order.
fn top_vote(votes: &HashMap<Taxonomy, f64>) -> Option<(Taxonomy, f64)> {
    let mut entries: Vec<(Taxonomy, f64)> = votes.iter().map(|(t, w)| (*t, *w)).collect();
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.ordinal().cmp(&b.0.ordinal()))
    });
    entries.first().copied()
}
