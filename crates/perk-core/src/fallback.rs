//! Confidence-gated AI fallback classifier
//!
//! Wraps the rule-based classifier; when rule confidence is below the
//! threshold, escalates to the injected AI provider, validates the answer
//! against the closed taxonomy, and caches it in a bounded TTL cache shared
//! across single and batch calls.
//!
//! The design is strictly fail-open: AI unconfigured, transport failure,
//! unparseable output, and semantic rejection all return the already
//! computed rule-based result. The caller never receives an error from this
//! path.

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::ai::{parsing, prompts, AIClient, AIProvider, AIRequest, AiTaxonomyResponse};
use crate::cache::{CacheKey, ClassificationCache};
use crate::classifier::{ClassifierConfig, RuleBasedClassifier};
use crate::error::Result;
use crate::models::{Classification, MerchantRecord};
use crate::taxonomy::Taxonomy;

/// Tunable constants for the fallback layer.
///
/// The confidence threshold means "rule-based is trusted above this, the AI
/// is consulted below it" and is deployment configuration, not an
/// algorithmic truth.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// Rule confidence at or above which the AI is never consulted
    pub rule_confidence_threshold: f64,
    /// Maximum cached AI classifications
    pub cache_capacity: usize,
    /// Age beyond which a cached entry is treated as absent
    pub cache_ttl: Duration,
    /// Items per batch AI call, bounding prompt size
    pub chunk_size: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            rule_confidence_threshold: 0.7,
            cache_capacity: 512,
            cache_ttl: Duration::hours(24),
            chunk_size: 20,
        }
    }
}

pub struct AIFallbackClassifier {
    rules: RuleBasedClassifier,
    provider: Option<AIClient>,
    cache: ClassificationCache,
    config: FallbackConfig,
}

impl AIFallbackClassifier {
    /// Create with default configuration. `provider: None` means every
    /// classification stays rule-based.
    pub fn new(provider: Option<AIClient>) -> Result<Self> {
        Self::with_config(provider, FallbackConfig::default(), ClassifierConfig::default())
    }

    pub fn with_config(
        provider: Option<AIClient>,
        config: FallbackConfig,
        classifier_config: ClassifierConfig,
    ) -> Result<Self> {
        Ok(Self {
            rules: RuleBasedClassifier::with_config(classifier_config)?,
            provider,
            cache: ClassificationCache::new(config.cache_capacity, config.cache_ttl),
            config,
        })
    }

    /// Classify one record.
    ///
    /// Stages: rule-based gate, cache lookup, AI call, validation, cache
    /// write. Every AI-related failure falls back to the rule-based result.
    pub async fn classify(&self, record: &MerchantRecord) -> Classification {
        let rule_result = self.rules.classify_record(record);
        if rule_result.confidence >= self.config.rule_confidence_threshold {
            debug!(
                name = %record.name,
                confidence = rule_result.confidence,
                "rule confidence adequate, skipping AI"
            );
            return rule_result;
        }

        let key = CacheKey::new(&record.name, &record.provider_tags);
        if let Some(cached) = self.cache.get(&key) {
            debug!(name = %record.name, "AI cache hit");
            return cached;
        }

        let Some(provider) = &self.provider else {
            debug!(name = %record.name, "no AI provider configured, keeping rule result");
            return rule_result;
        };

        let request = AIRequest {
            system_prompt: prompts::system_prompt(),
            user_prompt: prompts::single_user_prompt(record),
        };

        match provider.classify(&request).await {
            Ok(text) => match parsing::parse_taxonomy_response(&text) {
                Ok(response) => match self.validate(&response) {
                    Some(classification) => {
                        debug!(
                            name = %record.name,
                            taxonomy = %classification.taxonomy,
                            "AI classification accepted"
                        );
                        self.cache.put(key, classification.clone());
                        classification
                    }
                    None => {
                        warn!(
                            name = %record.name,
                            taxonomy = %response.taxonomy,
                            confidence = response.confidence,
                            "AI response failed validation, using rule result"
                        );
                        rule_result
                    }
                },
                Err(e) => {
                    warn!(name = %record.name, error = %e, "AI response unparseable, using rule result");
                    rule_result
                }
            },
            Err(e) => {
                warn!(name = %record.name, error = %e, "AI call failed, using rule result");
                rule_result
            }
        }
    }

    /// Classify a batch of records, preserving input order.
    ///
    /// Items resolved by rules or the cache skip the AI entirely; the rest
    /// are grouped into fixed-size chunks, one AI call per chunk, with an
    /// explicit 1-based index per item. Reassembly is keyed by that index,
    /// so a shuffled or partial response still maps back correctly, and any
    /// item absent from the response gets its rule-based result.
    pub async fn classify_batch(&self, records: &[MerchantRecord]) -> Vec<Classification> {
        let rule_results: Vec<Classification> = records
            .iter()
            .map(|record| self.rules.classify_record(record))
            .collect();

        let mut resolved: Vec<Option<Classification>> = vec![None; records.len()];
        let mut pending: Vec<usize> = Vec::new();

        for (i, record) in records.iter().enumerate() {
            if rule_results[i].confidence >= self.config.rule_confidence_threshold {
                resolved[i] = Some(rule_results[i].clone());
            } else if let Some(cached) = self
                .cache
                .get(&CacheKey::new(&record.name, &record.provider_tags))
            {
                resolved[i] = Some(cached);
            } else {
                pending.push(i);
            }
        }

        let resolved_early = records.len() - pending.len();

        if !pending.is_empty() {
            if let Some(provider) = &self.provider {
                for chunk in pending.chunks(self.config.chunk_size.max(1)) {
                    self.classify_chunk(provider, records, chunk, &mut resolved).await;
                }
            }
        }

        let ai_resolved = pending.iter().filter(|&&i| resolved[i].is_some()).count();
        let results: Vec<Classification> = resolved
            .into_iter()
            .enumerate()
            .map(|(i, slot)| slot.unwrap_or_else(|| rule_results[i].clone()))
            .collect();

        info!(
            total = records.len(),
            resolved_early,
            ai_resolved,
            "batch classification complete"
        );

        results
    }

    /// One AI call for a chunk of pending items, indexed 1-based within the
    /// chunk. Any failure leaves the chunk unresolved; the caller fills it
    /// from the rule results.
    async fn classify_chunk(
        &self,
        provider: &AIClient,
        records: &[MerchantRecord],
        chunk: &[usize],
        resolved: &mut [Option<Classification>],
    ) {
        let items: Vec<(usize, &MerchantRecord)> = chunk
            .iter()
            .enumerate()
            .map(|(j, &i)| (j + 1, &records[i]))
            .collect();

        let request = AIRequest {
            system_prompt: prompts::batch_system_prompt(),
            user_prompt: prompts::batch_user_prompt(&items),
        };

        let entries = match provider.classify(&request).await {
            Ok(text) => match parsing::parse_batch_entries(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "batch AI response unparseable, chunk keeps rule results");
                    return;
                }
            },
            Err(e) => {
                warn!(error = %e, "batch AI call failed, chunk keeps rule results");
                return;
            }
        };

        for entry in entries {
            if entry.index == 0 || entry.index > chunk.len() {
                warn!(index = entry.index, "batch entry index out of range, skipping");
                continue;
            }
            let i = chunk[entry.index - 1];

            let response = AiTaxonomyResponse {
                taxonomy: entry.taxonomy,
                confidence: entry.confidence,
                reason: String::new(),
            };
            if let Some(classification) = self.validate(&response) {
                let record = &records[i];
                self.cache.put(
                    CacheKey::new(&record.name, &record.provider_tags),
                    classification.clone(),
                );
                resolved[i] = Some(classification);
            } else {
                warn!(
                    name = %records[i].name,
                    "batch entry failed validation, item keeps rule result"
                );
            }
        }
    }

    /// Semantic validation of an AI answer: taxonomy must parse into the
    /// closed enumeration and confidence must be in [0, 1].
    fn validate(&self, response: &AiTaxonomyResponse) -> Option<Classification> {
        let taxonomy: Taxonomy = response.taxonomy.parse().ok()?;
        if !(0.0..=1.0).contains(&response.confidence) {
            return None;
        }
        Some(Classification {
            taxonomy,
            mcc_candidates: self.rules.mcc_candidates(taxonomy).to_vec(),
            confidence: response.confidence,
            brand_id: None,
        })
    }

    /// Current cache entry count and capacity, for host diagnostics.
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.cache.len(), self.cache.capacity())
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;

    fn with_mock(mock: MockBackend) -> AIFallbackClassifier {
        AIFallbackClassifier::new(Some(AIClient::Mock(mock))).unwrap()
    }

    fn low_signal_record(name: &str) -> MerchantRecord {
        MerchantRecord::named(name)
    }

    #[tokio::test]
    async fn test_high_confidence_skips_ai() {
        // A failing provider is never reached when rules are confident
        let classifier = with_mock(MockBackend::failing());
        let result = classifier.classify(&low_signal_record("Starbucks")).await;
        assert_eq!(result.taxonomy, Taxonomy::Coffee);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(classifier.cache_stats().0, 0);
    }

    #[tokio::test]
    async fn test_ai_escalation_on_low_confidence() {
        let classifier = with_mock(MockBackend::with_response(
            r#"{"taxonomy": "entertainment", "confidence": 0.82, "reason": "arcade bar"}"#,
        ));
        let result = classifier.classify(&low_signal_record("Zxq Holdings")).await;
        assert_eq!(result.taxonomy, Taxonomy::Entertainment);
        assert!((result.confidence - 0.82).abs() < 1e-9);
        assert!(!result.mcc_candidates.is_empty());
        assert_eq!(classifier.cache_stats().0, 1);
    }

    #[tokio::test]
    async fn test_ai_failure_equals_unconfigured() {
        let record = low_signal_record("Acme Corp");

        let without_ai = AIFallbackClassifier::new(None).unwrap();
        let with_failing = with_mock(MockBackend::failing());

        let a = without_ai.classify(&record).await;
        let b = with_failing.classify(&record).await;

        assert_eq!(a.taxonomy, b.taxonomy);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.mcc_candidates, b.mcc_candidates);
        assert_eq!(a.taxonomy, Taxonomy::EverythingElse);
    }

    #[tokio::test]
    async fn test_semantic_rejection_falls_back() {
        // Valid JSON, but the taxonomy is outside the closed enumeration
        let classifier = with_mock(MockBackend::with_response(
            r#"{"taxonomy": "streaming", "confidence": 0.9, "reason": "tv service"}"#,
        ));
        let result = classifier.classify(&low_signal_record("Acme Corp")).await;
        assert_eq!(result.taxonomy, Taxonomy::EverythingElse);
        assert_eq!(classifier.cache_stats().0, 0);
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_falls_back() {
        let classifier = with_mock(MockBackend::with_response(
            r#"{"taxonomy": "coffee", "confidence": 1.4, "reason": "very sure"}"#,
        ));
        let result = classifier.classify(&low_signal_record("Acme Corp")).await;
        assert_eq!(result.taxonomy, Taxonomy::EverythingElse);
    }

    #[tokio::test]
    async fn test_unparseable_response_falls_back() {
        let classifier = with_mock(MockBackend::with_response("no json here"));
        let result = classifier.classify(&low_signal_record("Acme Corp")).await;
        assert_eq!(result.taxonomy, Taxonomy::EverythingElse);
    }

    #[tokio::test]
    async fn test_cache_shared_between_single_and_batch() {
        // The canned response is a single object; a batch AI call could
        // never parse it, so a batch answer matching it proves a cache hit.
        let classifier = with_mock(MockBackend::with_response(
            r#"{"taxonomy": "entertainment", "confidence": 0.8, "reason": "arcade"}"#,
        ));
        let record = low_signal_record("Mystery Spot");

        let single = classifier.classify(&record).await;
        assert_eq!(single.taxonomy, Taxonomy::Entertainment);

        let batch = classifier.classify_batch(&[record]).await;
        assert_eq!(batch[0].taxonomy, Taxonomy::Entertainment);
        assert!((batch[0].confidence - 0.8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_batch_index_integrity_with_partial_shuffled_response() {
        // Five low-signal items; the AI answers only items 1, 3, 5, out of
        // order. Items 2 and 4 must get rule-based results, and all five
        // outputs must line up with their inputs.
        let response = r#"[
            {"index": 5, "taxonomy": "gas", "confidence": 0.8},
            {"index": 1, "taxonomy": "coffee", "confidence": 0.9},
            {"index": 3, "taxonomy": "hotels", "confidence": 0.85}
        ]"#;
        let classifier = with_mock(MockBackend::with_response(response));

        let records: Vec<MerchantRecord> = ["Alpha", "Bravo", "Charlie", "Dxq Partners", "Echo"]
            .iter()
            .map(|n| low_signal_record(n))
            .collect();
        let results = classifier.classify_batch(&records).await;

        assert_eq!(results.len(), 5);
        assert_eq!(results[0].taxonomy, Taxonomy::Coffee);
        assert_eq!(results[1].taxonomy, Taxonomy::EverythingElse);
        assert_eq!(results[2].taxonomy, Taxonomy::Hotels);
        assert_eq!(results[3].taxonomy, Taxonomy::EverythingElse);
        assert_eq!(results[4].taxonomy, Taxonomy::Gas);
        assert!((results[1].confidence - 0.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_batch_out_of_range_index_ignored() {
        let response = r#"[
            {"index": 9, "taxonomy": "gas", "confidence": 0.8},
            {"index": 0, "taxonomy": "coffee", "confidence": 0.9},
            {"index": 2, "taxonomy": "dining", "confidence": 0.75}
        ]"#;
        let classifier = with_mock(MockBackend::with_response(response));

        let records = vec![low_signal_record("Alpha"), low_signal_record("Bravo")];
        let results = classifier.classify_batch(&records).await;

        assert_eq!(results[0].taxonomy, Taxonomy::EverythingElse);
        assert_eq!(results[1].taxonomy, Taxonomy::Dining);
    }

    #[tokio::test]
    async fn test_batch_chunking_uses_per_chunk_indices() {
        // Keyword-driven mock answers every numbered line; with chunk_size 2
        // the third item arrives in a second chunk re-indexed from 1.
        let config = FallbackConfig {
            chunk_size: 2,
            ..FallbackConfig::default()
        };
        let classifier = AIFallbackClassifier::with_config(
            Some(AIClient::Mock(MockBackend::new())),
            config,
            ClassifierConfig::default(),
        )
        .unwrap();

        let records = vec![
            low_signal_record("Corner Coffee"),
            low_signal_record("Quick Fuel"),
            low_signal_record("Plaza Hotel"),
        ];
        let results = classifier.classify_batch(&records).await;

        assert_eq!(results[0].taxonomy, Taxonomy::Coffee);
        assert_eq!(results[1].taxonomy, Taxonomy::Gas);
        assert_eq!(results[2].taxonomy, Taxonomy::Hotels);
        // All three went through the AI path and got cached
        assert_eq!(classifier.cache_stats().0, 3);
    }

    #[tokio::test]
    async fn test_batch_without_provider_keeps_rule_results() {
        let classifier = AIFallbackClassifier::new(None).unwrap();
        let records = vec![
            low_signal_record("Starbucks"),
            low_signal_record("Acme Corp"),
        ];
        let results = classifier.classify_batch(&records).await;
        assert_eq!(results[0].taxonomy, Taxonomy::Coffee);
        assert_eq!(results[1].taxonomy, Taxonomy::EverythingElse);
    }

    #[tokio::test]
    async fn test_batch_preserves_input_order_with_mixed_resolution() {
        let classifier = with_mock(MockBackend::new());
        let records = vec![
            low_signal_record("Starbucks"),      // brand, resolved by rules
            low_signal_record("Corner Coffee"),  // nudged but below threshold, AI
            low_signal_record("Acme Corp"),      // no signal, AI default answer
        ];
        let results = classifier.classify_batch(&records).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].brand_id.as_deref(), Some("starbucks"));
        assert_eq!(results[1].taxonomy, Taxonomy::Coffee);
        assert_eq!(results[2].taxonomy, Taxonomy::EverythingElse);
    }
}
