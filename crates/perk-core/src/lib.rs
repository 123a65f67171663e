//! Perk Core Library
//!
//! Merchant taxonomy classification engine for reward categories:
//! - Name normalization, alias canonicalization, and edit-distance matching
//! - Static brand registry with exact/prefix matching
//! - Weighted keyword and provider-tag voting rules
//! - Merchant category code mapping with hotel/airline brand sub-codes
//! - Rule-based classifier and brand-aware merchant matcher
//! - Confidence-gated AI fallback with a bounded TTL cache
//!
//! The engine always returns a best-effort classification: absence of
//! signal yields the default taxonomy, and every AI failure falls back to
//! the rule-based answer.

pub mod ai;
pub mod brands;
pub mod cache;
pub mod classifier;
pub mod error;
pub mod fallback;
pub mod matcher;
pub mod mcc;
pub mod models;
pub mod normalize;
pub mod rules;
pub mod taxonomy;

/// Test utilities including the mock taxonomy LLM server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIClient, AIProvider, AIRequest, AiBatchEntry, AiTaxonomyResponse, MockBackend, OllamaBackend};
pub use brands::{BrandRecord, BrandRegistry};
pub use cache::{CacheKey, ClassificationCache};
pub use classifier::{ClassifierConfig, RuleBasedClassifier};
pub use error::{Error, Result};
pub use fallback::{AIFallbackClassifier, FallbackConfig};
pub use matcher::MerchantMatcher;
pub use mcc::CategoryCodeMap;
pub use models::{BestMatch, Classification, MerchantMatchResult, MerchantRecord};
pub use normalize::{canonicalize, find_best_match, levenshtein, normalize, similarity};
pub use rules::{KeywordRuleSet, ProviderTagMapper};
pub use taxonomy::Taxonomy;
