//! Merchant name normalization and string similarity
//!
//! Normalization is the shared front door for every matching signal: brand
//! lookup, alias resolution, cache keys, and fuzzy scoring all operate on
//! normalized names so that "Starbucks Coffee Co." and "STARBUCKS" land in
//! the same place.

use crate::models::BestMatch;

/// Default score threshold for [`find_best_match`].
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Bonus added when one normalized string contains the other.
const CONTAINMENT_BONUS: f64 = 0.2;

/// Trailing corporate suffixes stripped during normalization.
const CORPORATE_SUFFIXES: &[&str] = &["inc", "llc", "corp", "co", "ltd", "incorporated", "corporation"];

/// Minimum length before containment counts in alias resolution. Stops a
/// two-letter fragment from claiming half the table.
const MIN_CONTAINMENT_LEN: usize = 3;

/// Static alias table: canonical business name -> known variants.
/// Both sides are stored in normalized form.
const ALIASES: &[(&str, &[&str])] = &[
    ("starbucks", &["sbux", "starbucks coffee"]),
    ("mcdonald's", &["mcdonalds", "mickey d's"]),
    ("dunkin", &["dunkin donuts", "dunkin' donuts"]),
    ("chick fil a", &["chickfila"]),
    ("walmart", &["wal mart", "walmart supercenter"]),
    ("trader joe's", &["trader joes"]),
    ("whole foods", &["whole foods market", "wholefds"]),
    ("7 eleven", &["7 11", "seven eleven"]),
    ("cvs", &["cvs pharmacy"]),
    ("walgreens", &["walgreen"]),
    ("home depot", &["the home depot"]),
    ("in n out", &["in n out burger"]),
    ("kentucky fried chicken", &["kfc"]),
    ("piggly wiggly", &["the pig"]),
    ("best buy", &["bestbuy"]),
];

/// Normalize a raw merchant name.
///
/// Lowercases, standardizes curly apostrophes, strips punctuation (keeping
/// apostrophes), drops trailing corporate suffixes, and collapses internal
/// whitespace. Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(name: &str) -> String {
    let lowered = name
        .replace(['\u{2018}', '\u{2019}', '`'], "'")
        .to_lowercase();

    let cleaned: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '\'' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    while tokens.len() > 1 {
        let last = tokens[tokens.len() - 1];
        if CORPORATE_SUFFIXES.contains(&last) {
            tokens.pop();
        } else {
            break;
        }
    }

    tokens.join(" ")
}

/// Resolve a name to its canonical form via the alias table.
///
/// Returns the canonical key when the normalized name equals, contains, or is
/// contained in a known variant; otherwise returns the normalized name
/// unchanged. Table order is significant and first match wins.
pub fn canonicalize(name: &str) -> String {
    let normalized = normalize(name);

    for (canonical, variants) in ALIASES {
        for variant in std::iter::once(canonical).chain(variants.iter()) {
            if normalized == *variant {
                return canonical.to_string();
            }
            if variant.len() >= MIN_CONTAINMENT_LEN && normalized.contains(variant) {
                return canonical.to_string();
            }
            if normalized.len() >= MIN_CONTAINMENT_LEN && variant.contains(normalized.as_str()) {
                return canonical.to_string();
            }
        }
    }

    normalized
}

/// Whether a normalized name is itself a canonical key in the alias table,
/// i.e. a recognized well-known business.
pub fn is_canonical_key(name: &str) -> bool {
    ALIASES.iter().any(|(canonical, _)| *canonical == name)
}

/// Classic Levenshtein edit distance (insert/delete/substitute cost 1).
///
/// Exact distance values are part of the public contract, so this is the
/// full dynamic-programming formulation with no shortcuts.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (len_a, len_b) = (a_chars.len(), b_chars.len());

    if len_a == 0 {
        return len_b;
    }
    if len_b == 0 {
        return len_a;
    }

    let mut matrix = vec![vec![0usize; len_b + 1]; len_a + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=len_b {
        matrix[0][j] = j;
    }

    for i in 1..=len_a {
        for j in 1..=len_b {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[len_a][len_b]
}

/// Edit-distance similarity in [0, 1]. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 && len_b == 0 {
        return 1.0;
    }

    let distance = levenshtein(&a, &b);
    1.0 - distance as f64 / len_a.max(len_b) as f64
}

/// Find the best fuzzy match for `target` among `candidates`.
///
/// An exact canonical match short-circuits with score 1.0. Otherwise each
/// candidate is scored as the max of normalized and canonical similarity,
/// plus a containment bonus when one normalized string contains the other.
/// Candidates below `threshold` report no match, but the best score is still
/// returned for diagnostics.
pub fn find_best_match(target: &str, candidates: &[String], threshold: f64) -> BestMatch {
    let normalized_target = normalize(target);
    let canonical_target = canonicalize(target);

    let mut best_score = 0.0f64;
    let mut best_index: Option<usize> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let normalized_candidate = normalize(candidate);
        let canonical_candidate = canonicalize(candidate);

        if !canonical_target.is_empty() && canonical_candidate == canonical_target {
            return BestMatch {
                candidate: Some(candidate.clone()),
                score: 1.0,
                index: Some(index),
            };
        }

        let mut score = similarity(&normalized_target, &normalized_candidate)
            .max(similarity(&canonical_target, &canonical_candidate));

        if !normalized_target.is_empty()
            && !normalized_candidate.is_empty()
            && (normalized_target.contains(&normalized_candidate)
                || normalized_candidate.contains(&normalized_target))
        {
            score += CONTAINMENT_BONUS;
        }

        if score > best_score {
            best_score = score;
            best_index = Some(index);
        }
    }

    if best_score >= threshold {
        BestMatch {
            candidate: best_index.map(|i| candidates[i].clone()),
            score: best_score,
            index: best_index,
        }
    } else {
        BestMatch {
            candidate: None,
            score: best_score,
            index: None,
        }
    }
}
