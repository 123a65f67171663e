//! Prompt builders for taxonomy classification
//!
//! The system prompts constrain the model to the closed taxonomy
//! enumeration; anything outside it is rejected downstream by validation.

use crate::models::MerchantRecord;
use crate::taxonomy::Taxonomy;

/// Header line of every batch user prompt. Mock backends sniff it to tell
/// batch requests from single ones, the same way a human reading the
/// prompt would.
pub const BATCH_HEADER: &str = "Classify each of the following businesses";

fn taxonomy_list() -> String {
    Taxonomy::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// System prompt for a single classification.
pub fn system_prompt() -> String {
    format!(
        "You classify merchants into reward categories.\n\
         Respond with a single JSON object: {{\"taxonomy\": string, \"confidence\": number, \"reason\": string}}.\n\
         confidence is between 0 and 1.\n\
         taxonomy must be exactly one of: {}.",
        taxonomy_list()
    )
}

/// User prompt for a single classification: name, address, provider tags.
pub fn single_user_prompt(record: &MerchantRecord) -> String {
    let mut lines = vec![format!("Business: {}", record.name)];
    if let Some(address) = &record.address {
        lines.push(format!("Address: {}", address));
    }
    if !record.provider_tags.is_empty() {
        lines.push(format!("Provider tags: {}", record.provider_tags.join(", ")));
    }
    if let Some(text) = &record.place_text {
        lines.push(format!("Description: {}", text));
    }
    lines.join("\n")
}

/// System prompt for a batch classification.
pub fn batch_system_prompt() -> String {
    format!(
        "You classify merchants into reward categories.\n\
         Respond with a JSON array of objects: [{{\"index\": number, \"taxonomy\": string, \"confidence\": number}}].\n\
         Use the 1-based index of each listed business. confidence is between 0 and 1.\n\
         taxonomy must be exactly one of: {}.",
        taxonomy_list()
    )
}

/// User prompt listing numbered businesses, 1-based.
pub fn batch_user_prompt(items: &[(usize, &MerchantRecord)]) -> String {
    let mut lines = vec![format!("{}:", BATCH_HEADER)];
    for (index, record) in items {
        let mut line = format!("{}. {}", index, record.name);
        if let Some(address) = &record.address {
            line.push_str(&format!(" | address: {}", address));
        }
        if !record.provider_tags.is_empty() {
            line.push_str(&format!(" | tags: {}", record.provider_tags.join(", ")));
        }
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_enumerates_taxonomies() {
        let prompt = system_prompt();
        for taxonomy in Taxonomy::ALL {
            assert!(prompt.contains(taxonomy.as_str()), "missing {}", taxonomy);
        }
    }

    #[test]
    fn test_single_user_prompt_includes_signals() {
        let record = MerchantRecord {
            name: "Joe's Cafe".to_string(),
            provider_tags: vec!["cafe".to_string(), "store".to_string()],
            place_text: None,
            mcc: None,
            address: Some("100 Main St".to_string()),
        };
        let prompt = single_user_prompt(&record);
        assert!(prompt.contains("Joe's Cafe"));
        assert!(prompt.contains("100 Main St"));
        assert!(prompt.contains("cafe, store"));
    }

    #[test]
    fn test_batch_user_prompt_numbers_items() {
        let a = MerchantRecord::named("Alpha");
        let b = MerchantRecord::named("Beta");
        let prompt = batch_user_prompt(&[(1, &a), (2, &b)]);
        assert!(prompt.starts_with(BATCH_HEADER));
        assert!(prompt.contains("1. Alpha"));
        assert!(prompt.contains("2. Beta"));
    }
}
