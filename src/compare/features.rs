use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

use super::categories::Category;

/// At most this many feature sentences per category.
const MAX_FEATURES_PER_CATEGORY: usize = 3;
/// Sentences shorter than this carry no signal.
const MIN_SENTENCE_LEN: usize = 10;
/// Feature sentences are clipped for the report.
const MAX_FEATURE_LEN: usize = 150;

fn sentence_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("static regex"))
}

/// Extract sustainability features from retrieved chunk texts.
///
/// For every category, collect up to three distinct sentences that
/// contain one of its keywords. Matching is lowercase-lexical; the map
/// always carries all categories, empty where nothing matched.
pub fn extract_features(chunks: &[String]) -> BTreeMap<Category, Vec<String>> {
    let combined = chunks.join(" ").to_lowercase();
    let sentences: Vec<&str> = sentence_splitter()
        .split(&combined)
        .map(|s| s.trim())
        .filter(|s| s.len() > MIN_SENTENCE_LEN)
        .collect();

    let mut features = BTreeMap::new();
    for category in Category::ALL {
        let mut found = BTreeSet::new();

        'keywords: for keyword in category.keywords() {
            if !combined.contains(keyword) {
                continue;
            }
            for sentence in &sentences {
                if sentence.contains(keyword) {
                    found.insert(clip(sentence));
                    if found.len() >= MAX_FEATURES_PER_CATEGORY {
                        break 'keywords;
                    }
                }
            }
        }

        features.insert(category, found.into_iter().collect());
    }

    features
}

/// Total feature count across categories.
pub fn feature_count(features: &BTreeMap<Category, Vec<String>>) -> usize {
    features.values().map(|v| v.len()).sum()
}

fn clip(sentence: &str) -> String {
    sentence.chars().take(MAX_FEATURE_LEN).collect()
}
