//! Substring search over the rhyme bank vocabulary.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::rhyme_data::RhymeData;
use crate::text::sanitize_word;

/// Result limit for dictionary search.
pub const DEFAULT_SEARCH_LIMIT: usize = 120;

/// Find vocabulary words containing `query`.
///
/// The vocabulary is every dictionary key plus every sanitized word-bank
/// entry. Words starting with the query come first, then shorter words,
/// then byte order. An empty query or missing bank yields nothing.
///
/// ```
/// use orphan_studio_core::rhyme_data::RhymeData;
/// use orphan_studio_core::search::search_rhyme_words;
///
/// let data = RhymeData::from_json_str(r#"{"wordBank": ["delight", "ightly", "night"]}"#).unwrap();
/// assert_eq!(
///     search_rhyme_words("ight", Some(&data), 120),
///     ["ightly", "night", "delight"]
/// );
/// ```
#[tracing::instrument(skip(data), fields(has_data = data.is_some()))]
pub fn search_rhyme_words(query: &str, data: Option<&RhymeData>, limit: usize) -> Vec<String> {
    let query = sanitize_word(query);
    let Some(data) = data else {
        return Vec::new();
    };
    if query.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut matches: Vec<String> = data
        .dictionary
        .keys()
        .cloned()
        .chain(data.word_bank.iter().map(|word| sanitize_word(word)))
        .filter(|word| !word.is_empty() && word.contains(query.as_str()))
        .filter(|word| seen.insert(word.clone()))
        .collect();

    matches.sort_by(|a, b| rank(a, b, &query));
    matches.truncate(limit);

    tracing::debug!(query = %query, results = matches.len(), "search complete");
    matches
}

fn rank(a: &str, b: &str, query: &str) -> Ordering {
    let a_prefix = a.starts_with(query);
    let b_prefix = b.starts_with(query);
    b_prefix
        .cmp(&a_prefix)
        .then_with(|| a.len().cmp(&b.len()))
        .then_with(|| a.cmp(b))
}
