//! Rhyme resolution.
//!
//! A word with a curated dictionary entry gets exactly that entry. Any other
//! word falls back to ranking the bank's ending groups by how well their key
//! matches the word's tail, plus loose word-bank matches.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rhyme_data::{EndingGroup, RhymeData};
use crate::text::{sanitize_word, tail};

/// Suggestion limit for the live sidebar.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 18;

/// Suggestion limit for the full dictionary (explore) view.
pub const EXPLORE_SUGGESTION_LIMIT: usize = 140;

/// Heuristic-path perfect matches beyond this many also feed `near`.
const NEAR_SPILLOVER: usize = 6;

/// Suggestions for one word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RhymeResults {
    /// Exact rhymes.
    pub perfect: Vec<String>,
    /// Slant rhymes.
    pub near: Vec<String>,
    /// Related words.
    pub family: Vec<String>,
}

impl RhymeResults {
    /// No suggestions.
    pub const fn empty() -> Self {
        Self {
            perfect: Vec::new(),
            near: Vec::new(),
            family: Vec::new(),
        }
    }

    /// Whether all three lists are empty.
    pub fn is_empty(&self) -> bool {
        self.perfect.is_empty() && self.near.is_empty() && self.family.is_empty()
    }

    /// Cap each list at `limit`.
    #[must_use]
    pub fn truncated(mut self, limit: usize) -> Self {
        self.perfect.truncate(limit);
        self.near.truncate(limit);
        self.family.truncate(limit);
        self
    }
}

/// Sanitize, drop empties and `exclude`, keep the first occurrence of each word.
fn dedupe<'a, I>(words: I, exclude: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    words
        .into_iter()
        .map(sanitize_word)
        .filter(|word| !word.is_empty() && word != exclude)
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

fn capped<'a, I>(words: I, exclude: &str, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = dedupe(words, exclude);
    out.truncate(limit);
    out
}

/// How strongly an ending group matches a word. `None` means no match.
fn score_group(word: &str, group: &EndingGroup) -> Option<usize> {
    let key = sanitize_word(&group.key);
    if key.is_empty() {
        return None;
    }
    if word.ends_with(&key) {
        return Some(key.len() + 2);
    }
    if group.words.iter().any(|entry| sanitize_word(entry) == word) {
        return Some(key.len() + 1);
    }
    if key.len() >= 3 && tail(word, 3) == tail(&key, 3) {
        return Some(1);
    }
    None
}

/// Rank ending groups against `word` and flatten their words.
///
/// A group whose key ends `word` outranks one that merely lists `word`,
/// which outranks a three-letter tail coincidence; longer keys rank higher
/// within a tier. Ties keep file order. The result is deduplicated and never
/// contains `word` itself.
pub fn suffix_matches(word: &str, endings: &[EndingGroup]) -> Vec<String> {
    let mut ranked: Vec<(usize, &EndingGroup)> = endings
        .iter()
        .filter_map(|group| score_group(word, group).map(|score| (score, group)))
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    dedupe(
        ranked
            .iter()
            .flat_map(|(_, group)| group.words.iter().map(String::as_str)),
        word,
    )
}

/// Suggest rhymes for `word`.
///
/// Returns empty results when the word sanitizes to nothing or no bank is
/// loaded. Every list is deduplicated, excludes the query word and holds at
/// most `limit` entries.
///
/// ```
/// use orphan_studio_core::resolver::get_rhymes;
/// use orphan_studio_core::rhyme_data::RhymeData;
///
/// let data = RhymeData::from_json_str(
///     r#"{"dictionary": {"light": {"perfect": ["night", "sight"], "near": ["bright"], "family": ["dark"]}}}"#,
/// )
/// .unwrap();
/// let rhymes = get_rhymes("LIGHT!!", Some(&data), 18);
/// assert_eq!(rhymes.perfect, ["night", "sight"]);
/// assert_eq!(rhymes.near, ["bright"]);
/// assert_eq!(rhymes.family, ["dark"]);
/// ```
#[tracing::instrument(skip(data), fields(has_data = data.is_some()))]
pub fn get_rhymes(word: &str, data: Option<&RhymeData>, limit: usize) -> RhymeResults {
    let clean = sanitize_word(word);
    let Some(data) = data else {
        return RhymeResults::empty();
    };
    if clean.is_empty() {
        return RhymeResults::empty();
    }

    if let Some(direct) = data.dictionary.get(&clean) {
        tracing::trace!(word = %clean, "dictionary hit");
        return RhymeResults {
            perfect: capped(direct.perfect.iter().map(String::as_str), &clean, limit),
            near: capped(direct.near.iter().map(String::as_str), &clean, limit),
            family: capped(direct.family.iter().map(String::as_str), &clean, limit),
        };
    }

    tracing::trace!(word = %clean, "no dictionary entry, using ending groups");
    let suffix = suffix_matches(&clean, &data.endings);
    let bank: Vec<String> = data.word_bank.iter().map(|w| sanitize_word(w)).collect();

    let perfect = capped(suffix.iter().map(String::as_str), &clean, limit);

    let ending = tail(&clean, 2);
    let near = capped(
        suffix
            .iter()
            .skip(limit.min(NEAR_SPILLOVER))
            .chain(bank.iter().filter(|entry| entry.contains(ending)))
            .map(String::as_str),
        &clean,
        limit,
    );

    let initial = &clean[..1];
    let family = capped(
        bank.iter()
            .filter(|entry| entry.starts_with(initial))
            .map(String::as_str),
        &clean,
        limit,
    );

    RhymeResults {
        perfect,
        near,
        family,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rhyme_data::RhymeSet;
    use std::collections::HashMap;

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    fn group(key: &str, words: &[&str]) -> EndingGroup {
        EndingGroup {
            key: key.to_string(),
            words: strings(words),
        }
    }

    fn light_data() -> RhymeData {
        let mut dictionary = HashMap::new();
        dictionary.insert(
            "light".to_string(),
            RhymeSet {
                perfect: strings(&["night", "sight"]),
                near: strings(&["bright"]),
                family: strings(&["dark"]),
            },
        );
        RhymeData {
            dictionary,
            endings: vec![group("-ight", &["fight", "might"])],
            word_bank: strings(&["lantern", "lamp"]),
        }
    }

    #[test]
    fn direct_hit_sanitizes_query() {
        let data = light_data();
        let rhymes = get_rhymes("LIGHT!!", Some(&data), DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(rhymes.perfect, strings(&["night", "sight"]));
        assert_eq!(rhymes.near, strings(&["bright"]));
        assert_eq!(rhymes.family, strings(&["dark"]));
    }

    #[test]
    fn direct_hit_skips_heuristics() {
        let data = light_data();
        let rhymes = get_rhymes("light", Some(&data), DEFAULT_SUGGESTION_LIMIT);
        // "fight" and "lamp" would only come from the ending group and word bank.
        assert!(!rhymes.perfect.contains(&"fight".to_string()));
        assert!(!rhymes.family.contains(&"lamp".to_string()));
    }

    #[test]
    fn direct_hit_dedupes_excludes_and_truncates() {
        let mut data = RhymeData::empty();
        data.dictionary.insert(
            "flow".to_string(),
            RhymeSet {
                perfect: strings(&["Go", "go", "flow", "show", "", "know"]),
                near: strings(&["FLOW!"]),
                family: Vec::new(),
            },
        );
        let rhymes = get_rhymes("flow", Some(&data), 2);
        assert_eq!(rhymes.perfect, strings(&["go", "show"]));
        assert!(rhymes.near.is_empty());
    }

    #[test]
    fn no_data_or_empty_word_is_empty() {
        let data = light_data();
        assert!(get_rhymes("light", None, 18).is_empty());
        assert!(get_rhymes("", Some(&data), 18).is_empty());
        assert!(get_rhymes("!!! 42", Some(&data), 18).is_empty());
    }

    #[test]
    fn unknown_word_in_empty_bank_is_empty() {
        let data = RhymeData::empty();
        assert_eq!(get_rhymes("anything", Some(&data), 18), RhymeResults::empty());
    }

    #[test]
    fn exact_ending_outranks_catalogued_and_tail() {
        let endings = vec![
            group("zzght", &["tail"]),
            group("-ow", &["catalogued", "glow"]),
            group("-ight", &["fight", "might"]),
        ];
        // "glow" ends with neither "ight" nor "zzght"; it is catalogued under "-ow".
        // For "night": "-ight" ends the word (6), "zzght" shares "ght" (1).
        let matches = suffix_matches("night", &endings);
        assert_eq!(matches, strings(&["fight", "might", "tail"]));
    }

    #[test]
    fn catalogued_word_matches_its_group() {
        let endings = vec![group("-ight", &["night"]), group("-ow", &["flow", "Glow"])];
        let matches = suffix_matches("glow", &endings);
        // "-ow" ends "glow" directly; "glow" itself is excluded.
        assert_eq!(matches, strings(&["flow"]));

        let endings = vec![group("-ane", &["rain", "Plain", "brain"])];
        let matches = suffix_matches("plain", &endings);
        assert_eq!(matches, strings(&["rain", "brain"]));
    }

    #[test]
    fn catalogued_beats_tail_coincidence() {
        let endings = vec![
            group("xain", &["tail-match"]),
            group("-ane", &["plain", "crane"]),
        ];
        // "-ane" lists "plain" (score 4); "xain" shares "ain" (score 1).
        let matches = suffix_matches("plain", &endings);
        assert_eq!(matches, strings(&["crane", "tailmatch"]));
    }

    #[test]
    fn longer_key_wins_within_tier() {
        let endings = vec![group("-t", &["bet"]), group("-ight", &["fight"])];
        let matches = suffix_matches("night", &endings);
        assert_eq!(matches, strings(&["fight", "bet"]));
    }

    #[test]
    fn empty_keys_are_ignored() {
        let endings = vec![group("--", &["night"]), group("", &["sight"])];
        assert!(suffix_matches("night", &endings).is_empty());
    }

    #[test]
    fn short_keys_never_tail_match() {
        let endings = vec![group("ht", &["x"])];
        // "ht" ends "night", so this is an ending match, not a tail match.
        assert_eq!(suffix_matches("night", &endings), strings(&["x"]));
        // Two-letter key that neither ends nor catalogues the word contributes nothing.
        assert!(suffix_matches("flow", &endings).is_empty());
    }

    #[test]
    fn heuristic_path_fills_all_lists() {
        let data = RhymeData {
            dictionary: HashMap::new(),
            endings: vec![group(
                "-ight",
                &["fight", "might", "sight", "tight", "bite", "kite", "white", "write"],
            )],
            word_bank: strings(&["nightly", "nine", "ghost", "north"]),
        };
        let rhymes = get_rhymes("night", Some(&data), DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(rhymes.perfect.len(), 8);
        // Spillover past the sixth suffix match, then word-bank entries containing "ht".
        assert_eq!(rhymes.near, strings(&["white", "write", "nightly"]));
        assert_eq!(rhymes.family, strings(&["nightly", "nine", "north"]));
    }

    #[test]
    fn small_limit_shrinks_spillover() {
        let data = RhymeData {
            dictionary: HashMap::new(),
            endings: vec![group("-ow", &["go", "show", "know", "slow"])],
            word_bank: Vec::new(),
        };
        let rhymes = get_rhymes("flow", Some(&data), 2);
        assert_eq!(rhymes.perfect, strings(&["go", "show"]));
        assert_eq!(rhymes.near, strings(&["know", "slow"]));
    }

    #[test]
    fn query_word_never_suggested() {
        let data = RhymeData {
            dictionary: HashMap::new(),
            endings: vec![group("-ow", &["flow", "glow", "Flow"])],
            word_bank: strings(&["flow", "FLOW", "float"]),
        };
        let rhymes = get_rhymes("Flow", Some(&data), DEFAULT_SUGGESTION_LIMIT);
        for list in [&rhymes.perfect, &rhymes.near, &rhymes.family] {
            assert!(!list.contains(&"flow".to_string()), "{list:?}");
        }
        assert_eq!(rhymes.family, strings(&["float"]));
    }

    #[test]
    fn single_letter_word_uses_whole_word_as_tail() {
        let data = RhymeData {
            dictionary: HashMap::new(),
            endings: Vec::new(),
            word_bank: strings(&["bay", "yes", "day"]),
        };
        let rhymes = get_rhymes("y", Some(&data), DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(rhymes.near, strings(&["bay", "yes", "day"]));
        assert_eq!(rhymes.family, strings(&["yes"]));
    }

    #[test]
    fn results_truncate() {
        let results = RhymeResults {
            perfect: strings(&["a", "b", "c"]),
            near: strings(&["d"]),
            family: Vec::new(),
        }
        .truncated(2);
        assert_eq!(results.perfect, strings(&["a", "b"]));
        assert_eq!(results.near, strings(&["d"]));
    }

    #[test]
    fn bundled_bank_suggests_for_unknown_word() {
        let data = RhymeData::bundled().unwrap();
        let rhymes = get_rhymes("moonlight", Some(&data), DEFAULT_SUGGESTION_LIMIT);
        assert!(!rhymes.perfect.is_empty());
        assert!(rhymes.perfect.len() <= DEFAULT_SUGGESTION_LIMIT);
    }
}
