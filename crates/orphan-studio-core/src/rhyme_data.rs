//! The static rhyme bank.
//!
//! A rhyme bank has three parts:
//!
//! - a curated `dictionary` of word → [`RhymeSet`],
//! - suffix-keyed [`EndingGroup`]s used when a word has no curated entry,
//! - a flat `wordBank` used as a last resort and for search.
//!
//! The bank is loaded once and never mutated. Loading never fails from the
//! caller's point of view: [`load_rhyme_data`] substitutes the empty bank and
//! reports why through [`LoadOutcome::Fallback`].

use std::collections::HashMap;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};
use crate::text::sanitize_word;

/// Rhyme bank shipped with the library.
const BUNDLED_RHYME_BANK: &str = include_str!("../data/rhymes.json");

/// A curated rhyme entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RhymeSet {
    /// Exact rhymes.
    pub perfect: Vec<String>,
    /// Slant rhymes.
    pub near: Vec<String>,
    /// Related words that share a theme or tone.
    pub family: Vec<String>,
}

impl RhymeSet {
    fn absorb(&mut self, other: Self) {
        self.perfect.extend(other.perfect);
        self.near.extend(other.near);
        self.family.extend(other.family);
    }
}

/// A suffix-indexed fallback bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EndingGroup {
    /// Canonical ending, e.g. `-ight`. Ignored when it sanitizes to nothing.
    pub key: String,
    /// Words carrying (or historically filed under) this ending.
    pub words: Vec<String>,
}

/// The whole rhyme bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RhymeData {
    /// Sanitized word → curated rhymes.
    pub dictionary: HashMap<String, RhymeSet>,
    /// Ending groups, in file order.
    pub endings: Vec<EndingGroup>,
    /// Flat fallback vocabulary.
    pub word_bank: Vec<String>,
}

/// Entry counts for a loaded bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RhymeBankSummary {
    /// Curated dictionary entries.
    pub dictionary_entries: usize,
    /// Ending groups.
    pub ending_groups: usize,
    /// Word bank entries.
    pub word_bank_words: usize,
}

impl RhymeData {
    /// The empty bank. Every query against it yields no suggestions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a rhyme bank from JSON text.
    ///
    /// Missing top-level sections default to empty. Dictionary keys are
    /// sanitized; keys that sanitize to nothing are dropped and keys that
    /// collide are merged.
    pub fn from_json_str(json: &str) -> DataResult<Self> {
        let raw: Self = serde_json::from_str(json)?;
        Ok(raw.normalized())
    }

    /// Read and parse a rhyme bank file.
    pub fn from_path(path: &Utf8Path) -> DataResult<Self> {
        let json = std::fs::read_to_string(path.as_std_path()).map_err(|source| DataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Parse the rhyme bank compiled into the library.
    pub fn bundled() -> DataResult<Self> {
        Self::from_json_str(BUNDLED_RHYME_BANK)
    }

    /// Whether the bank has nothing to suggest from.
    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty() && self.endings.is_empty() && self.word_bank.is_empty()
    }

    /// Entry counts.
    pub fn summary(&self) -> RhymeBankSummary {
        RhymeBankSummary {
            dictionary_entries: self.dictionary.len(),
            ending_groups: self.endings.len(),
            word_bank_words: self.word_bank.len(),
        }
    }

    fn normalized(self) -> Self {
        let mut entries: Vec<(String, RhymeSet)> = self.dictionary.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut dictionary: HashMap<String, RhymeSet> = HashMap::with_capacity(entries.len());
        for (key, set) in entries {
            let key = sanitize_word(&key);
            if key.is_empty() {
                continue;
            }
            dictionary.entry(key).or_default().absorb(set);
        }

        Self {
            dictionary,
            endings: self.endings,
            word_bank: self.word_bank,
        }
    }
}

/// Where a rhyme bank came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOrigin {
    /// The bank compiled into the library.
    Bundled,
    /// A rhyme bank file.
    File(Utf8PathBuf),
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => f.write_str("bundled"),
            Self::File(path) => write!(f, "{path}"),
        }
    }
}

/// Result of loading a rhyme bank.
///
/// Both variants carry a usable bank; `Fallback` holds the empty bank and
/// the reason the real one could not be used.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The bank loaded.
    Loaded {
        /// Loaded bank.
        data: RhymeData,
        /// Source of the bank.
        origin: DataOrigin,
    },
    /// The bank could not be loaded; suggestions are disabled.
    Fallback {
        /// The empty bank.
        data: RhymeData,
        /// Source that failed.
        origin: DataOrigin,
        /// Why it failed.
        reason: DataError,
    },
}

impl LoadOutcome {
    /// The usable bank, real or empty.
    pub const fn data(&self) -> &RhymeData {
        match self {
            Self::Loaded { data, .. } | Self::Fallback { data, .. } => data,
        }
    }

    /// Consume the outcome, keeping the usable bank.
    pub fn into_data(self) -> RhymeData {
        match self {
            Self::Loaded { data, .. } | Self::Fallback { data, .. } => data,
        }
    }

    /// Source that was loaded or attempted.
    pub const fn origin(&self) -> &DataOrigin {
        match self {
            Self::Loaded { origin, .. } | Self::Fallback { origin, .. } => origin,
        }
    }

    /// Whether the empty bank was substituted.
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Load the rhyme bank at `path`, or the bundled bank when `path` is `None`.
///
/// Failures are logged and mapped to the empty bank.
#[tracing::instrument]
pub fn load_rhyme_data(path: Option<&Utf8Path>) -> LoadOutcome {
    let (origin, result) = match path {
        Some(path) => (DataOrigin::File(path.to_path_buf()), RhymeData::from_path(path)),
        None => (DataOrigin::Bundled, RhymeData::bundled()),
    };

    match result {
        Ok(data) => {
            let summary = data.summary();
            tracing::debug!(
                origin = %origin,
                dictionary = summary.dictionary_entries,
                endings = summary.ending_groups,
                word_bank = summary.word_bank_words,
                "rhyme bank loaded"
            );
            LoadOutcome::Loaded { data, origin }
        }
        Err(reason) => {
            tracing::warn!(origin = %origin, error = %reason, "rhyme bank unavailable, suggestions disabled");
            LoadOutcome::Fallback {
                data: RhymeData::empty(),
                origin,
                reason,
            }
        }
    }
}
