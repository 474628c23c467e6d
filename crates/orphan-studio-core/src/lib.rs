//! Core library for orphan-studio.
//!
//! This crate provides the rhyme suggestion engine and the studio session
//! model used by the `orphan-studio` CLI and any downstream consumers.
//!
//! # Modules
//!
//! - [`text`] - Word sanitization and caret word extraction
//! - [`rhyme_data`] - Rhyme bank model and loading
//! - [`resolver`] - Rhyme suggestions for a word
//! - [`search`] - Substring search over the rhyme vocabulary
//! - [`studio`] - Editor state, settings, snapshots and autosave
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use orphan_studio_core::{DEFAULT_SUGGESTION_LIMIT, get_rhymes, load_rhyme_data};
//!
//! let outcome = load_rhyme_data(None);
//! let rhymes = get_rhymes("light", Some(outcome.data()), DEFAULT_SUGGESTION_LIMIT);
//!
//! println!("Perfect: {:?}", rhymes.perfect);
//! ```
#![deny(unsafe_code)]

pub mod config;

pub mod error;

pub mod resolver;
pub mod rhyme_data;
pub mod search;
pub mod studio;
pub mod text;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};

pub use error::{
    ConfigError, ConfigResult, DataError, DataResult, SessionError, SessionResult,
};

pub use resolver::{
    DEFAULT_SUGGESTION_LIMIT, EXPLORE_SUGGESTION_LIMIT, RhymeResults, get_rhymes, suffix_matches,
};
pub use rhyme_data::{
    DataOrigin, EndingGroup, LoadOutcome, RhymeBankSummary, RhymeData, RhymeSet, load_rhyme_data,
};
pub use search::{DEFAULT_SEARCH_LIMIT, search_rhyme_words};
pub use text::{extract_word_at_cursor, sanitize_word, word_bounds_at_cursor};
