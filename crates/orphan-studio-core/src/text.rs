//! Text processing utilities.
//!
//! Provides word sanitization and caret-based word extraction for the
//! rhyme resolver and the studio editor.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Everything that may not appear in a sanitized word.
static NON_WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z']+").expect("valid regex"));

/// Normalize raw input into a canonical rhyme token.
///
/// Lowercases, then strips every character outside `[a-z']`. Total and
/// idempotent: the empty string maps to itself.
///
/// ```
/// use orphan_studio_core::text::sanitize_word;
///
/// assert_eq!(sanitize_word("LIGHT!!"), "light");
/// assert_eq!(sanitize_word("Don't"), "don't");
/// assert_eq!(sanitize_word("  42 "), "");
/// ```
pub fn sanitize_word(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    NON_WORD_PATTERN
        .replace_all(&lowered, "")
        .trim()
        .to_string()
}

/// Characters that belong to a word under the caret.
const fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '\''
}

/// Character range of the word touching `cursor`.
///
/// `cursor` is a character offset and is clamped to the text length. The
/// range is empty (`cursor..cursor`) when neither neighbour is a word
/// character.
pub fn word_bounds_at_cursor(text: &str, cursor: usize) -> Range<usize> {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    let mut start = cursor;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }

    let mut end = cursor;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }

    start..end
}

/// Extract the sanitized word the caret currently rests in.
///
/// A caret directly before or after a word selects that word; a caret
/// surrounded by non-word characters yields an empty string.
///
/// ```
/// use orphan_studio_core::text::extract_word_at_cursor;
///
/// assert_eq!(extract_word_at_cursor("hello world", 5), "hello");
/// assert_eq!(extract_word_at_cursor("hello world", 6), "world");
/// assert_eq!(extract_word_at_cursor("hello  world", 6), "");
/// ```
pub fn extract_word_at_cursor(text: &str, cursor: usize) -> String {
    let bounds = word_bounds_at_cursor(text, cursor);
    let word: String = text
        .chars()
        .skip(bounds.start)
        .take(bounds.len())
        .collect();
    sanitize_word(&word)
}

/// Last `n` characters of an already sanitized (ASCII) word.
///
/// Shorter words are returned whole.
pub(crate) fn tail(word: &str, n: usize) -> &str {
    &word[word.len().saturating_sub(n)..]
}
