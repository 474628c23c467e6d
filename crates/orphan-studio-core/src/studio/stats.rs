//! Lyric statistics.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Word, line and character counts for a draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LyricStats {
    /// Whitespace-separated tokens.
    pub words: usize,
    /// Newline-separated lines; zero for empty text.
    pub lines: usize,
    /// Characters, including whitespace.
    pub chars: usize,
}

impl LyricStats {
    /// Count the draft.
    pub fn from_lyrics(lyrics: &str) -> Self {
        let words = lyrics.split_whitespace().count();
        let lines = if lyrics.is_empty() {
            0
        } else {
            lyrics.split('\n').count()
        };
        Self {
            words,
            lines,
            chars: lyrics.chars().count(),
        }
    }
}
