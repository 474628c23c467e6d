//! Editor state: lyrics, caret and the word under it.
//!
//! The current word is recomputed whenever the text or caret changes, which
//! is what drives the live rhyme sidebar.

use crate::resolver::{RhymeResults, get_rhymes};
use crate::rhyme_data::RhymeData;
use crate::text::{extract_word_at_cursor, sanitize_word, word_bounds_at_cursor};

use super::session::{DEFAULT_TITLE, StudioSettings, StudioSnapshot};
use super::stats::LyricStats;

/// Lyric editor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    title: String,
    lyrics: String,
    caret: usize,
    current_word: String,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Empty, untitled draft.
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            lyrics: String::new(),
            caret: 0,
            current_word: String::new(),
        }
    }

    /// Restore a saved draft with the caret at the end.
    pub fn from_snapshot(snapshot: &StudioSnapshot) -> Self {
        let mut editor = Self::new();
        editor.title.clone_from(&snapshot.title);
        editor.set_lyrics(&snapshot.lyrics, None);
        editor
    }

    /// Snapshot of the draft with the given settings.
    pub fn to_snapshot(
        &self,
        settings: StudioSettings,
        last_saved_at: Option<String>,
    ) -> StudioSnapshot {
        StudioSnapshot {
            title: self.title.clone(),
            lyrics: self.lyrics.clone(),
            settings,
            last_saved_at,
        }
    }

    /// Session title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rename the session.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Draft text.
    pub fn lyrics(&self) -> &str {
        &self.lyrics
    }

    /// Caret position in characters.
    pub const fn caret(&self) -> usize {
        self.caret
    }

    /// Sanitized word under the caret; empty when there is none.
    pub fn current_word(&self) -> &str {
        &self.current_word
    }

    /// Replace the draft. `caret` of `None` puts the caret at the end.
    pub fn set_lyrics(&mut self, text: &str, caret: Option<usize>) -> &str {
        self.lyrics = text.to_string();
        let end = self.char_len();
        self.move_caret(caret.unwrap_or(end))
    }

    /// Move the caret (clamped to the text) and return the new current word.
    pub fn move_caret(&mut self, caret: usize) -> &str {
        self.caret = caret.min(self.char_len());
        self.current_word = extract_word_at_cursor(&self.lyrics, self.caret);
        &self.current_word
    }

    /// Append a line to the draft and put the caret at the end.
    pub fn append_line(&mut self, line: &str) -> &str {
        let mut text = std::mem::take(&mut self.lyrics);
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line);
        self.set_lyrics(&text, None)
    }

    /// Make a picked suggestion the current word.
    pub fn use_suggestion(&mut self, word: &str) {
        self.current_word = sanitize_word(word);
    }

    /// Replace the word under the caret with `word`.
    ///
    /// With no word under the caret, `word` is inserted at the caret. The
    /// caret ends up after the inserted text. Returns whether an existing
    /// word was replaced.
    pub fn replace_word_at_caret(&mut self, word: &str) -> bool {
        let bounds = word_bounds_at_cursor(&self.lyrics, self.caret);
        let replaced = !bounds.is_empty();

        let mut text: String = self.lyrics.chars().take(bounds.start).collect();
        text.push_str(word);
        text.extend(self.lyrics.chars().skip(bounds.end));

        let caret = bounds.start + word.chars().count();
        self.lyrics = text;
        self.move_caret(caret);
        replaced
    }

    /// Suggestions for the current word.
    pub fn suggestions(&self, data: &RhymeData, limit: usize) -> RhymeResults {
        if self.current_word.is_empty() {
            return RhymeResults::empty();
        }
        get_rhymes(&self.current_word, Some(data), limit)
    }

    /// Counts for the draft.
    pub fn stats(&self) -> LyricStats {
        LyricStats::from_lyrics(&self.lyrics)
    }

    fn char_len(&self) -> usize {
        self.lyrics.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::DEFAULT_SUGGESTION_LIMIT;
    use crate::studio::session::FontSize;

    fn data() -> RhymeData {
        RhymeData::from_json_str(
            r#"{"dictionary": {"light": {"perfect": ["night", "sight"], "near": ["bright"], "family": ["dark"]}}}"#,
        )
        .unwrap()
    }

    #[test]
    fn new_editor_is_empty() {
        let editor = Editor::new();
        assert_eq!(editor.title(), DEFAULT_TITLE);
        assert_eq!(editor.lyrics(), "");
        assert_eq!(editor.current_word(), "");
    }

    #[test]
    fn set_lyrics_without_caret_uses_end() {
        let mut editor = Editor::new();
        assert_eq!(editor.set_lyrics("chasing the Light", None), "light");
        assert_eq!(editor.caret(), 17);
    }

    #[test]
    fn move_caret_tracks_word() {
        let mut editor = Editor::new();
        editor.set_lyrics("chasing the light", Some(0));
        assert_eq!(editor.current_word(), "chasing");
        assert_eq!(editor.move_caret(9), "the");
        assert_eq!(editor.move_caret(999), "light");
        assert_eq!(editor.caret(), 17);
    }

    #[test]
    fn append_line_joins_with_newline() {
        let mut editor = Editor::new();
        editor.append_line("first bar");
        assert_eq!(editor.append_line("second line, light"), "light");
        assert_eq!(editor.lyrics(), "first bar\nsecond line, light");
    }

    #[test]
    fn trailing_punctuation_clears_word() {
        let mut editor = Editor::new();
        assert_eq!(editor.append_line("end of the line."), "");
    }

    #[test]
    fn suggestions_follow_current_word() {
        let data = data();
        let mut editor = Editor::new();
        editor.set_lyrics("into the light", None);
        let rhymes = editor.suggestions(&data, DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(rhymes.perfect, vec!["night", "sight"]);

        editor.set_lyrics("into the light ", None);
        assert!(editor.suggestions(&data, DEFAULT_SUGGESTION_LIMIT).is_empty());
    }

    #[test]
    fn use_suggestion_sets_current_word() {
        let mut editor = Editor::new();
        editor.set_lyrics("into the light", None);
        editor.use_suggestion("Night");
        assert_eq!(editor.current_word(), "night");
        assert_eq!(editor.lyrics(), "into the light");
    }

    #[test]
    fn replace_word_under_caret() {
        let mut editor = Editor::new();
        editor.set_lyrics("into the light tonight", Some(11));
        assert!(editor.replace_word_at_caret("night"));
        assert_eq!(editor.lyrics(), "into the night tonight");
        assert_eq!(editor.caret(), 14);
        assert_eq!(editor.current_word(), "night");
    }

    #[test]
    fn replace_without_word_inserts() {
        let mut editor = Editor::new();
        editor.set_lyrics("one  two", Some(4));
        assert!(!editor.replace_word_at_caret("more"));
        assert_eq!(editor.lyrics(), "one more two");
        assert_eq!(editor.caret(), 8);
    }

    #[test]
    fn snapshot_round_trip() {
        let mut editor = Editor::new();
        editor.set_title("Demo");
        editor.set_lyrics("bars\nmore bars", None);
        let settings = StudioSettings {
            font_size: FontSize::Lg,
            ..StudioSettings::default()
        };
        let snapshot = editor.to_snapshot(settings, None);
        let restored = Editor::from_snapshot(&snapshot);
        assert_eq!(restored.title(), "Demo");
        assert_eq!(restored.lyrics(), "bars\nmore bars");
        assert_eq!(restored.current_word(), "bars");
        assert_eq!(snapshot.settings.font_size, FontSize::Lg);
    }

    #[test]
    fn stats_count_draft() {
        let mut editor = Editor::new();
        editor.set_lyrics("a b\nc", None);
        assert_eq!(editor.stats().words, 3);
        assert_eq!(editor.stats().lines, 2);
    }
}
