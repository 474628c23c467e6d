//! Cursor command: the word under a caret in a lyrics file.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use orphan_studio_core::studio::Editor;
use orphan_studio_core::{RhymeData, RhymeResults};

/// Arguments for the `cursor` subcommand.
#[derive(Args, Debug)]
pub struct CursorArgs {
    /// Lyrics file.
    pub file: Utf8PathBuf,

    /// Caret position in characters (default: end of file).
    #[arg(long)]
    pub offset: Option<usize>,

    /// Maximum suggestions per category.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct CursorReport {
    caret: usize,
    word: String,
    rhymes: RhymeResults,
}

/// Print the word under the caret and its suggestions.
#[instrument(name = "cmd_cursor", skip_all, fields(file = %args.file))]
pub fn cmd_cursor(
    args: CursorArgs,
    global_json: bool,
    data: &RhymeData,
    config_limit: usize,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    debug!(offset = ?args.offset, "executing cursor command");

    let content = super::read_input_file(&args.file, max_input)?;
    let mut editor = Editor::new();
    editor.set_lyrics(&content, args.offset);

    let report = CursorReport {
        caret: editor.caret(),
        word: editor.current_word().to_string(),
        rhymes: editor.suggestions(data, args.limit.unwrap_or(config_limit)),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.word.is_empty() {
        println!(
            "{} {}",
            "No word at caret".yellow(),
            format!("({})", report.caret).dimmed()
        );
    } else {
        println!(
            "{} {}",
            report.word.bold(),
            format!("(caret {})", report.caret).dimmed()
        );
        super::print_rhymes(&report.rhymes);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn lyrics_file(tmp: &TempDir, text: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(tmp.path().join("bars.txt")).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn reads_word_at_end() {
        let tmp = TempDir::new().unwrap();
        let args = CursorArgs {
            file: lyrics_file(&tmp, "into the light"),
            offset: None,
            limit: None,
        };
        let data = RhymeData::bundled().unwrap();
        assert!(cmd_cursor(args, true, &data, 18, None).is_ok());
    }

    #[test]
    fn oversized_input_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let args = CursorArgs {
            file: lyrics_file(&tmp, "into the light"),
            offset: Some(0),
            limit: None,
        };
        assert!(cmd_cursor(args, false, &RhymeData::empty(), 18, Some(3)).is_err());
    }
}
