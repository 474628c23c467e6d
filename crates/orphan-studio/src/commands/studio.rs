//! Studio command: a line-oriented writing session.
//!
//! Each input line is appended to the draft and the suggestions for its last
//! word are printed. Lines starting with `:` are session commands:
//!
//! | Command | Effect |
//! |---|---|
//! | `:save` | Save now |
//! | `:title TITLE` | Rename the session |
//! | `:rhymes WORD` | Suggestions for any word (explore limit) |
//! | `:use WORD` | Make a suggestion the current word |
//! | `:replace WORD` | Replace the word under the caret |
//! | `:search [QUERY]` | Dictionary search (defaults to the current word) |
//! | `:stats` | Word, line and character counts |
//! | `:autosave on\|off` | Toggle autosave |
//! | `:quit` | End the session |
//!
//! Autosave is checked whenever a line arrives. With autosave on, pending
//! changes are also saved when the session ends.

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use orphan_studio_core::studio::{
    Autosave, Editor, LyricStats, SessionStore, StudioSettings, StudioSnapshot,
};
use orphan_studio_core::{RhymeData, RhymeResults, get_rhymes, sanitize_word, search_rhyme_words};

/// Arguments for the `studio` subcommand.
#[derive(Args, Debug, Default)]
pub struct StudioArgs {
    /// Session file (overrides config and the default location).
    #[arg(long, value_name = "FILE")]
    pub session: Option<Utf8PathBuf>,

    /// Ignore the saved session and start an empty draft.
    #[arg(long)]
    pub fresh: bool,

    /// Title for the session.
    #[arg(long)]
    pub title: Option<String>,
}

/// Limits and timing for a studio session.
#[derive(Debug, Clone, Copy)]
pub struct StudioOptions {
    /// Suggestions per category after each line.
    pub suggestion_limit: usize,
    /// Suggestions per category for `:rhymes`.
    pub explore_limit: usize,
    /// Results for `:search`.
    pub search_limit: usize,
    /// Autosave quiet period.
    pub debounce: Duration,
}

/// One line of session output.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum StudioEvent<'a> {
    Opened {
        title: &'a str,
        path: &'a str,
        restored: bool,
        autosave: bool,
    },
    Suggestions {
        word: &'a str,
        #[serde(flatten)]
        rhymes: RhymeResults,
    },
    Search {
        query: String,
        results: Vec<String>,
    },
    Stats(LyricStats),
    Title {
        title: &'a str,
    },
    Replaced {
        word: &'a str,
        replaced: bool,
    },
    Autosave {
        enabled: bool,
        status: &'static str,
    },
    Saved {
        path: &'a str,
        at: &'a str,
        auto: bool,
    },
    SaveFailed {
        error: String,
    },
    Unknown {
        input: &'a str,
    },
}

/// Writes events as JSON Lines or as text.
struct Printer<W> {
    out: W,
    json: bool,
}

impl<W: Write> Printer<W> {
    fn emit(&mut self, event: &StudioEvent<'_>) -> anyhow::Result<()> {
        if self.json {
            serde_json::to_writer(&mut self.out, event)?;
            writeln!(self.out)?;
        } else {
            self.emit_text(event)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn emit_text(&mut self, event: &StudioEvent<'_>) -> std::io::Result<()> {
        let out = &mut self.out;
        match event {
            StudioEvent::Opened {
                title,
                path,
                restored,
                autosave,
            } => {
                let state = if *restored { "restored" } else { "new session" };
                writeln!(out, "{} {}", title.bold(), format!("({state})").dimmed())?;
                writeln!(out, "{}: {}", "Session".dimmed(), path.cyan())?;
                let label = if *autosave { "Autosave on" } else { "Autosave off" };
                writeln!(out, "{}", label.dimmed())
            }
            StudioEvent::Suggestions { word, rhymes } => {
                if word.is_empty() {
                    return writeln!(out, "{}", "No word at caret".dimmed());
                }
                writeln!(out, "{}", word.bold())?;
                for (label, words) in [
                    ("Perfect", &rhymes.perfect),
                    ("Near", &rhymes.near),
                    ("Family", &rhymes.family),
                ] {
                    if words.is_empty() {
                        writeln!(out, "  {}: {}", label.dimmed(), "(none)".dimmed())?;
                    } else {
                        writeln!(out, "  {}: {}", label.dimmed(), words.join(", "))?;
                    }
                }
                Ok(())
            }
            StudioEvent::Search { query, results } => {
                if results.is_empty() {
                    writeln!(out, "{} {}", "No matches for".yellow(), query)
                } else {
                    writeln!(out, "{}", results.join(", "))
                }
            }
            StudioEvent::Stats(stats) => writeln!(
                out,
                "{} words, {} lines, {} characters",
                stats.words, stats.lines, stats.chars
            ),
            StudioEvent::Title { title } => writeln!(out, "{}: {}", "Title".dimmed(), title),
            StudioEvent::Replaced { word, replaced } => {
                let verb = if *replaced { "Replaced with" } else { "Inserted" };
                writeln!(out, "{} {}", verb.dimmed(), word.bold())
            }
            StudioEvent::Autosave { status, .. } => writeln!(out, "{}", status.dimmed()),
            StudioEvent::Saved { at, auto, .. } => {
                let label = if *auto { "Autosaved" } else { "Saved" };
                writeln!(out, "{} {}", label.green(), at.dimmed())
            }
            StudioEvent::SaveFailed { error } => {
                writeln!(out, "{} {}", "Save failed:".red(), error)
            }
            StudioEvent::Unknown { input } => {
                writeln!(out, "{} {}", "Unknown command:".yellow(), input)
            }
        }
    }
}

/// An open studio session.
struct Session<'a> {
    editor: Editor,
    settings: StudioSettings,
    last_saved_at: Option<String>,
    autosave: Autosave,
    store: &'a SessionStore,
    data: &'a RhymeData,
    options: StudioOptions,
}

impl Session<'_> {
    fn snapshot(&self) -> StudioSnapshot {
        self.editor
            .to_snapshot(self.settings, self.last_saved_at.clone())
    }

    /// Save the draft, reporting success or failure.
    fn save<W: Write>(&mut self, printer: &mut Printer<W>, auto: bool) -> anyhow::Result<()> {
        let mut snapshot = self.snapshot();
        match self.store.save(&mut snapshot) {
            Ok(()) => {
                self.last_saved_at = snapshot.last_saved_at;
                self.autosave.mark_saved();
                let at = self.last_saved_at.as_deref().unwrap_or_default();
                printer.emit(&StudioEvent::Saved {
                    path: self.store.path().as_str(),
                    at,
                    auto,
                })
            }
            Err(e) => {
                warn!(error = %e, auto, "session save failed");
                printer.emit(&StudioEvent::SaveFailed {
                    error: e.to_string(),
                })
            }
        }
    }

    fn changed(&mut self) {
        self.autosave.note_change(Instant::now());
    }

    fn suggestions<W: Write>(&self, printer: &mut Printer<W>) -> anyhow::Result<()> {
        printer.emit(&StudioEvent::Suggestions {
            word: self.editor.current_word(),
            rhymes: self
                .editor
                .suggestions(self.data, self.options.suggestion_limit),
        })
    }

    /// Handle one input line. Returns `false` when the session should end.
    fn handle<W: Write>(&mut self, line: &str, printer: &mut Printer<W>) -> anyhow::Result<bool> {
        let Some(command) = line.strip_prefix(':') else {
            self.editor.append_line(line);
            self.changed();
            self.suggestions(printer)?;
            return Ok(true);
        };

        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, rest)| (name, rest.trim()));

        match name {
            "quit" | "q" => return Ok(false),
            "save" | "w" => self.save(printer, false)?,
            "title" if !rest.is_empty() => {
                self.editor.set_title(rest);
                self.changed();
                printer.emit(&StudioEvent::Title {
                    title: self.editor.title(),
                })?;
            }
            "title" => printer.emit(&StudioEvent::Title {
                title: self.editor.title(),
            })?,
            "rhymes" => {
                let word = sanitize_word(rest);
                printer.emit(&StudioEvent::Suggestions {
                    word: &word,
                    rhymes: get_rhymes(&word, Some(self.data), self.options.explore_limit),
                })?;
            }
            "use" => {
                self.editor.use_suggestion(rest);
                self.suggestions(printer)?;
            }
            "replace" if !sanitize_word(rest).is_empty() => {
                let replaced = self.editor.replace_word_at_caret(rest);
                self.changed();
                printer.emit(&StudioEvent::Replaced {
                    word: rest,
                    replaced,
                })?;
                self.suggestions(printer)?;
            }
            "search" => {
                let query = if rest.is_empty() {
                    self.editor.current_word().to_string()
                } else {
                    sanitize_word(rest)
                };
                let results = search_rhyme_words(&query, Some(self.data), self.options.search_limit);
                printer.emit(&StudioEvent::Search { query, results })?;
            }
            "stats" => printer.emit(&StudioEvent::Stats(self.editor.stats()))?,
            "autosave" if matches!(rest, "on" | "off") => {
                let enabled = rest == "on";
                self.settings.autosave = enabled;
                self.autosave.set_enabled(enabled);
                self.changed();
                printer.emit(&StudioEvent::Autosave {
                    enabled,
                    status: self.autosave.label(),
                })?;
            }
            _ => printer.emit(&StudioEvent::Unknown { input: line })?,
        }
        Ok(true)
    }
}

/// Run a writing session over stdin and stdout.
#[instrument(name = "cmd_studio", skip_all)]
pub fn cmd_studio(
    args: StudioArgs,
    global_json: bool,
    data: &RhymeData,
    store: &SessionStore,
    options: StudioOptions,
) -> anyhow::Result<()> {
    debug!(path = %store.path(), fresh = args.fresh, "executing studio command");
    let stdin = std::io::stdin();
    run_studio(
        &args,
        stdin.lock(),
        std::io::stdout().lock(),
        global_json,
        data,
        store,
        options,
    )
}

fn run_studio<R: BufRead, W: Write>(
    args: &StudioArgs,
    input: R,
    out: W,
    json: bool,
    data: &RhymeData,
    store: &SessionStore,
    options: StudioOptions,
) -> anyhow::Result<()> {
    let mut printer = Printer { out, json };

    let saved = if args.fresh { None } else { store.load() };
    let restored = saved.is_some();
    let snapshot = saved.unwrap_or_default();

    let mut session = Session {
        editor: Editor::from_snapshot(&snapshot),
        settings: snapshot.settings,
        last_saved_at: snapshot.last_saved_at,
        autosave: Autosave::new(snapshot.settings.autosave, options.debounce),
        store,
        data,
        options,
    };
    if let Some(title) = args.title.as_deref() {
        session.editor.set_title(title);
        session.changed();
    }

    printer.emit(&StudioEvent::Opened {
        title: session.editor.title(),
        path: store.path().as_str(),
        restored,
        autosave: session.autosave.is_enabled(),
    })?;
    if !session.editor.lyrics().is_empty() {
        session.suggestions(&mut printer)?;
    }

    let mut read_error = None;
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "studio input ended with a read error");
                read_error = Some(e);
                break;
            }
        };
        if session.autosave.is_due(Instant::now()) {
            session.save(&mut printer, true)?;
        }
        if !session.handle(&line, &mut printer)? {
            break;
        }
    }

    if session.autosave.is_enabled() && session.autosave.is_pending() {
        session.save(&mut printer, true)?;
    }
    debug!(stats = ?session.editor.stats(), "studio session ended");
    match read_error {
        Some(e) => Err(e).context("failed to read input"),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orphan_studio_core::studio::FontSize;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn options(debounce: Duration) -> StudioOptions {
        StudioOptions {
            suggestion_limit: 18,
            explore_limit: 140,
            search_limit: 120,
            debounce,
        }
    }

    fn data() -> RhymeData {
        RhymeData::from_json_str(
            r#"{"dictionary": {"light": {"perfect": ["night", "sight"], "near": ["bright"], "family": ["dark"]}},
                "wordBank": ["night", "sight", "delight"]}"#,
        )
        .unwrap()
    }

    fn store(tmp: &TempDir) -> SessionStore {
        SessionStore::new(Utf8PathBuf::try_from(tmp.path().join("session.json")).unwrap())
    }

    fn run(
        args: &StudioArgs,
        input: &str,
        store: &SessionStore,
        debounce: Duration,
    ) -> Vec<serde_json::Value> {
        let mut out = Vec::new();
        run_studio(
            args,
            Cursor::new(input.as_bytes()),
            &mut out,
            true,
            &data(),
            store,
            options(debounce),
        )
        .unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn events<'a>(output: &'a [serde_json::Value], name: &str) -> Vec<&'a serde_json::Value> {
        output.iter().filter(|e| e["event"] == name).collect()
    }

    #[test]
    fn lines_produce_suggestions() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let output = run(
            &StudioArgs::default(),
            "into the light\n",
            &store,
            Duration::from_secs(60),
        );

        let suggestions = events(&output, "suggestions");
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0]["word"], "light");
        assert_eq!(suggestions[0]["perfect"][0], "night");
    }

    #[test]
    fn pending_changes_saved_at_exit() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let output = run(
            &StudioArgs::default(),
            "first bar\nsecond bar\n",
            &store,
            Duration::from_secs(60),
        );

        let saved = events(&output, "saved");
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0]["auto"], true);

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.lyrics, "first bar\nsecond bar");
        assert!(snapshot.last_saved_at.is_some());
    }

    #[test]
    fn read_error_still_saves_pending_lyrics() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let mut out = Vec::new();
        let result = run_studio(
            &StudioArgs::default(),
            Cursor::new(&b"first bar worth keeping\ncaf\xe9\n"[..]),
            &mut out,
            true,
            &data(),
            &store,
            options(Duration::from_secs(60)),
        );

        let err = result.expect_err("invalid UTF-8 should surface as an error");
        assert!(err.to_string().contains("failed to read input"));
        let snapshot = store.load().expect("pending lyrics should be saved");
        assert_eq!(snapshot.lyrics, "first bar worth keeping");
        assert!(String::from_utf8(out).unwrap().contains("\"event\":\"saved\""));
    }

    #[test]
    fn bare_search_uses_current_word() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let output = run(
            &StudioArgs::default(),
            "into the light\n:search\n:quit\n",
            &store,
            Duration::from_secs(60),
        );

        let search = events(&output, "search");
        assert_eq!(search[0]["query"], "light");
        assert_eq!(search[0]["results"][0], "light");
        assert!(
            search[0]["results"]
                .as_array()
                .unwrap()
                .iter()
                .any(|w| w == "delight")
        );
    }

    #[test]
    fn autosave_fires_after_debounce() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let output = run(&StudioArgs::default(), "one\ntwo\n", &store, Duration::ZERO);

        // Once when the second line arrives, once at exit.
        assert_eq!(events(&output, "saved").len(), 2);
    }

    #[test]
    fn autosave_off_keeps_changes_unsaved() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let output = run(
            &StudioArgs::default(),
            ":autosave off\nbars\n:quit\n",
            &store,
            Duration::ZERO,
        );

        assert!(events(&output, "saved").is_empty());
        assert_eq!(events(&output, "autosave")[0]["status"], "Autosave off");
        assert!(store.load().is_none());
    }

    #[test]
    fn explicit_save_works_with_autosave_off() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let output = run(
            &StudioArgs::default(),
            ":autosave off\nbars\n:save\n",
            &store,
            Duration::from_secs(60),
        );

        let saved = events(&output, "saved");
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0]["auto"], false);
        let snapshot = store.load().unwrap();
        assert!(!snapshot.settings.autosave);
    }

    #[test]
    fn session_is_restored() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let mut snapshot = StudioSnapshot {
            title: "Night Shift".to_string(),
            lyrics: "chasing the light".to_string(),
            settings: StudioSettings {
                font_size: FontSize::Lg,
                ..StudioSettings::default()
            },
            last_saved_at: None,
        };
        store.save(&mut snapshot).unwrap();

        let output = run(
            &StudioArgs::default(),
            ":stats\n:quit\n",
            &store,
            Duration::from_secs(60),
        );
        let opened = events(&output, "opened");
        assert_eq!(opened[0]["title"], "Night Shift");
        assert_eq!(opened[0]["restored"], true);
        assert_eq!(events(&output, "suggestions")[0]["word"], "light");
        assert_eq!(events(&output, "stats")[0]["words"], 3);
        // Nothing changed, so nothing saved.
        assert!(events(&output, "saved").is_empty());
        assert_eq!(store.load().unwrap().settings.font_size, FontSize::Lg);
    }

    #[test]
    fn fresh_ignores_saved_session() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let mut snapshot = StudioSnapshot {
            lyrics: "old bars".to_string(),
            ..StudioSnapshot::default()
        };
        store.save(&mut snapshot).unwrap();

        let args = StudioArgs {
            fresh: true,
            title: Some("Take Two".to_string()),
            ..StudioArgs::default()
        };
        let output = run(&args, "new bars\n", &store, Duration::from_secs(60));
        assert_eq!(events(&output, "opened")[0]["restored"], false);

        let saved = store.load().unwrap();
        assert_eq!(saved.title, "Take Two");
        assert_eq!(saved.lyrics, "new bars");
    }

    #[test]
    fn commands_report_results() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let input = ":title Demo\n:rhymes LIGHT\n:search ight\n:use sight\n:bogus\n:quit\n";
        let output = run(&StudioArgs::default(), input, &store, Duration::from_secs(60));

        assert_eq!(events(&output, "title")[0]["title"], "Demo");
        let suggestions = events(&output, "suggestions");
        assert_eq!(suggestions[0]["word"], "light");
        assert_eq!(suggestions[1]["word"], "sight");
        assert_eq!(events(&output, "search")[0]["results"][0], "light");
        assert_eq!(events(&output, "unknown")[0]["input"], ":bogus");
    }

    #[test]
    fn replace_swaps_word_under_caret() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let output = run(
            &StudioArgs::default(),
            "into the light\n:replace night\n",
            &store,
            Duration::from_secs(60),
        );

        assert_eq!(events(&output, "replaced")[0]["replaced"], true);
        assert_eq!(store.load().unwrap().lyrics, "into the night");
    }

    #[test]
    fn text_output_is_plain_lines() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let mut out = Vec::new();
        run_studio(
            &StudioArgs::default(),
            Cursor::new("into the light\n".as_bytes()),
            &mut out,
            false,
            &data(),
            &store,
            options(Duration::from_secs(60)),
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("night, sight"));
        assert!(text.contains("Autosaved"));
    }
}
