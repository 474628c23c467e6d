//! Session command: show or edit the saved studio snapshot.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, info, instrument};

use orphan_studio_core::studio::{FontSize, LyricStats, SessionStore, StudioSnapshot};

/// Arguments for the `session` subcommand.
#[derive(Args, Debug, Default)]
pub struct SessionArgs {
    /// Session file (overrides config and the default location).
    #[arg(long, value_name = "FILE")]
    pub session: Option<Utf8PathBuf>,

    /// Delete the saved session.
    #[arg(long, conflicts_with_all = ["title", "autosave", "focus_mode", "font_size"])]
    pub clear: bool,

    /// Rename the session.
    #[arg(long)]
    pub title: Option<String>,

    /// Turn autosave on or off.
    #[arg(long, value_name = "BOOL")]
    pub autosave: Option<bool>,

    /// Turn focus mode on or off.
    #[arg(long, value_name = "BOOL")]
    pub focus_mode: Option<bool>,

    /// Editor font size.
    #[arg(long, value_enum)]
    pub font_size: Option<FontSize>,
}

impl SessionArgs {
    const fn has_edits(&self) -> bool {
        self.title.is_some()
            || self.autosave.is_some()
            || self.focus_mode.is_some()
            || self.font_size.is_some()
    }

    fn apply(&self, snapshot: &mut StudioSnapshot) {
        if let Some(ref title) = self.title {
            snapshot.title.clone_from(title);
        }
        if let Some(autosave) = self.autosave {
            snapshot.settings.autosave = autosave;
        }
        if let Some(focus_mode) = self.focus_mode {
            snapshot.settings.focus_mode = focus_mode;
        }
        if let Some(font_size) = self.font_size {
            snapshot.settings.font_size = font_size;
        }
    }
}

#[derive(Serialize)]
struct SessionReport<'a> {
    path: &'a str,
    saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<&'a StudioSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<LyricStats>,
}

/// Show, edit or clear the saved session.
#[instrument(name = "cmd_session", skip_all, fields(path = %store.path()))]
pub fn cmd_session(args: SessionArgs, global_json: bool, store: &SessionStore) -> anyhow::Result<()> {
    debug!(clear = args.clear, edits = args.has_edits(), "executing session command");

    if args.clear {
        store.clear()?;
        info!("session cleared");
        if global_json {
            let report = SessionReport {
                path: store.path().as_str(),
                saved: false,
                snapshot: None,
                stats: None,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{} {}", "Cleared".green(), store.path());
        }
        return Ok(());
    }

    let mut snapshot = store.load();
    if args.has_edits() {
        let mut edited = snapshot.unwrap_or_default();
        args.apply(&mut edited);
        store.save(&mut edited)?;
        snapshot = Some(edited);
    }

    let report = SessionReport {
        path: store.path().as_str(),
        saved: snapshot.is_some(),
        snapshot: snapshot.as_ref(),
        stats: snapshot.as_ref().map(|s| LyricStats::from_lyrics(&s.lyrics)),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let Some(snapshot) = report.snapshot else {
        println!("{}: {}", "Session".dimmed(), report.path.cyan());
        println!("{}", "No saved session.".yellow());
        return Ok(());
    };
    println!("{}", snapshot.title.bold());
    println!("{}: {}", "Session".dimmed(), report.path.cyan());
    match snapshot.last_saved_at {
        Some(ref at) => println!("{}: {}", "Last saved".dimmed(), at),
        None => println!("{}: {}", "Last saved".dimmed(), "never".dimmed()),
    }
    let settings = snapshot.settings;
    println!("{}: {}", "Autosave".dimmed(), on_off(settings.autosave));
    println!("{}: {}", "Focus mode".dimmed(), on_off(settings.focus_mode));
    println!("{}: {}", "Font size".dimmed(), settings.font_size);
    if let Some(stats) = report.stats {
        println!(
            "{}: {} words, {} lines, {} characters",
            "Draft".dimmed(),
            stats.words,
            stats.lines,
            stats.chars
        );
    }

    Ok(())
}

const fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}
