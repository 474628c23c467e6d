//! Stats command implementation

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use orphan_studio_core::studio::LyricStats;

/// Arguments for the `stats` subcommand.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Lyrics file.
    pub file: Utf8PathBuf,
}

/// Print word, line and character counts.
#[instrument(name = "cmd_stats", skip_all, fields(file = %args.file))]
pub fn cmd_stats(args: StatsArgs, global_json: bool, max_input: Option<usize>) -> anyhow::Result<()> {
    debug!("executing stats command");

    let content = super::read_input_file(&args.file, max_input)?;
    let stats = LyricStats::from_lyrics(&content);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}: {}", "Words".dimmed(), stats.words);
        println!("{}: {}", "Lines".dimmed(), stats.lines);
        println!("{}: {}", "Characters".dimmed(), stats.chars);
    }

    Ok(())
}
