//! Rhymes command: suggestions for a single word.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use orphan_studio_core::{RhymeData, RhymeResults, get_rhymes, sanitize_word};

/// Arguments for the `rhymes` subcommand.
#[derive(Args, Debug)]
pub struct RhymesArgs {
    /// Word to find rhymes for.
    pub word: String,

    /// Maximum suggestions per category.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Use the larger explore-view limit.
    #[arg(long, conflicts_with = "limit")]
    pub explore: bool,
}

#[derive(Serialize)]
struct RhymesReport {
    word: String,
    #[serde(flatten)]
    rhymes: RhymeResults,
}

/// Print rhyme suggestions for a word.
///
/// # Arguments
/// * `suggestion_limit` - Configured live limit
/// * `explore_limit` - Configured explore limit
#[instrument(name = "cmd_rhymes", skip_all, fields(word = %args.word))]
pub fn cmd_rhymes(
    args: RhymesArgs,
    global_json: bool,
    data: &RhymeData,
    suggestion_limit: usize,
    explore_limit: usize,
) -> anyhow::Result<()> {
    let limit = match (args.limit, args.explore) {
        (Some(limit), _) => limit,
        (None, true) => explore_limit,
        (None, false) => suggestion_limit,
    };
    debug!(limit, explore = args.explore, "executing rhymes command");

    let report = RhymesReport {
        word: sanitize_word(&args.word),
        rhymes: get_rhymes(&args.word, Some(data), limit),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.word.is_empty() {
        println!("{}", "No word to rhyme.".yellow());
        return Ok(());
    }
    println!("{}", report.word.bold());
    super::print_rhymes(&report.rhymes);
    Ok(())
}
