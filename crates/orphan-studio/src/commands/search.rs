//! Search command: substring search over the rhyme vocabulary.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use orphan_studio_core::{RhymeData, sanitize_word, search_rhyme_words};

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for inside words.
    pub query: String,

    /// Maximum number of results.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchReport {
    query: String,
    results: Vec<String>,
}

/// Print matching words, one per line.
#[instrument(name = "cmd_search", skip_all, fields(query = %args.query))]
pub fn cmd_search(
    args: SearchArgs,
    global_json: bool,
    data: &RhymeData,
    config_limit: usize,
) -> anyhow::Result<()> {
    let limit = args.limit.unwrap_or(config_limit);
    debug!(limit, "executing search command");

    let report = SearchReport {
        query: sanitize_word(&args.query),
        results: search_rhyme_words(&args.query, Some(data), limit),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.results.is_empty() {
        eprintln!("{}", "No matches.".yellow());
    } else {
        for word in &report.results {
            println!("{word}");
        }
    }

    Ok(())
}
