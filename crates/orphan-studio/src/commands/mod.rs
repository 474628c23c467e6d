//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;
use owo_colors::OwoColorize;

use orphan_studio_core::config::Config;
use orphan_studio_core::studio::SessionStore;
use orphan_studio_core::{RhymeData, RhymeResults, load_rhyme_data};

pub mod cursor;
pub mod info;
pub mod rhymes;
pub mod search;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod session;
pub mod stats;
pub mod studio;

/// Read a file and validate its size against the configured limit.
///
/// Checks the size from metadata before reading the file into memory.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Load the rhyme bank: `--data`, then the configured `rhyme_data`, then the
/// bundled bank.
///
/// An unreadable or malformed file yields the empty bank (logged at warn).
pub fn load_rhyme_bank(data_override: Option<&Utf8Path>, config: &Config) -> RhymeData {
    let path = data_override.or(config.rhyme_data.as_deref());
    load_rhyme_data(path).into_data()
}

/// Resolve the session file: `--session`, then the configured
/// `session_file`, then the user data directory.
pub fn session_store(
    session_override: Option<&Utf8Path>,
    config: &Config,
) -> anyhow::Result<SessionStore> {
    if let Some(path) = session_override.or(config.session_file.as_deref()) {
        return Ok(SessionStore::new(path));
    }
    SessionStore::at_default_location()
        .context("cannot determine the user data directory; pass --session FILE")
}

/// Print the three suggestion lists.
pub(crate) fn print_rhymes(rhymes: &RhymeResults) {
    print_list("Perfect", &rhymes.perfect);
    print_list("Near", &rhymes.near);
    print_list("Family", &rhymes.family);
}

fn print_list(label: &str, words: &[String]) {
    if words.is_empty() {
        println!("{}: {}", label.dimmed(), "(none)".dimmed());
    } else {
        println!("{}: {}", label.dimmed(), words.join(", "));
    }
}
