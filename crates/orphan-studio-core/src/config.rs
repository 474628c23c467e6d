//! Layered studio configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `config.<ext>` in the user config directory
//! 3. Project files from the closest directory that has any of them, walking
//!    up from the search root and stopping at a directory that holds `.git`:
//!    `.studio.<ext>`, `studio.<ext>`, `.orphan-studio.<ext>`, `orphan-studio.<ext>`
//! 4. Files added with [`ConfigLoader::with_file`] (the CLI's `--config`)
//! 5. `ORPHAN_STUDIO_*` environment variables
//!
//! `<ext>` is `toml`, `yaml`, `yml` or `json`. Files sharing a directory merge
//! in that order, so a `.json` file beats a `.toml` file next to it.
//!
//! ```no_run
//! use camino::Utf8Path;
//! use orphan_studio_core::config::ConfigLoader;
//!
//! let (config, sources) = ConfigLoader::new()
//!     .with_project_search(Utf8Path::new("."))
//!     .load()?;
//! println!("{} per category, from {:?}", config.suggestion_limit(), sources.primary_file());
//! # Ok::<(), orphan_studio_core::ConfigError>(())
//! ```

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default maximum input size (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

const APP_NAME: &str = "orphan-studio";

/// Project file stems, lowest precedence first. Each is tried as a dotfile
/// before the plain name.
const FILE_STEMS: &[&str] = &["studio", "orphan-studio"];

const EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

const BOUNDARY_MARKER: &str = ".git";

const ENV_PREFIX: &str = "ORPHAN_STUDIO_";

/// Effective settings for the CLI, the studio and the MCP server.
///
/// Unset limits fall back to the engine's built-in values through the
/// accessor methods.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Minimum level for log output.
    pub log_level: LogLevel,
    /// Directory for the JSONL log file.
    pub log_dir: Option<Utf8PathBuf>,
    /// Rhyme bank JSON file to use instead of the bundled one.
    pub rhyme_data: Option<Utf8PathBuf>,
    /// Suggestions per category in the live view (default: 18).
    pub suggestion_limit: Option<usize>,
    /// Suggestions per category in explore mode (default: 140).
    pub explore_limit: Option<usize>,
    /// Maximum dictionary search results (default: 120).
    pub search_limit: Option<usize>,
    /// Session snapshot file (default: `orphanstudio-data.json` in the user
    /// data directory).
    pub session_file: Option<Utf8PathBuf>,
    /// Quiet period in milliseconds before an autosave fires (default: 450).
    pub autosave_debounce_ms: Option<u64>,
    /// Largest lyrics file or MCP text accepted, in bytes (default: 5 MiB).
    pub max_input_bytes: Option<usize>,
    /// Accept input of any size. Takes priority over `max_input_bytes`.
    pub disable_input_limit: bool,
}

impl Config {
    /// Live suggestion limit, or the built-in default.
    pub fn suggestion_limit(&self) -> usize {
        self.suggestion_limit
            .unwrap_or(crate::resolver::DEFAULT_SUGGESTION_LIMIT)
    }

    /// Explore-mode suggestion limit, or the built-in default.
    pub fn explore_limit(&self) -> usize {
        self.explore_limit
            .unwrap_or(crate::resolver::EXPLORE_SUGGESTION_LIMIT)
    }

    /// Dictionary search limit, or the built-in default.
    pub fn search_limit(&self) -> usize {
        self.search_limit
            .unwrap_or(crate::search::DEFAULT_SEARCH_LIMIT)
    }

    /// Autosave debounce, or the built-in default.
    pub fn autosave_debounce(&self) -> Duration {
        self.autosave_debounce_ms
            .map_or(crate::studio::DEFAULT_AUTOSAVE_DEBOUNCE, Duration::from_millis)
    }

    /// Effective input size cap; `None` when the limit is disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(self.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES))
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-lookup detail.
    Debug,
    /// Normal operation (default).
    #[default]
    Info,
    /// Fallbacks and recoverable problems, such as an unreadable rhyme bank.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Lowercase name, usable as a tracing filter directive.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Which files fed into a loaded [`Config`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Files from the user config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Project files, lowest precedence first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// Explicitly requested files, lowest precedence first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The file whose values win over every other file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .or_else(|| self.project_files.last())
            .or(self.user_file.as_ref())
            .map(Utf8PathBuf::as_path)
    }
}

/// Builder that merges every configuration source into a [`Config`].
#[derive(Debug)]
pub struct ConfigLoader {
    search_root: Option<Utf8PathBuf>,
    user_config: bool,
    files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader that reads user config but searches no project directory.
    pub const fn new() -> Self {
        Self {
            search_root: None,
            user_config: true,
            files: Vec::new(),
        }
    }

    /// Search for project files starting at `dir`.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, dir: P) -> Self {
        self.search_root = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Include or skip the user config directory.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.user_config = include;
        self
    }

    /// Merge `path` above every discovered file. Later calls win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.files.push(path.as_ref().to_path_buf());
        self
    }

    /// Merge all sources and report which files took part.
    #[tracing::instrument(skip(self), fields(search_root = ?self.search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        let sources = ConfigSources {
            user_file: if self.user_config {
                find_user_config()
            } else {
                None
            },
            project_files: self
                .search_root
                .as_deref()
                .map(discover_project_files)
                .unwrap_or_default(),
            explicit_files: self.files,
        };

        let figment = sources
            .user_file
            .iter()
            .chain(&sources.project_files)
            .chain(&sources.explicit_files)
            .fold(
                Figment::new().merge(Serialized::defaults(Config::default())),
                |figment, path| merge_file(figment, path),
            )
            .merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::debug!(
            primary = ?sources.primary_file(),
            log_level = config.log_level.as_str(),
            "configuration loaded"
        );
        Ok((config, sources))
    }
}

/// Candidate project files in one directory, lowest precedence first.
fn project_candidates(dir: &Utf8Path) -> impl Iterator<Item = Utf8PathBuf> + '_ {
    FILE_STEMS.iter().flat_map(move |stem| {
        [format!(".{stem}"), (*stem).to_string()]
            .into_iter()
            .flat_map(move |name| EXTENSIONS.iter().map(move |ext| dir.join(format!("{name}.{ext}"))))
    })
}

/// Files from the closest directory at or above `start` that has any.
fn discover_project_files(start: &Utf8Path) -> Vec<Utf8PathBuf> {
    for dir in start.ancestors() {
        let found: Vec<Utf8PathBuf> = project_candidates(dir).filter(|p| p.is_file()).collect();
        if !found.is_empty() {
            return found;
        }
        if dir.join(BOUNDARY_MARKER).exists() {
            tracing::trace!(%dir, "stopped at repository boundary");
            break;
        }
    }
    Vec::new()
}

fn find_user_config() -> Option<Utf8PathBuf> {
    let dir = user_config_dir()?;
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

fn utf8_dir(path: &std::path::Path) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).ok()
}

/// Platform config directory, e.g. `~/.config/orphan-studio/` on Linux.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    utf8_dir(project_dirs()?.config_dir())
}

/// Platform data directory, home of the session snapshot.
pub fn user_data_dir() -> Option<Utf8PathBuf> {
    utf8_dir(project_dirs()?.data_dir())
}

/// Machine-local data directory, home of the log file.
pub fn user_data_local_dir() -> Option<Utf8PathBuf> {
    utf8_dir(project_dirs()?.data_local_dir())
}
