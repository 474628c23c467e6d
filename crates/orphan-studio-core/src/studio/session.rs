//! Studio settings, snapshots and the session file.
//!
//! A snapshot holds the title, lyrics, settings and last save time of one
//! studio session. It is stored as a single JSON document with camelCase
//! keys, the same shape the browser studio keeps under `orphanstudio-data`.
//! Reading is lenient: any field that is missing or has the wrong type takes
//! its default instead of discarding the whole snapshot.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::{SessionError, SessionResult};

/// Title of a session that was never named.
pub const DEFAULT_TITLE: &str = "Untitled studio session";

/// File name of the session snapshot inside the user data directory.
pub const SESSION_FILE_NAME: &str = "orphanstudio-data.json";

/// Editor font size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum FontSize {
    /// Small.
    Sm,
    /// Medium (default).
    #[default]
    Md,
    /// Large.
    Lg,
}

impl FontSize {
    /// Returns the size as its short name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "sm" => Some(Self::Sm),
            "md" => Some(Self::Md),
            "lg" => Some(Self::Lg),
            _ => None,
        }
    }
}

impl std::fmt::Display for FontSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Studio preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudioSettings {
    /// Save automatically after edits settle.
    pub autosave: bool,
    /// Dim everything but the editor.
    pub focus_mode: bool,
    /// Editor font size.
    pub font_size: FontSize,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            autosave: true,
            focus_mode: false,
            font_size: FontSize::Md,
        }
    }
}

/// Everything the studio persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudioSnapshot {
    /// Session title.
    pub title: String,
    /// Draft lyrics.
    pub lyrics: String,
    /// Preferences.
    pub settings: StudioSettings,
    /// RFC 3339 time of the last successful save.
    pub last_saved_at: Option<String>,
}

impl Default for StudioSnapshot {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            lyrics: String::new(),
            settings: StudioSettings::default(),
            last_saved_at: None,
        }
    }
}

/// Parse a stored snapshot, defaulting each unusable field.
///
/// Returns `None` when `raw` is not JSON or not a JSON object.
pub fn parse_snapshot(raw: &str) -> Option<StudioSnapshot> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    let defaults = StudioSettings::default();
    let settings = object.get("settings");
    let setting = |name: &str| settings.and_then(|s| s.get(name));

    Some(StudioSnapshot {
        title: object
            .get("title")
            .and_then(Value::as_str)
            .map_or_else(|| DEFAULT_TITLE.to_string(), str::to_string),
        lyrics: object
            .get("lyrics")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        settings: StudioSettings {
            autosave: setting("autosave")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.autosave),
            focus_mode: setting("focusMode")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.focus_mode),
            font_size: setting("fontSize")
                .and_then(Value::as_str)
                .and_then(FontSize::parse)
                .unwrap_or(defaults.font_size),
        },
        last_saved_at: object
            .get("lastSavedAt")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Current time in the snapshot timestamp format.
fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The session snapshot file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Utf8PathBuf,
}

impl SessionStore {
    /// Store backed by `path`.
    pub fn new<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store at the default location in the user data directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn at_default_location() -> Option<Self> {
        crate::config::user_data_dir().map(|dir| Self::new(dir.join(SESSION_FILE_NAME)))
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Read the saved snapshot.
    ///
    /// A missing file is a fresh session. An unreadable or corrupt file is
    /// logged and also treated as a fresh session.
    #[tracing::instrument(skip(self), fields(path = %self.path))]
    pub fn load(&self) -> Option<StudioSnapshot> {
        let raw = match std::fs::read_to_string(self.path.as_std_path()) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no saved session");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot read saved session, starting fresh");
                return None;
            }
        };

        let snapshot = parse_snapshot(&raw);
        if snapshot.is_none() {
            tracing::warn!("saved session is corrupt, starting fresh");
        }
        snapshot
    }

    /// Save `snapshot`, stamping it with the current time.
    ///
    /// The file is replaced atomically. On failure the snapshot keeps its
    /// previous timestamp.
    #[tracing::instrument(skip(self, snapshot), fields(path = %self.path))]
    pub fn save(&self, snapshot: &mut StudioSnapshot) -> SessionResult<()> {
        let mut stamped = snapshot.clone();
        stamped.last_saved_at = Some(timestamp_now());
        let json = serde_json::to_string_pretty(&stamped)?;

        let parent = match self.path.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        let io_err = |source: std::io::Error| SessionError::Io {
            path: parent.clone(),
            source,
        };

        std::fs::create_dir_all(parent.as_std_path()).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(parent.as_std_path()).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.persist(self.path.as_std_path())
            .map_err(|source| SessionError::Persist {
                path: self.path.clone(),
                source,
            })?;

        *snapshot = stamped;
        tracing::debug!(saved_at = ?snapshot.last_saved_at, "session saved");
        Ok(())
    }

    /// Delete the saved snapshot. A missing file is not an error.
    pub fn clear(&self) -> SessionResult<()> {
        match std::fs::remove_file(self.path.as_std_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
