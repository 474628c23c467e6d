//! Error types for orphan-studio-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a rhyme bank.
///
/// These never reach the resolver: the loading boundary turns them into an
/// empty dataset (see [`crate::rhyme_data::load_rhyme_data`]).
#[derive(Error, Debug)]
pub enum DataError {
    /// The rhyme bank file could not be read.
    #[error("failed to read rhyme bank {path}: {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The rhyme bank is not valid JSON or has the wrong shape.
    #[error("malformed rhyme bank: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type alias using [`DataError`].
pub type DataResult<T> = Result<T, DataError>;

/// Errors that can occur when reading or writing the studio session file.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Filesystem operation on the session file failed.
    #[error("session file {path}: {source}")]
    Io {
        /// Session file or its parent directory.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The temporary file could not be moved over the session file.
    #[error("failed to replace session file {path}: {source}")]
    Persist {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying persist error.
        source: tempfile::PersistError,
    },
}

/// Result type alias using [`SessionError`].
pub type SessionResult<T> = Result<T, SessionError>;
