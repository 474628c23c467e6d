//! The lyric-writing studio.
//!
//! - [`editor`] - lyrics, caret and the word under it
//! - [`session`] - settings, snapshots and the session file
//! - [`autosave`] - debounced autosave state
//! - [`stats`] - word, line and character counts

pub mod autosave;
pub mod editor;
pub mod session;
pub mod stats;

pub use autosave::{Autosave, DEFAULT_AUTOSAVE_DEBOUNCE};
pub use editor::Editor;
pub use session::{
    DEFAULT_TITLE, FontSize, SESSION_FILE_NAME, SessionStore, StudioSettings, StudioSnapshot,
    parse_snapshot,
};
pub use stats::LyricStats;
