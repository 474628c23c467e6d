//! Debounced autosave.
//!
//! Every change restarts the debounce window; a save is due once the window
//! passes without further changes. Time is passed in by the caller so the
//! state machine stays deterministic.

use std::time::{Duration, Instant};

/// Quiet period after the last change before an autosave fires.
pub const DEFAULT_AUTOSAVE_DEBOUNCE: Duration = Duration::from_millis(450);

/// Autosave state for one studio session.
#[derive(Debug, Clone)]
pub struct Autosave {
    enabled: bool,
    debounce: Duration,
    last_change: Option<Instant>,
}

impl Autosave {
    /// New autosave state with nothing pending.
    pub const fn new(enabled: bool, debounce: Duration) -> Self {
        Self {
            enabled,
            debounce,
            last_change: None,
        }
    }

    /// Turn autosave on or off. Pending changes stay pending.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether autosave is on.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a change at `now`, restarting the debounce window.
    pub const fn note_change(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    /// Whether there are unsaved changes.
    pub const fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    /// Whether an autosave should run at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.enabled
            && self
                .last_change
                .is_some_and(|changed| now.saturating_duration_since(changed) >= self.debounce)
    }

    /// Clear pending changes after a successful save.
    pub const fn mark_saved(&mut self) {
        self.last_change = None;
    }

    /// Status line for the studio header.
    pub const fn label(&self) -> &'static str {
        if !self.enabled {
            "Autosave off"
        } else if self.last_change.is_some() {
            "Autosave pending"
        } else {
            "Autosave on"
        }
    }
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(true, DEFAULT_AUTOSAVE_DEBOUNCE)
    }
}
