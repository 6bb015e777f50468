//! Create/edit mode routing.
//!
//! The next form submission either creates a workout or edits the one the
//! mode points at. Transitions are plain functions on [`Mode`];
//! [`ModeController`] holds the current value and hands it out with
//! [`ModeController::take`], which always leaves `Create` behind.

use super::store::WorkoutStore;
use crate::workouts::WorkoutId;

/// What the next submission does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Create a new workout
    #[default]
    Create,
    /// Replace the fields of an existing workout
    Edit(WorkoutId),
}

impl Mode {
    /// Target a workout for editing. Unknown ids leave the mode unchanged.
    pub fn begin_edit(self, id: WorkoutId, store: &WorkoutStore) -> Mode {
        if store.contains(id) {
            Mode::Edit(id)
        } else {
            self
        }
    }

    /// Return to creating new workouts.
    pub fn finish(self) -> Mode {
        Mode::Create
    }

    /// Workout being edited, if any.
    pub fn target(&self) -> Option<WorkoutId> {
        match self {
            Mode::Create => None,
            Mode::Edit(id) => Some(*id),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Mode::Edit(_))
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Create => write!(f, "create"),
            Mode::Edit(id) => write!(f, "edit {}", id),
        }
    }
}

/// Holds the current [`Mode`].
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Mode {
        self.mode
    }

    /// Switch to editing `id`. Returns false if the store does not know it.
    pub fn begin_edit(&mut self, id: WorkoutId, store: &WorkoutStore) -> bool {
        let next = self.mode.begin_edit(id, store);
        if next.target() != Some(id) {
            tracing::warn!("Ignoring edit of unknown workout {}", id);
            return false;
        }
        tracing::debug!("Mode {} -> {}", self.mode, next);
        self.mode = next;
        true
    }

    /// Start a fresh entry, dropping any edit target.
    pub fn begin_create(&mut self) {
        self.set(self.mode.finish());
    }

    /// Abandon the current entry.
    pub fn cancel(&mut self) {
        self.set(self.mode.finish());
    }

    /// Take the mode for dispatching a submission, resetting to `Create`.
    pub fn take(&mut self) -> Mode {
        let mode = self.mode;
        self.set(mode.finish());
        mode
    }

    /// Drop the edit target if it is `id` (the workout went away).
    pub fn retire(&mut self, id: WorkoutId) -> bool {
        if self.mode.target() == Some(id) {
            self.set(Mode::Create);
            return true;
        }
        false
    }

    fn set(&mut self, next: Mode) {
        if next != self.mode {
            tracing::debug!("Mode {} -> {}", self.mode, next);
        }
        self.mode = next;
    }
}
