//! Workout tracker: routes user actions through mode, store, snapshot and view.
//!
//! Every mutating action ends the same way: the full collection is saved,
//! then the list and markers are rebuilt from it. Input is validated before
//! anything is touched, so a rejected submission changes nothing.

use thiserror::Error;

use super::form::{FormValues, WorkoutForm};
use super::mode::{Mode, ModeController};
use super::store::{SortDirection, SortField, StoreError, WorkoutStore};
use super::sync::{ListAction, MapView, ViewSynchronizer, WorkoutList};
use crate::storage::blob::BlobStore;
use crate::storage::config::TrackerSettings;
use crate::storage::snapshot::{SnapshotError, SnapshotStore};
use crate::workouts::{Coordinates, ValidationError, Workout, WorkoutDraft, WorkoutId};

/// Tracker errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    #[error("Inputs have to be positive numbers! ({0})")]
    Validation(#[from] ValidationError),

    #[error("Workout not found: {0}")]
    NotFound(WorkoutId),

    #[error("Duplicate workout id: {0}")]
    DuplicateId(WorkoutId),

    #[error("Click on the map to choose where the workout took place")]
    NoLocation,

    #[error("Could not save workouts: {0}")]
    Storage(#[from] SnapshotError),
}

impl From<StoreError> for TrackerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => TrackerError::NotFound(id),
            StoreError::DuplicateId(id) => TrackerError::DuplicateId(id),
        }
    }
}

/// Result of a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new workout was added
    Created(WorkoutId),
    /// An existing workout was edited
    Updated(WorkoutId),
    /// The edit target no longer exists; nothing changed
    Ignored,
}

/// Per-field sort toggles.
///
/// The first sort on a field is ascending and every repeat flips it. Each
/// field remembers its own direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<SortField>,
    distance: Option<SortDirection>,
    duration: Option<SortDirection>,
}

impl SortState {
    /// Advance the toggle for `field` and mark it active.
    pub fn next(&mut self, field: SortField) -> SortDirection {
        let slot = match field {
            SortField::Distance => &mut self.distance,
            SortField::Duration => &mut self.duration,
        };
        let direction = match *slot {
            Some(SortDirection::Ascending) => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        *slot = Some(direction);
        self.active = Some(field);
        direction
    }

    /// Field whose sort is currently shown, if any.
    pub fn active(&self) -> Option<SortField> {
        self.active
    }

    /// Last direction applied to `field`.
    pub fn direction(&self, field: SortField) -> Option<SortDirection> {
        match field {
            SortField::Distance => self.distance,
            SortField::Duration => self.duration,
        }
    }

    /// Un-highlight the sort controls; the list is no longer known to be sorted.
    pub fn clear_active(&mut self) {
        self.active = None;
    }
}

/// Owns the workouts and keeps storage and the views consistent with them.
pub struct WorkoutTracker<B, M, L, F>
where
    B: BlobStore,
    M: MapView,
    L: WorkoutList,
    F: WorkoutForm,
{
    store: WorkoutStore,
    snapshots: SnapshotStore<B>,
    view: ViewSynchronizer<M, L>,
    form: F,
    mode: ModeController,
    pending_location: Option<Coordinates>,
    sort: SortState,
    settings: TrackerSettings,
}

impl<B, M, L, F> WorkoutTracker<B, M, L, F>
where
    B: BlobStore,
    M: MapView,
    L: WorkoutList,
    F: WorkoutForm,
{
    /// Load the stored workouts and draw them.
    ///
    /// A missing or corrupt snapshot starts with an empty collection. A
    /// snapshot that cannot be read also starts empty, and saving stays
    /// refused until [`reset`](Self::reset) so it is not overwritten.
    pub fn new(
        mut snapshots: SnapshotStore<B>,
        view: ViewSynchronizer<M, L>,
        form: F,
        settings: TrackerSettings,
    ) -> Self {
        let store = match WorkoutStore::from_workouts(snapshots.load_or_empty()) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Ignoring inconsistent snapshot: {}", e);
                WorkoutStore::new()
            }
        };

        let mut tracker = Self {
            store,
            snapshots,
            view,
            form,
            mode: ModeController::new(),
            pending_location: None,
            sort: SortState::default(),
            settings,
        };
        tracker.view.render(tracker.store.as_slice());
        tracker
    }

    /// Start a new entry at a clicked map position.
    pub fn begin_create(&mut self, coords: Coordinates) {
        self.mode.begin_create();
        self.pending_location = Some(coords);
        self.form.clear();
        self.form.show();
    }

    /// Load a workout into the form for editing. Unknown ids are ignored.
    pub fn begin_edit(&mut self, id: WorkoutId) -> bool {
        if !self.mode.begin_edit(id, &self.store) {
            return false;
        }
        if let Some(workout) = self.store.find_by_id(id) {
            self.form.populate(FormValues::from_workout(workout));
        }
        self.form.show();
        true
    }

    /// Abandon the current entry.
    pub fn cancel(&mut self) {
        self.mode.cancel();
        self.pending_location = None;
        self.form.clear();
        self.form.hide();
    }

    /// Submit the form in the current mode.
    pub fn submit(&mut self) -> Result<SubmitOutcome, TrackerError> {
        let draft = self.form.read().parse()?;

        if self.mode.current() == Mode::Create && self.pending_location.is_none() {
            return Err(TrackerError::NoLocation);
        }

        let outcome = match self.mode.take() {
            Mode::Create => self.create(draft)?,
            Mode::Edit(id) => self.edit(id, &draft)?,
        };

        self.pending_location = None;
        self.sort.clear_active();
        self.form.clear();
        self.form.hide();

        if outcome != SubmitOutcome::Ignored {
            self.persist_and_render()?;
        }
        Ok(outcome)
    }

    fn create(&mut self, draft: WorkoutDraft) -> Result<SubmitOutcome, TrackerError> {
        let coords = self.pending_location.ok_or(TrackerError::NoLocation)?;
        let workout = Workout::from_draft(coords, draft);
        let id = workout.id();

        tracing::info!("Adding {} at {}", workout.description(), coords);
        self.store.add(workout)?;
        Ok(SubmitOutcome::Created(id))
    }

    fn edit(&mut self, id: WorkoutId, draft: &WorkoutDraft) -> Result<SubmitOutcome, TrackerError> {
        let Some(previous_kind) = self.store.find_by_id(id).map(Workout::kind) else {
            tracing::warn!("Edit target {} no longer exists", id);
            return Ok(SubmitOutcome::Ignored);
        };

        self.store.update(id, draft)?;
        if self.settings.retitle_on_kind_change && previous_kind != draft.kind() {
            self.store.refresh_description(id)?;
        }

        tracing::info!("Updated workout {}", id);
        Ok(SubmitOutcome::Updated(id))
    }

    /// Delete a workout. Returns `None` if it was already gone.
    pub fn delete(&mut self, id: WorkoutId) -> Result<Option<Workout>, TrackerError> {
        let removed = match self.store.remove(id) {
            Ok(workout) => workout,
            Err(StoreError::NotFound(_)) => {
                tracing::warn!("Ignoring delete of unknown workout {}", id);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        self.view.retire_marker(id);
        if self.mode.retire(id) {
            self.pending_location = None;
            self.form.clear();
            self.form.hide();
        }

        tracing::info!("Deleted {}", removed.description());
        self.persist_and_render()?;
        Ok(Some(removed))
    }

    /// Center the map on a workout.
    pub fn select(&mut self, id: WorkoutId) -> bool {
        match self.store.find_by_id(id) {
            Some(workout) => self.view.pan_to(workout),
            None => false,
        }
    }

    /// Sort by `field`, alternating direction on repeated calls.
    pub fn toggle_sort(&mut self, field: SortField) -> Result<SortDirection, TrackerError> {
        let direction = self.sort.next(field);
        self.store.sort_by(field, direction);
        tracing::debug!("Sorted by {:?} {:?}", field, direction);

        self.persist_and_render()?;
        Ok(direction)
    }

    /// Dispatch a click on a list entry.
    pub fn handle(&mut self, action: ListAction) -> Result<(), TrackerError> {
        match action {
            ListAction::Edit(id) => {
                self.begin_edit(id);
            }
            ListAction::Delete(id) => {
                self.delete(id)?;
            }
            ListAction::Select(id) => {
                self.select(id);
            }
        }
        Ok(())
    }

    /// Forget everything: stored snapshot, workouts, mode and views.
    pub fn reset(&mut self) -> Result<(), TrackerError> {
        tracing::info!("Resetting workout log");
        let cleared = self.snapshots.clear();

        self.store.clear();
        self.mode.cancel();
        self.pending_location = None;
        self.sort = SortState::default();
        self.form.clear();
        self.form.hide();
        self.view.render(self.store.as_slice());

        cleared.map_err(TrackerError::from)
    }

    /// Install the map once a position is known and draw the workouts on it.
    pub fn attach_map(&mut self, map: M) {
        self.view.attach_map(map, self.store.as_slice());
    }

    fn persist_and_render(&mut self) -> Result<(), TrackerError> {
        let saved = self.snapshots.save(self.store.as_slice());
        self.view.render(self.store.as_slice());

        saved.map_err(|e| {
            tracing::error!("Failed to save workouts: {}", e);
            TrackerError::from(e)
        })
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn mode(&self) -> Mode {
        self.mode.current()
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn pending_location(&self) -> Option<Coordinates> {
        self.pending_location
    }

    pub fn snapshots(&self) -> &SnapshotStore<B> {
        &self.snapshots
    }

    pub fn view(&self) -> &ViewSynchronizer<M, L> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewSynchronizer<M, L> {
        &mut self.view
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }
}
