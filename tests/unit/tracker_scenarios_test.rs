//! End-to-end tracker flows against in-memory storage and the real widgets.

use maprun::storage::config::TrackerSettings;
use maprun::storage::{BlobStore, MemoryBlobStore, SnapshotStore, DEFAULT_SNAPSHOT_KEY};
use maprun::tracker::{
    FormValues, ListAction, Mode, SortDirection, SortField, SubmitOutcome, TrackerError,
    ViewSynchronizer, WorkoutForm, WorkoutTracker,
};
use maprun::ui::{MapPanel, WorkoutFormPanel, WorkoutListPanel};
use maprun::workouts::{Field, ValidationError};
use maprun::{Coordinates, WorkoutId, WorkoutKind};

type Tracker = WorkoutTracker<MemoryBlobStore, MapPanel, WorkoutListPanel, WorkoutFormPanel>;

fn here() -> Coordinates {
    Coordinates::new(39.0, -12.0)
}

fn tracker_with(blobs: MemoryBlobStore, settings: TrackerSettings) -> Tracker {
    let view = ViewSynchronizer::new(
        WorkoutListPanel::new(),
        Some(MapPanel::new(here(), 13)),
        13,
    );
    WorkoutTracker::new(
        SnapshotStore::new(blobs),
        view,
        WorkoutFormPanel::new(),
        settings,
    )
}

fn tracker() -> Tracker {
    tracker_with(MemoryBlobStore::new(), TrackerSettings::default())
}

fn values(kind: WorkoutKind, distance: &str, duration: &str, extra: &str) -> FormValues {
    let mut values = FormValues::empty(kind);
    values.distance = distance.to_string();
    values.duration = duration.to_string();
    match kind {
        WorkoutKind::Running => values.cadence = extra.to_string(),
        WorkoutKind::Cycling => values.elevation_gain = extra.to_string(),
    }
    values
}

fn create(
    tracker: &mut Tracker,
    coords: Coordinates,
    form: FormValues,
) -> Result<SubmitOutcome, TrackerError> {
    tracker.begin_create(coords);
    tracker.form_mut().populate(form);
    tracker.submit()
}

fn create_ok(tracker: &mut Tracker, form: FormValues) -> WorkoutId {
    match create(tracker, here(), form) {
        Ok(SubmitOutcome::Created(id)) => id,
        other => panic!("expected a new workout, got {:?}", other),
    }
}

fn listed_distances(tracker: &Tracker) -> Vec<String> {
    tracker
        .view()
        .list()
        .entries()
        .iter()
        .map(|e| e.rows[0].value.clone())
        .collect()
}

fn writes(tracker: &Tracker) -> usize {
    tracker.snapshots().blobs().write_count()
}

#[test]
fn test_create_running_workout() {
    let mut tracker = tracker();
    let id = create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));

    let run = tracker.store().find_by_id(id).unwrap();
    assert!((run.pace().unwrap() - 4.615).abs() < 1e-3);
    assert!(run.description().starts_with("Running on "));
    assert_eq!(run.coords(), here());

    assert_eq!(tracker.mode(), Mode::Create);
    assert_eq!(tracker.pending_location(), None);
    assert!(!tracker.form().is_visible());
    assert_eq!(tracker.form().read(), FormValues::empty(WorkoutKind::Running));

    assert_eq!(writes(&tracker), 1);
    assert_eq!(tracker.view().list().entries().len(), 1);
    assert_eq!(tracker.view().map().unwrap().marker_count(), 1);

    let marker = tracker.view().registry().get(id).unwrap();
    let popup = tracker.view().map().unwrap().popup(marker).unwrap();
    assert!(popup.starts_with("🏃"));
    assert!(popup.contains("Running on "));
}

#[test]
fn test_create_cycling_workout() {
    let mut tracker = tracker();
    let id = create_ok(&mut tracker, values(WorkoutKind::Cycling, "27", "98", "200"));

    let ride = tracker.store().find_by_id(id).unwrap();
    assert!((ride.speed().unwrap() - 16.531).abs() < 1e-3);
    assert_eq!(ride.pace(), None);
    assert!(ride.description().starts_with("Cycling on "));
}

#[test]
fn test_invalid_submission_changes_nothing() {
    let mut tracker = tracker();
    create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));
    let before = writes(&tracker);

    let result = create(
        &mut tracker,
        here(),
        values(WorkoutKind::Running, "-1", "24", "178"),
    );

    assert_eq!(
        result,
        Err(TrackerError::Validation(ValidationError::NotPositive {
            field: Field::Distance
        }))
    );
    assert_eq!(tracker.store().len(), 1);
    assert_eq!(writes(&tracker), before);

    // The entry stays open so the user can correct it
    assert!(tracker.form().is_visible());
    assert_eq!(tracker.pending_location(), Some(here()));
}

#[test]
fn test_non_numeric_input_rejected() {
    let mut tracker = tracker();
    let result = create(
        &mut tracker,
        here(),
        values(WorkoutKind::Cycling, "27", "abc", "200"),
    );

    assert!(matches!(result, Err(TrackerError::Validation(_))));
    assert!(tracker.store().is_empty());
    assert_eq!(writes(&tracker), 0);
}

#[test]
fn test_submit_without_location_is_rejected() {
    let mut tracker = tracker();
    tracker
        .form_mut()
        .populate(values(WorkoutKind::Running, "5", "25", "170"));

    assert_eq!(tracker.submit(), Err(TrackerError::NoLocation));
    assert!(tracker.store().is_empty());
    assert_eq!(writes(&tracker), 0);
}

#[test]
fn test_edit_recomputes_derived_and_keeps_identity() {
    let mut tracker = tracker();
    let id = create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));
    let created_at = tracker.store().find_by_id(id).unwrap().created_at();
    let description = tracker.store().find_by_id(id).unwrap().description().to_string();

    tracker.handle(ListAction::Edit(id)).unwrap();
    assert_eq!(tracker.mode(), Mode::Edit(id));
    assert!(tracker.form().is_visible());
    assert_eq!(tracker.form().read().duration, "24");

    let mut form = tracker.form().read();
    form.duration = "30".to_string();
    tracker.form_mut().populate(form);

    assert_eq!(tracker.submit(), Ok(SubmitOutcome::Updated(id)));
    assert_eq!(tracker.mode(), Mode::Create);

    let run = tracker.store().find_by_id(id).unwrap();
    assert_eq!(run.duration(), 30.0);
    assert!((run.pace().unwrap() - 30.0 / 5.2).abs() < 1e-9);
    assert_eq!(run.id(), id);
    assert_eq!(run.created_at(), created_at);
    assert_eq!(run.description(), description);
    assert_eq!(tracker.store().len(), 1);
}

#[test]
fn test_edit_kind_change_keeps_title_by_default() {
    let mut tracker = tracker();
    let id = create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));

    assert!(tracker.begin_edit(id));
    tracker
        .form_mut()
        .populate(values(WorkoutKind::Cycling, "5.2", "24", "50"));
    tracker.submit().unwrap();

    let workout = tracker.store().find_by_id(id).unwrap();
    assert_eq!(workout.kind(), WorkoutKind::Cycling);
    assert!(workout.description().starts_with("Running on "));
}

#[test]
fn test_edit_kind_change_retitles_when_enabled() {
    let settings = TrackerSettings {
        retitle_on_kind_change: true,
    };
    let mut tracker = tracker_with(MemoryBlobStore::new(), settings);
    let id = create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));

    tracker.begin_edit(id);
    tracker
        .form_mut()
        .populate(values(WorkoutKind::Cycling, "5.2", "24", "50"));
    tracker.submit().unwrap();

    let workout = tracker.store().find_by_id(id).unwrap();
    assert!(workout.description().starts_with("Cycling on "));
    assert_eq!(workout.speed(), Some(5.2 / (24.0 / 60.0)));
}

#[test]
fn test_begin_edit_unknown_id_stays_in_create() {
    let mut tracker = tracker();
    assert!(!tracker.begin_edit(WorkoutId::new()));
    assert_eq!(tracker.mode(), Mode::Create);
    assert!(!tracker.form().is_visible());
}

#[test]
fn test_delete_removes_workout_and_marker() {
    let mut tracker = tracker();
    let run = create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));
    let ride = create_ok(&mut tracker, values(WorkoutKind::Cycling, "27", "98", "200"));

    tracker.handle(ListAction::Delete(run)).unwrap();

    assert!(tracker.store().find_by_id(run).is_none());
    assert!(!tracker.view().registry().contains(run));
    assert!(tracker.view().registry().contains(ride));
    assert_eq!(tracker.view().map().unwrap().marker_count(), 1);
    assert_eq!(tracker.view().list().entries().len(), 1);

    let reloaded = tracker_with(tracker.snapshots().blobs().clone(), TrackerSettings::default());
    assert_eq!(reloaded.store().ids(), vec![ride]);
}

#[test]
fn test_delete_unknown_id_is_noop() {
    let mut tracker = tracker();
    create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));
    let before = writes(&tracker);

    assert_eq!(tracker.delete(WorkoutId::new()), Ok(None));
    assert_eq!(tracker.store().len(), 1);
    assert_eq!(writes(&tracker), before);
}

#[test]
fn test_deleting_edit_target_returns_to_create() {
    let mut tracker = tracker();
    let id = create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));

    tracker.begin_edit(id);
    tracker.delete(id).unwrap();

    assert_eq!(tracker.mode(), Mode::Create);
    assert!(!tracker.form().is_visible());
}

#[test]
fn test_sort_by_distance_toggles() {
    let mut tracker = tracker();
    create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));
    create_ok(&mut tracker, values(WorkoutKind::Cycling, "27", "98", "200"));

    let distances = |t: &Tracker| t.store().iter().map(|w| w.distance()).collect::<Vec<_>>();

    assert_eq!(
        tracker.toggle_sort(SortField::Distance),
        Ok(SortDirection::Ascending)
    );
    assert_eq!(distances(&tracker), vec![5.2, 27.0]);
    // The list shows the last workout on top
    assert_eq!(listed_distances(&tracker), vec!["27", "5.2"]);

    assert_eq!(
        tracker.toggle_sort(SortField::Distance),
        Ok(SortDirection::Descending)
    );
    assert_eq!(distances(&tracker), vec![27.0, 5.2]);
    assert_eq!(listed_distances(&tracker), vec!["5.2", "27"]);
    assert_eq!(tracker.sort().active(), Some(SortField::Distance));

    // Sorted order is what gets stored
    let reloaded = tracker_with(tracker.snapshots().blobs().clone(), TrackerSettings::default());
    assert_eq!(distances(&reloaded), vec![27.0, 5.2]);
}

#[test]
fn test_submit_clears_sort_highlight() {
    let mut tracker = tracker();
    create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));
    tracker.toggle_sort(SortField::Duration).unwrap();

    create_ok(&mut tracker, values(WorkoutKind::Running, "3", "20", "160"));
    assert_eq!(tracker.sort().active(), None);
}

#[test]
fn test_render_is_idempotent() {
    let mut tracker = tracker();
    create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));
    create_ok(&mut tracker, values(WorkoutKind::Cycling, "27", "98", "200"));

    let workouts = tracker.store().as_slice().to_vec();
    tracker.view_mut().render(&workouts);
    tracker.view_mut().render(&workouts);

    assert_eq!(tracker.view().list().entries().len(), 2);
    assert_eq!(tracker.view().map().unwrap().marker_count(), 2);

    let mut registered: Vec<_> = tracker.view().registry().ids().collect();
    let mut stored = tracker.store().ids();
    registered.sort_by_key(|id| id.to_string());
    stored.sort_by_key(|id| id.to_string());
    assert_eq!(registered, stored);
}

#[test]
fn test_reload_restores_workouts() {
    let mut tracker = tracker();
    let run = create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));
    let ride = create_ok(&mut tracker, values(WorkoutKind::Cycling, "27", "98", "200"));

    let reloaded = tracker_with(tracker.snapshots().blobs().clone(), TrackerSettings::default());

    assert_eq!(reloaded.store().ids(), vec![run, ride]);
    for (before, after) in tracker.store().iter().zip(reloaded.store().iter()) {
        assert_eq!(before, after);
    }
    assert_eq!(reloaded.view().map().unwrap().marker_count(), 2);
    assert_eq!(reloaded.view().list().entries().len(), 2);
}

#[test]
fn test_corrupt_snapshot_starts_empty() {
    let mut blobs = MemoryBlobStore::new();
    blobs.set(DEFAULT_SNAPSHOT_KEY, "{not json").unwrap();

    let tracker = tracker_with(blobs, TrackerSettings::default());
    assert!(tracker.store().is_empty());
    assert!(tracker.view().list().entries().is_empty());
}

#[test]
fn test_reset_forgets_everything() {
    let mut tracker = tracker();
    create_ok(&mut tracker, values(WorkoutKind::Running, "5.2", "24", "178"));

    tracker.reset().unwrap();

    assert!(tracker.store().is_empty());
    assert_eq!(tracker.view().map().unwrap().marker_count(), 0);
    assert!(tracker.view().registry().is_empty());
    assert_eq!(
        tracker.snapshots().blobs().get(DEFAULT_SNAPSHOT_KEY),
        Ok(None)
    );
}

#[test]
fn test_map_attached_after_load() {
    let mut seeded = tracker();
    create_ok(&mut seeded, values(WorkoutKind::Running, "5.2", "24", "178"));

    let view = ViewSynchronizer::new(WorkoutListPanel::new(), None, 13);
    let mut tracker: Tracker = WorkoutTracker::new(
        SnapshotStore::new(seeded.snapshots().blobs().clone()),
        view,
        WorkoutFormPanel::new(),
        TrackerSettings::default(),
    );

    assert_eq!(tracker.view().list().entries().len(), 1);
    assert!(!tracker.view().has_map());

    tracker.attach_map(MapPanel::new(here(), 13));
    assert_eq!(tracker.view().map().unwrap().marker_count(), 1);
    assert_eq!(tracker.view().registry().len(), 1);
}

#[test]
fn test_select_pans_map() {
    let mut tracker = tracker();
    let far = Coordinates::new(51.5, -0.12);
    let id = match create(&mut tracker, far, values(WorkoutKind::Running, "5", "25", "170")) {
        Ok(SubmitOutcome::Created(id)) => id,
        other => panic!("expected a new workout, got {:?}", other),
    };

    tracker.handle(ListAction::Select(id)).unwrap();
    assert_eq!(tracker.view().map().unwrap().center(), far);
    assert!(!tracker.select(WorkoutId::new()));
}

#[test]
fn test_cancel_discards_entry() {
    let mut tracker = tracker();
    tracker.begin_create(here());
    tracker
        .form_mut()
        .populate(values(WorkoutKind::Running, "5", "25", "170"));

    tracker.cancel();

    assert_eq!(tracker.pending_location(), None);
    assert!(!tracker.form().is_visible());
    assert!(tracker.store().is_empty());
}
