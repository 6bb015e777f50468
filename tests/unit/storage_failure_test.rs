//! Tracker behavior when the blob store fails underneath it.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use maprun::storage::config::TrackerSettings;
use maprun::storage::{
    BlobStore, MemoryBlobStore, SnapshotError, SnapshotStore, StorageError, DEFAULT_SNAPSHOT_KEY,
};
use maprun::tracker::{
    FormValues, SortField, SubmitOutcome, TrackerError, ViewSynchronizer, WorkoutForm,
    WorkoutTracker,
};
use maprun::ui::{MapPanel, WorkoutFormPanel, WorkoutListPanel};
use maprun::{Coordinates, Workout, WorkoutId, WorkoutKind};

/// Memory store whose reads and writes can be switched off from the test.
#[derive(Clone, Default)]
struct SwitchedBlobs {
    inner: MemoryBlobStore,
    reads_fail: Rc<Cell<bool>>,
    writes_fail: Rc<Cell<bool>>,
}

impl BlobStore for SwitchedBlobs {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.reads_fail.get() {
            return Err(StorageError::Io("read failed".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.writes_fail.get() {
            return Err(StorageError::Io("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.writes_fail.get() {
            return Err(StorageError::Io("disk full".to_string()));
        }
        self.inner.remove(key)
    }
}

type Tracker = WorkoutTracker<SwitchedBlobs, MapPanel, WorkoutListPanel, WorkoutFormPanel>;

fn here() -> Coordinates {
    Coordinates::new(39.0, -12.0)
}

fn tracker(blobs: SwitchedBlobs) -> Tracker {
    let view = ViewSynchronizer::new(
        WorkoutListPanel::new(),
        Some(MapPanel::new(here(), 13)),
        13,
    );
    WorkoutTracker::new(
        SnapshotStore::new(blobs),
        view,
        WorkoutFormPanel::new(),
        TrackerSettings::default(),
    )
}

fn run(distance: &str) -> FormValues {
    let mut values = FormValues::empty(WorkoutKind::Running);
    values.distance = distance.to_string();
    values.duration = "24".to_string();
    values.cadence = "178".to_string();
    values
}

fn submit(tracker: &mut Tracker, values: FormValues) -> Result<SubmitOutcome, TrackerError> {
    tracker.begin_create(here());
    tracker.form_mut().populate(values);
    tracker.submit()
}

fn is_write_failure(err: &TrackerError) -> bool {
    matches!(
        err,
        TrackerError::Storage(SnapshotError::Storage(StorageError::Io(_)))
    )
}

/// List, markers and registry all mirror the store.
fn assert_views_match_store(tracker: &Tracker) {
    let stored: HashSet<WorkoutId> = tracker.store().iter().map(Workout::id).collect();
    let listed: HashSet<WorkoutId> = tracker.view().list().entries().iter().map(|e| e.id).collect();
    let marked: HashSet<WorkoutId> = tracker.view().registry().ids().collect();

    assert_eq!(listed, stored);
    assert_eq!(marked, stored);
    assert_eq!(tracker.view().list().entries().len(), tracker.store().len());
    assert_eq!(
        tracker.view().map().unwrap().marker_count(),
        tracker.store().len()
    );
}

#[test]
fn test_failed_save_after_submit_still_renders() {
    let blobs = SwitchedBlobs::default();
    let mut tracker = tracker(blobs.clone());
    submit(&mut tracker, run("5.2")).unwrap();

    blobs.writes_fail.set(true);
    let err = submit(&mut tracker, run("8")).unwrap_err();

    assert!(is_write_failure(&err));
    assert_eq!(tracker.store().len(), 2);
    assert_views_match_store(&tracker);
    assert!(!tracker.form().is_visible());
}

#[test]
fn test_failed_save_after_delete_and_sort_still_renders() {
    let blobs = SwitchedBlobs::default();
    let mut tracker = tracker(blobs.clone());
    submit(&mut tracker, run("27")).unwrap();
    submit(&mut tracker, run("5.2")).unwrap();
    submit(&mut tracker, run("10")).unwrap();

    blobs.writes_fail.set(true);

    let err = tracker.toggle_sort(SortField::Distance).unwrap_err();
    assert!(is_write_failure(&err));
    let distances: Vec<f64> = tracker.store().iter().map(|w| w.distance()).collect();
    assert_eq!(distances, vec![5.2, 10.0, 27.0]);
    assert_eq!(tracker.view().list().entries()[0].rows[0].value, "27");
    assert_views_match_store(&tracker);

    let id = tracker.store().ids()[0];
    let err = tracker.delete(id).unwrap_err();
    assert!(is_write_failure(&err));
    assert!(tracker.store().find_by_id(id).is_none());
    assert_views_match_store(&tracker);
}

#[test]
fn test_failed_reset_still_clears_views() {
    let blobs = SwitchedBlobs::default();
    let mut tracker = tracker(blobs.clone());
    submit(&mut tracker, run("5.2")).unwrap();

    blobs.writes_fail.set(true);
    let err = tracker.reset().unwrap_err();

    assert!(is_write_failure(&err));
    assert!(tracker.store().is_empty());
    assert!(tracker.view().list().entries().is_empty());
    assert_eq!(tracker.view().map().unwrap().marker_count(), 0);
}

#[test]
fn test_unreadable_snapshot_is_not_overwritten() {
    let blobs = SwitchedBlobs::default();
    let mut seeded = tracker(blobs.clone());
    for distance in ["5.2", "8", "27"] {
        submit(&mut seeded, run(distance)).unwrap();
    }
    let before = seeded.snapshots().blobs().inner.get(DEFAULT_SNAPSHOT_KEY).unwrap();

    let reopened = SwitchedBlobs {
        inner: seeded.snapshots().blobs().inner.clone(),
        ..Default::default()
    };
    reopened.reads_fail.set(true);
    let mut tracker = tracker(reopened.clone());
    reopened.reads_fail.set(false);

    assert!(tracker.store().is_empty());
    assert!(tracker.snapshots().read_failure().is_some());

    let err = submit(&mut tracker, run("3")).unwrap_err();
    assert!(matches!(
        err,
        TrackerError::Storage(SnapshotError::Unreadable(_))
    ));
    assert_eq!(tracker.store().len(), 1);
    assert_views_match_store(&tracker);
    assert_eq!(
        tracker.snapshots().blobs().inner.get(DEFAULT_SNAPSHOT_KEY).unwrap(),
        before
    );

    // An explicit reset discards the old snapshot and saving resumes
    tracker.reset().unwrap();
    assert_eq!(tracker.snapshots().read_failure(), None);
    submit(&mut tracker, run("4")).unwrap();
    let saved = tracker.snapshots().load().unwrap().unwrap();
    assert_eq!(saved.len(), 1);
}
