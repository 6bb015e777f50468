//! Workout snapshot persistence.
//!
//! The whole ordered collection is written as one JSON array under a single
//! key on every save. Loading re-validates each record and recomputes pace and
//! speed; anything that does not fit the expected shape is reported as
//! [`SnapshotError::Corrupt`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::blob::{BlobStore, StorageError};
use crate::workouts::{Coordinates, KindInput, Workout, WorkoutDraft, WorkoutId, WorkoutKind};

/// Default key the snapshot is stored under.
pub const DEFAULT_SNAPSHOT_KEY: &str = "workouts";

/// Flat persisted form of a workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutRecord {
    id: WorkoutId,
    coords: Coordinates,
    distance: f64,
    duration: f64,
    date: DateTime<Utc>,
    #[serde(rename = "type")]
    kind: WorkoutKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    elevation_gain: Option<f64>,
    // Derived values are written for readability and ignored on load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speed: Option<f64>,
    description: String,
}

impl From<&Workout> for WorkoutRecord {
    fn from(workout: &Workout) -> Self {
        let (cadence, elevation_gain) = match workout.input() {
            KindInput::Running { cadence } => (Some(cadence), None),
            KindInput::Cycling { elevation_gain } => (None, Some(elevation_gain)),
        };
        Self {
            id: workout.id(),
            coords: workout.coords(),
            distance: workout.distance(),
            duration: workout.duration(),
            date: workout.created_at(),
            kind: workout.kind(),
            cadence,
            elevation_gain,
            pace: workout.pace(),
            speed: workout.speed(),
            description: workout.description().to_string(),
        }
    }
}

impl WorkoutRecord {
    fn into_workout(self) -> Result<Workout, SnapshotError> {
        let input = match (self.kind, self.cadence, self.elevation_gain) {
            (WorkoutKind::Running, Some(cadence), None) => KindInput::Running { cadence },
            (WorkoutKind::Cycling, None, Some(elevation_gain)) => {
                KindInput::Cycling { elevation_gain }
            }
            (kind, _, _) => {
                return Err(SnapshotError::Corrupt(format!(
                    "workout {} has fields that do not match kind {}",
                    self.id,
                    kind.tag()
                )))
            }
        };

        let draft = WorkoutDraft::new(self.distance, self.duration, input).map_err(|e| {
            SnapshotError::Corrupt(format!("workout {}: {}", self.id, e))
        })?;

        Ok(Workout::restore(
            self.id,
            self.coords,
            self.date,
            self.description,
            draft,
        ))
    }
}

/// Snapshot errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Saved workouts could not be read, refusing to overwrite them: {0}")]
    Unreadable(String),
}

/// Reads and writes the workout snapshot through a [`BlobStore`].
#[derive(Debug)]
pub struct SnapshotStore<B: BlobStore> {
    blobs: B,
    key: String,
    /// Set when the last load failed to read the blob at all. Saving is
    /// refused while set so the unread snapshot is not replaced.
    read_failure: Option<String>,
}

impl<B: BlobStore> SnapshotStore<B> {
    /// Create a snapshot store using the default key.
    pub fn new(blobs: B) -> Self {
        Self::with_key(blobs, DEFAULT_SNAPSHOT_KEY)
    }

    /// Create a snapshot store using a custom key.
    pub fn with_key(blobs: B, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
            read_failure: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying blob store.
    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Why the stored snapshot could not be read, if it could not.
    pub fn read_failure(&self) -> Option<&str> {
        self.read_failure.as_deref()
    }

    /// Overwrite the snapshot with the full collection.
    ///
    /// Fails with [`SnapshotError::Unreadable`] after a load that could not
    /// read the stored blob.
    pub fn save(&mut self, workouts: &[Workout]) -> Result<(), SnapshotError> {
        if let Some(reason) = &self.read_failure {
            return Err(SnapshotError::Unreadable(reason.clone()));
        }

        let records: Vec<WorkoutRecord> = workouts.iter().map(WorkoutRecord::from).collect();
        let json = serde_json::to_string(&records)
            .map_err(|e| SnapshotError::Corrupt(e.to_string()))?;

        self.blobs.set(&self.key, &json)?;
        tracing::debug!("Saved snapshot with {} workouts", workouts.len());
        Ok(())
    }

    /// Load the stored collection, or `None` if nothing has been saved.
    pub fn load(&self) -> Result<Option<Vec<Workout>>, SnapshotError> {
        let json = match self.blobs.get(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => return Ok(None),
            Err(StorageError::InvalidData(reason)) => return Err(SnapshotError::Corrupt(reason)),
            Err(e) => return Err(e.into()),
        };

        let records: Vec<WorkoutRecord> =
            serde_json::from_str(&json).map_err(|e| SnapshotError::Corrupt(e.to_string()))?;

        let mut seen = HashSet::with_capacity(records.len());
        let mut workouts = Vec::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.id) {
                return Err(SnapshotError::Corrupt(format!(
                    "duplicate workout id {}",
                    record.id
                )));
            }
            workouts.push(record.into_workout()?);
        }

        Ok(Some(workouts))
    }

    /// Load the stored collection, starting fresh if it is missing or corrupt.
    ///
    /// A blob that cannot be read at all also yields an empty collection, but
    /// later saves are refused until [`clear`](Self::clear) succeeds.
    pub fn load_or_empty(&mut self) -> Vec<Workout> {
        self.read_failure = None;
        match self.load() {
            Ok(Some(workouts)) => {
                tracing::info!("Loaded {} workouts from snapshot", workouts.len());
                workouts
            }
            Ok(None) => Vec::new(),
            Err(SnapshotError::Corrupt(reason)) => {
                tracing::warn!("Ignoring corrupt snapshot: {}", reason);
                Vec::new()
            }
            Err(e) => {
                tracing::error!("Failed to read snapshot, leaving it untouched: {}", e);
                self.read_failure = Some(e.to_string());
                Vec::new()
            }
        }
    }

    /// Delete the stored snapshot.
    pub fn clear(&mut self) -> Result<(), SnapshotError> {
        self.blobs.remove(&self.key)?;
        self.read_failure = None;
        Ok(())
    }
}
