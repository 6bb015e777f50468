//! Authoritative ordered workout collection.

use std::collections::HashMap;

use thiserror::Error;

use crate::workouts::{Workout, WorkoutDraft, WorkoutId};

/// Field the collection can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Distance,
    Duration,
}

impl SortField {
    /// Label shown on the sort control.
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Distance => "DISTANCE",
            SortField::Duration => "DURATION",
        }
    }

    fn key(&self, workout: &Workout) -> f64 {
        match self {
            SortField::Distance => workout.distance(),
            SortField::Duration => workout.duration(),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Arrow shown next to the active sort control.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Workout not found: {0}")]
    NotFound(WorkoutId),

    #[error("Duplicate workout id: {0}")]
    DuplicateId(WorkoutId),
}

/// Ordered workout collection with an id index.
///
/// The order of the collection is the displayed order; sorting rewrites it.
#[derive(Debug, Clone, Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
    index: HashMap<WorkoutId, usize>,
}

impl WorkoutStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an existing ordered collection.
    pub fn from_workouts(workouts: Vec<Workout>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for workout in workouts {
            store.add(workout)?;
        }
        Ok(store)
    }

    /// Append a workout.
    pub fn add(&mut self, workout: Workout) -> Result<(), StoreError> {
        let id = workout.id();
        if self.index.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        self.index.insert(id, self.workouts.len());
        self.workouts.push(workout);
        Ok(())
    }

    /// Replace the editable fields of a workout, keeping its id, position,
    /// creation time and description. Pace or speed is recomputed.
    pub fn update(&mut self, id: WorkoutId, draft: &WorkoutDraft) -> Result<&Workout, StoreError> {
        let position = self.position(id)?;
        let workout = &mut self.workouts[position];
        workout.apply_edit(draft);
        Ok(workout)
    }

    /// Re-derive the title of a workout from its current kind.
    pub fn refresh_description(&mut self, id: WorkoutId) -> Result<&Workout, StoreError> {
        let position = self.position(id)?;
        let workout = &mut self.workouts[position];
        workout.refresh_description();
        Ok(workout)
    }

    /// Remove a workout and return it.
    pub fn remove(&mut self, id: WorkoutId) -> Result<Workout, StoreError> {
        let position = self.position(id)?;
        let removed = self.workouts.remove(position);
        self.reindex();
        Ok(removed)
    }

    /// Look up a workout by id.
    pub fn find_by_id(&self, id: WorkoutId) -> Option<&Workout> {
        self.index.get(&id).map(|&i| &self.workouts[i])
    }

    pub fn contains(&self, id: WorkoutId) -> bool {
        self.index.contains_key(&id)
    }

    /// Reorder the collection by `field` and return the new order.
    ///
    /// The sort is stable, so equal values keep their relative order.
    pub fn sort_by(&mut self, field: SortField, direction: SortDirection) -> &[Workout] {
        self.workouts.sort_by(|a, b| {
            let ordering = field.key(a).total_cmp(&field.key(b));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        self.reindex();
        &self.workouts
    }

    /// Drop every workout.
    pub fn clear(&mut self) {
        self.workouts.clear();
        self.index.clear();
    }

    pub fn as_slice(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Workout> {
        self.workouts.iter()
    }

    /// Ids in collection order.
    pub fn ids(&self) -> Vec<WorkoutId> {
        self.workouts.iter().map(Workout::id).collect()
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    fn position(&self, id: WorkoutId) -> Result<usize, StoreError> {
        self.index.get(&id).copied().ok_or(StoreError::NotFound(id))
    }

    fn reindex(&mut self) {
        self.index = self
            .workouts
            .iter()
            .enumerate()
            .map(|(i, w)| (w.id(), i))
            .collect();
    }
}

impl<'a> IntoIterator for &'a WorkoutStore {
    type Item = &'a Workout;
    type IntoIter = std::slice::Iter<'a, Workout>;

    fn into_iter(self) -> Self::IntoIter {
        self.workouts.iter()
    }
}
