//! Workout entities: running and cycling sessions with derived metrics.

pub mod types;

pub use types::{
    describe, Coordinates, Field, KindInput, ValidationError, Workout, WorkoutDetails,
    WorkoutDraft, WorkoutId, WorkoutKind,
};
