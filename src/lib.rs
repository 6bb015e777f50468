//! MapRun - Running and Cycling Workout Map
//!
//! Log runs and rides by clicking where they happened on a map. Workouts are
//! listed in a sidebar, can be sorted, edited and deleted, and are kept
//! across restarts in a JSON snapshot.

pub mod storage;
pub mod tracker;
pub mod ui;
pub mod workouts;

// Re-export commonly used types
pub use storage::config::AppConfig;
pub use tracker::WorkoutTracker;
pub use workouts::{Coordinates, Workout, WorkoutId, WorkoutKind};
