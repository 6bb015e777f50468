//! Workout state management.
//!
//! [`WorkoutTracker`] owns the authoritative workout collection and routes
//! user actions through:
//! - [`mode`]: whether a submission creates or edits
//! - [`store`]: the ordered collection itself
//! - [`sync`]: list and map marker rebuilding
//! - the snapshot store in [`crate::storage`] for persistence

pub mod controller;
pub mod form;
pub mod location;
pub mod mode;
pub mod store;
pub mod sync;

pub use controller::{SortState, SubmitOutcome, TrackerError, WorkoutTracker};
pub use form::{FormValues, WorkoutForm};
pub use location::{fallback_notice, start_position, ConfiguredLocation, GeolocationError, Geolocator};
pub use mode::{Mode, ModeController};
pub use store::{SortDirection, SortField, StoreError, WorkoutStore};
pub use sync::{
    popup_content, DetailRow, ListAction, ListEntry, MapView, MarkerHandle, MarkerRegistry,
    PopupOptions, ViewOptions, ViewSynchronizer, WorkoutList,
};
