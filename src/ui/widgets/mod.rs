//! Widgets backing the tracker's map, list and form.

pub mod map_panel;
pub mod workout_form;
pub mod workout_list;

pub use map_panel::{MapEvent, MapPanel};
pub use workout_form::{FormEvent, WorkoutFormPanel};
pub use workout_list::WorkoutListPanel;
