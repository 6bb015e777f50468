//! UI module for the egui-based user interface.

pub mod theme;
pub mod widgets;

pub use theme::Theme;
pub use widgets::{FormEvent, MapEvent, MapPanel, WorkoutFormPanel, WorkoutListPanel};
