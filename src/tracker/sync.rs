//! Keeps the workout list and map markers in line with the store.
//!
//! Every render is a full rebuild: the list is cleared, every registered
//! marker is removed, and both are redrawn from the collection in order.

use std::collections::HashMap;

use crate::workouts::{Coordinates, Workout, WorkoutDetails, WorkoutId, WorkoutKind};

/// Opaque handle to a marker on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Marker popup presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupOptions {
    pub max_width: f32,
    pub min_width: f32,
    /// Close when another popup opens
    pub auto_close: bool,
    /// Close when the map is clicked
    pub close_on_click: bool,
    /// Styling class, e.g. `running-popup`
    pub class_name: String,
}

impl PopupOptions {
    /// Always-open popup styled for `kind`.
    pub fn for_kind(kind: WorkoutKind) -> Self {
        Self {
            max_width: 250.0,
            min_width: 100.0,
            auto_close: false,
            close_on_click: false,
            class_name: format!("{}-popup", kind.tag()),
        }
    }
}

/// How the map moves to a new center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub animate: bool,
    pub pan_duration_secs: f32,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            animate: true,
            pan_duration_secs: 1.0,
        }
    }
}

/// Map widget the synchronizer draws markers on.
pub trait MapView {
    /// Place a marker and return its handle.
    fn add_marker(&mut self, coords: Coordinates) -> MarkerHandle;

    /// Attach an open popup to a marker.
    fn bind_popup(&mut self, marker: MarkerHandle, content: &str, options: &PopupOptions);

    /// Remove a marker. Unknown handles are ignored.
    fn remove_marker(&mut self, marker: MarkerHandle);

    /// Center the map.
    fn set_view(&mut self, center: Coordinates, zoom: u8, options: &ViewOptions);
}

/// One line of workout details in a list entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl DetailRow {
    fn new(icon: &'static str, value: String, unit: &'static str) -> Self {
        Self { icon, value, unit }
    }
}

/// Rendered list entry for one workout.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub id: WorkoutId,
    pub kind: WorkoutKind,
    pub title: String,
    pub rows: Vec<DetailRow>,
}

impl ListEntry {
    /// Render a workout into its list entry.
    pub fn from_workout(workout: &Workout) -> Self {
        let kind = workout.kind();
        let mut rows = vec![
            DetailRow::new(kind.icon(), workout.distance().to_string(), "km"),
            DetailRow::new("⏱", workout.duration().to_string(), "min"),
        ];

        match workout.details() {
            WorkoutDetails::Running { cadence, pace } => {
                rows.push(DetailRow::new("⚡️", format!("{:.1}", pace), "min/km"));
                rows.push(DetailRow::new("🦶🏼", cadence.to_string(), "spm"));
            }
            WorkoutDetails::Cycling {
                elevation_gain,
                speed,
            } => {
                rows.push(DetailRow::new("⚡️", format!("{:.1}", speed), "km/h"));
                rows.push(DetailRow::new("⛰", elevation_gain.to_string(), "m"));
            }
        }

        Self {
            id: workout.id(),
            kind,
            title: workout.description().to_string(),
            rows,
        }
    }
}

/// Popup text for a workout marker.
pub fn popup_content(workout: &Workout) -> String {
    format!("{} {}", workout.kind().icon(), workout.description())
}

/// Sidebar list the synchronizer fills.
pub trait WorkoutList {
    /// Remove every entry.
    fn clear(&mut self);

    /// Insert an entry above the existing ones.
    fn insert(&mut self, entry: ListEntry);
}

/// User action on a list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    /// Load the workout into the form for editing
    Edit(WorkoutId),
    /// Remove the workout
    Delete(WorkoutId),
    /// Pan the map to the workout
    Select(WorkoutId),
}

/// Workout id to marker handle mapping, used to remove markers later.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    markers: HashMap<WorkoutId, MarkerHandle>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle, returning the one it replaces.
    pub fn insert(&mut self, id: WorkoutId, marker: MarkerHandle) -> Option<MarkerHandle> {
        self.markers.insert(id, marker)
    }

    pub fn remove(&mut self, id: WorkoutId) -> Option<MarkerHandle> {
        self.markers.remove(&id)
    }

    pub fn get(&self, id: WorkoutId) -> Option<MarkerHandle> {
        self.markers.get(&id).copied()
    }

    pub fn contains(&self, id: WorkoutId) -> bool {
        self.markers.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = WorkoutId> + '_ {
        self.markers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    fn drain(&mut self) -> impl Iterator<Item = (WorkoutId, MarkerHandle)> + '_ {
        self.markers.drain()
    }
}

/// Rebuilds the list and the map markers from the workout collection.
///
/// The map is optional: until a position is known there is nothing to draw
/// markers on, and the list still works.
pub struct ViewSynchronizer<M: MapView, L: WorkoutList> {
    map: Option<M>,
    list: L,
    registry: MarkerRegistry,
    zoom: u8,
}

impl<M: MapView, L: WorkoutList> ViewSynchronizer<M, L> {
    /// Create a synchronizer over the given collaborators.
    pub fn new(list: L, map: Option<M>, zoom: u8) -> Self {
        Self {
            map,
            list,
            registry: MarkerRegistry::new(),
            zoom,
        }
    }

    /// Full rebuild of the list and markers.
    pub fn render(&mut self, workouts: &[Workout]) {
        self.list.clear();
        self.retire_all();

        for workout in workouts {
            self.list.insert(ListEntry::from_workout(workout));
            self.render_marker(workout);
        }

        tracing::debug!(
            "Rendered {} workouts, {} markers",
            workouts.len(),
            self.registry.len()
        );
    }

    /// Add the marker for one workout, replacing any marker it already has.
    pub fn render_marker(&mut self, workout: &Workout) -> Option<MarkerHandle> {
        let map = self.map.as_mut()?;

        if let Some(old) = self.registry.remove(workout.id()) {
            map.remove_marker(old);
        }

        let marker = map.add_marker(workout.coords());
        map.bind_popup(
            marker,
            &popup_content(workout),
            &PopupOptions::for_kind(workout.kind()),
        );
        self.registry.insert(workout.id(), marker);
        Some(marker)
    }

    /// Remove the marker for `id` from the map and the registry.
    pub fn retire_marker(&mut self, id: WorkoutId) {
        if let Some(marker) = self.registry.remove(id) {
            if let Some(map) = self.map.as_mut() {
                map.remove_marker(marker);
            }
        }
    }

    /// Center the map on a workout. Returns false when there is no map.
    pub fn pan_to(&mut self, workout: &Workout) -> bool {
        let zoom = self.zoom;
        match self.map.as_mut() {
            Some(map) => {
                map.set_view(workout.coords(), zoom, &ViewOptions::default());
                true
            }
            None => false,
        }
    }

    /// Install the map once it is available and draw the existing workouts.
    pub fn attach_map(&mut self, map: M, workouts: &[Workout]) {
        self.retire_all();
        self.map = Some(map);
        for workout in workouts {
            self.render_marker(workout);
        }
    }

    fn retire_all(&mut self) {
        let markers: Vec<_> = self.registry.drain().collect();
        if let Some(map) = self.map.as_mut() {
            for (_, marker) in markers {
                map.remove_marker(marker);
            }
        }
    }

    pub fn has_map(&self) -> bool {
        self.map.is_some()
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut M> {
        self.map.as_mut()
    }

    pub fn list(&self) -> &L {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut L {
        &mut self.list
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }
}
