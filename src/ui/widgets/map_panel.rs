//! Workout map widget.
//!
//! Draws markers and their popups on an egui_plot canvas in lat/lng space
//! (x = longitude, y = latitude) and reports clicks as map positions.

use egui::{Align2, Color32, RichText, Ui};
use egui_plot::{MarkerShape, Plot, PlotBounds, PlotPoint, Points, Text};

use crate::tracker::{MapView, MarkerHandle, PopupOptions, ViewOptions};
use crate::ui::theme;
use crate::workouts::Coordinates;

/// Interaction on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// Empty map area clicked at the given position
    Clicked(Coordinates),
}

#[derive(Debug, Clone)]
struct Popup {
    content: String,
    options: PopupOptions,
}

#[derive(Debug, Clone)]
struct PlacedMarker {
    handle: MarkerHandle,
    coords: Coordinates,
    popup: Option<Popup>,
}

/// Map panel state.
pub struct MapPanel {
    center: Coordinates,
    zoom: u8,
    /// View change requested but not yet applied to the plot
    recenter: Option<Coordinates>,
    markers: Vec<PlacedMarker>,
    next_handle: u64,
}

impl MapPanel {
    /// Create a map centered on `center`.
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            recenter: Some(center),
            markers: Vec::new(),
            next_handle: 0,
        }
    }

    pub fn center(&self) -> Coordinates {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Popup text of a marker, if it has one.
    pub fn popup(&self, marker: MarkerHandle) -> Option<&str> {
        self.markers
            .iter()
            .find(|m| m.handle == marker)
            .and_then(|m| m.popup.as_ref())
            .map(|p| p.content.as_str())
    }

    /// Degrees of latitude/longitude visible at the current zoom.
    fn span(&self) -> f64 {
        360.0 / 2f64.powi(self.zoom as i32) * 4.0
    }

    /// Render the map. Returns a click on the map, if any.
    pub fn show(&mut self, ui: &mut Ui) -> Option<MapEvent> {
        let recenter = self.recenter.take();
        let half = self.span() / 2.0;

        let plot = Plot::new("workout_map")
            .data_aspect(1.0)
            .show_axes([false, false])
            .show_grid([true, true])
            .allow_double_click_reset(false)
            .height(ui.available_height().max(200.0));

        let markers = &self.markers;
        let plot_response = plot.show(ui, |plot_ui| {
            if let Some(center) = recenter {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [center.lng - half, center.lat - half],
                    [center.lng + half, center.lat + half],
                ));
            }

            for marker in markers {
                let color = marker
                    .popup
                    .as_ref()
                    .map(|p| theme::popup_color(&p.options.class_name))
                    .unwrap_or(Color32::LIGHT_BLUE);

                plot_ui.points(
                    Points::new(
                        format!("marker-{}", marker.handle.raw()),
                        vec![[marker.coords.lng, marker.coords.lat]],
                    )
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(7.0)
                    .color(color),
                );

                if let Some(popup) = &marker.popup {
                    plot_ui.text(
                        Text::new(
                            format!("popup-{}", marker.handle.raw()),
                            PlotPoint::new(marker.coords.lng, marker.coords.lat),
                            RichText::new(format!("{}\n ", popup.content)).color(color),
                        )
                        .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            }
        });

        let response = &plot_response.response;
        if !response.clicked() {
            return None;
        }
        let pos = response.interact_pointer_pos()?;
        let value = plot_response.transform.value_from_position(pos);
        Some(MapEvent::Clicked(Coordinates::new(value.y, value.x)))
    }
}

impl MapView for MapPanel {
    fn add_marker(&mut self, coords: Coordinates) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle::new(self.next_handle);
        self.markers.push(PlacedMarker {
            handle,
            coords,
            popup: None,
        });
        handle
    }

    fn bind_popup(&mut self, marker: MarkerHandle, content: &str, options: &PopupOptions) {
        if let Some(placed) = self.markers.iter_mut().find(|m| m.handle == marker) {
            placed.popup = Some(Popup {
                content: content.to_string(),
                options: options.clone(),
            });
        }
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        self.markers.retain(|m| m.handle != marker);
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8, _options: &ViewOptions) {
        self.center = center;
        self.zoom = zoom;
        self.recenter = Some(center);
    }
}
