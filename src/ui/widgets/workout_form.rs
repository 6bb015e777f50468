//! Workout entry form widget.

use egui::{Key, RichText, Ui};

use crate::tracker::{FormValues, WorkoutForm};
use crate::workouts::WorkoutKind;

/// Form interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Submit,
    Cancel,
}

/// Entry form shown above the workout list.
#[derive(Debug, Default)]
pub struct WorkoutFormPanel {
    values: FormValues,
    visible: bool,
    /// Move keyboard focus to the distance field on the next frame
    focus_distance: bool,
}

impl WorkoutFormPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Render the form. Returns a submit or cancel, if any.
    pub fn show(&mut self, ui: &mut Ui, editing: bool) -> Option<FormEvent> {
        if !self.visible {
            return None;
        }

        let mut event = None;

        egui::Frame::new()
            .fill(ui.visuals().faint_bg_color)
            .inner_margin(12.0)
            .corner_radius(8.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());

                let heading = if editing { "Edit workout" } else { "New workout" };
                ui.label(RichText::new(heading).strong());
                ui.add_space(6.0);

                egui::Grid::new("workout_form_grid")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Type");
                        egui::ComboBox::from_id_salt("workout_kind")
                            .selected_text(self.values.kind.label())
                            .show_ui(ui, |ui| {
                                for kind in [WorkoutKind::Running, WorkoutKind::Cycling] {
                                    ui.selectable_value(&mut self.values.kind, kind, kind.label());
                                }
                            });
                        ui.end_row();

                        ui.label("Distance");
                        let distance = ui.add(
                            egui::TextEdit::singleline(&mut self.values.distance).hint_text("km"),
                        );
                        if self.focus_distance {
                            distance.request_focus();
                            self.focus_distance = false;
                        }
                        ui.end_row();

                        ui.label("Duration");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.values.duration).hint_text("min"),
                        );
                        ui.end_row();

                        match self.values.kind {
                            WorkoutKind::Running => {
                                ui.label("Cadence");
                                ui.add(
                                    egui::TextEdit::singleline(&mut self.values.cadence)
                                        .hint_text("step/min"),
                                );
                            }
                            WorkoutKind::Cycling => {
                                ui.label("Elev Gain");
                                ui.add(
                                    egui::TextEdit::singleline(&mut self.values.elevation_gain)
                                        .hint_text("meters"),
                                );
                            }
                        }
                        ui.end_row();
                    });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        event = Some(FormEvent::Submit);
                    }
                    if ui.button("Cancel").clicked() {
                        event = Some(FormEvent::Cancel);
                    }
                });
            });

        if event.is_none() && ui.is_enabled() {
            ui.input(|i| {
                if i.key_pressed(Key::Enter) {
                    event = Some(FormEvent::Submit);
                } else if i.key_pressed(Key::Escape) {
                    event = Some(FormEvent::Cancel);
                }
            });
        }

        event
    }
}

impl WorkoutForm for WorkoutFormPanel {
    fn read(&self) -> FormValues {
        self.values.clone()
    }

    fn populate(&mut self, values: FormValues) {
        self.values = values;
    }

    fn clear(&mut self) {
        self.values.clear_numbers();
    }

    fn show(&mut self) {
        self.visible = true;
        self.focus_distance = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}
