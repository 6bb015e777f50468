//! Workout list widget.
//!
//! Shows one card per workout, newest first, with edit and delete buttons.

use egui::{Color32, RichText, Ui, Vec2};

use crate::tracker::{ListAction, ListEntry, WorkoutList};
use crate::ui::theme;

/// Sidebar list of workout cards.
#[derive(Debug, Default)]
pub struct WorkoutListPanel {
    entries: Vec<ListEntry>,
}

impl WorkoutListPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in display order (top first).
    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    /// Render the list. Returns the action the user picked, if any.
    pub fn show(&self, ui: &mut Ui) -> Option<ListAction> {
        if self.entries.is_empty() {
            ui.label(
                RichText::new("Click on the map to log a workout")
                    .italics()
                    .color(Color32::GRAY),
            );
            return None;
        }

        let mut action = None;
        for entry in &self.entries {
            if let Some(picked) = show_entry(ui, entry) {
                action = Some(picked);
            }
            ui.add_space(6.0);
        }
        action
    }
}

fn show_entry(ui: &mut Ui, entry: &ListEntry) -> Option<ListAction> {
    let accent = theme::kind_color(entry.kind);
    let mut action = None;

    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .inner_margin(12.0)
        .corner_radius(8.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());

            ui.horizontal(|ui| {
                // Kind stripe
                let (rect, _) = ui.allocate_exact_size(Vec2::new(4.0, 20.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 2.0, accent);

                let title = ui.add(
                    egui::Label::new(RichText::new(&entry.title).strong().size(16.0))
                        .sense(egui::Sense::click()),
                );
                if title.clicked() {
                    action = Some(ListAction::Select(entry.id));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("❌").on_hover_text("Delete").clicked() {
                        action = Some(ListAction::Delete(entry.id));
                    }
                    if ui.small_button("🛠").on_hover_text("Edit").clicked() {
                        action = Some(ListAction::Edit(entry.id));
                    }
                });
            });

            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui| {
                for row in &entry.rows {
                    ui.label(row.icon);
                    ui.label(RichText::new(&row.value).strong());
                    ui.label(RichText::new(row.unit).small().color(Color32::GRAY));
                    ui.add_space(10.0);
                }
            });
        });

    action
}

impl WorkoutList for WorkoutListPanel {
    fn clear(&mut self) {
        self.entries.clear();
    }

    fn insert(&mut self, entry: ListEntry) {
        self.entries.insert(0, entry);
    }
}
