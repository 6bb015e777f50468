//! Main application state and egui integration.

use eframe::egui;

use maprun::storage::config::{get_config_path, get_data_dir, load_config, AppConfig};
use maprun::storage::{FileBlobStore, SnapshotStore};
use maprun::tracker::{
    fallback_notice, start_position, ConfiguredLocation, Mode, SortField, TrackerError,
    ViewSynchronizer, WorkoutTracker,
};
use maprun::ui::theme::{self, Theme};
use maprun::ui::{FormEvent, MapEvent, MapPanel, WorkoutFormPanel, WorkoutListPanel};

type Tracker = WorkoutTracker<FileBlobStore, MapPanel, WorkoutListPanel, WorkoutFormPanel>;

/// Main application state.
pub struct MapRunApp {
    /// UI theme
    theme: Theme,
    /// Workout state, storage and views
    tracker: Tracker,
    /// Shown above the map when it opened on the fallback center
    location_notice: Option<String>,
    /// Blocking alert shown on top of everything
    alert: Option<String>,
}

impl MapRunApp {
    /// Create a new application instance.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = load_config().unwrap_or_else(|e| {
            tracing::warn!("Using default configuration: {}", e);
            AppConfig {
                data_dir: get_data_dir(),
                ..Default::default()
            }
        });

        let theme = Theme::Dark;
        cc.egui_ctx.set_visuals(theme.visuals());

        let blobs = FileBlobStore::new(config.data_dir.clone());
        let snapshots = SnapshotStore::with_key(blobs, config.storage.snapshot_key.clone());
        let view = ViewSynchronizer::new(WorkoutListPanel::new(), None, config.map.zoom_level);
        let mut tracker = Tracker::new(
            snapshots,
            view,
            WorkoutFormPanel::new(),
            config.tracker.clone(),
        );
        tracing::info!("Loaded {} workouts", tracker.store().len());

        let alert = tracker.snapshots().read_failure().map(|reason| {
            format!(
                "Saved workouts could not be read ({}). Changes will not be saved until Reset.",
                reason
            )
        });

        let locator = ConfiguredLocation::from_settings(&config.map);
        let (center, location_error) = start_position(&locator, &config.map);
        let location_notice = location_error.map(|e| {
            tracing::warn!("Opening map at {}: {}", center, e);
            fallback_notice(&e, &get_config_path())
        });
        tracker.attach_map(MapPanel::new(center, config.map.zoom_level));

        Self {
            theme,
            tracker,
            location_notice,
            alert,
        }
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.theme = self.theme.toggled();
        ctx.set_visuals(self.theme.visuals());
    }

    fn report(&mut self, result: Result<(), TrackerError>) {
        if let Err(e) = result {
            tracing::warn!("{}", e);
            self.alert = Some(e.to_string());
        }
    }

    fn sort_button(&mut self, ui: &mut egui::Ui, field: SortField) {
        let sort = self.tracker.sort();
        let mut text = egui::RichText::new(match sort.direction(field) {
            Some(direction) => format!("{} {}", field.label(), direction.arrow()),
            None => field.label().to_string(),
        });
        if sort.active() == Some(field) {
            text = text.strong().color(theme::RUNNING);
        }

        if ui.button(text).clicked() {
            let result = self.tracker.toggle_sort(field).map(|_| ());
            self.report(result);
        }
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };

        egui::Window::new("MapRun")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(320.0);

                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("⚠").size(24.0).color(theme::WARNING));
                    ui.label(egui::RichText::new(&message).size(16.0));
                });

                ui.add_space(12.0);
                if ui.button("OK").clicked() {
                    self.alert = None;
                }
            });
    }
}

impl eframe::App for MapRunApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let blocked = self.alert.is_some();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("MapRun");
                    ui.separator();

                    ui.label("Sort by");
                    self.sort_button(ui, SortField::Distance);
                    self.sort_button(ui, SortField::Duration);

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(self.theme.icon()).clicked() {
                            self.toggle_theme(ctx);
                        }
                        if ui.button("Reset").clicked() {
                            let result = self.tracker.reset();
                            self.report(result);
                        }
                    });
                });
            });
        });

        egui::SidePanel::left("workouts_panel")
            .resizable(true)
            .default_width(380.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!blocked, |ui| {
                    let editing = matches!(self.tracker.mode(), Mode::Edit(_));
                    match self.tracker.form_mut().show(ui, editing) {
                        Some(FormEvent::Submit) => {
                            let result = self.tracker.submit().map(|_| ());
                            self.report(result);
                        }
                        Some(FormEvent::Cancel) => self.tracker.cancel(),
                        None => {}
                    }

                    ui.add_space(8.0);
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        if let Some(action) = self.tracker.view().list().show(ui) {
                            let result = self.tracker.handle(action);
                            self.report(result);
                        }
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(notice) = &self.location_notice {
                ui.label(egui::RichText::new(notice).color(theme::WARNING));
            }

            let event = match self.tracker.view_mut().map_mut() {
                Some(map) => ui.add_enabled_ui(!blocked, |ui| map.show(ui)).inner,
                None => None,
            };

            if let Some(MapEvent::Clicked(coords)) = event {
                tracing::debug!("Map clicked at {}", coords);
                self.tracker.begin_create(coords);
            }
        });

        self.render_alert(ctx);
    }
}
