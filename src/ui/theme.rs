//! UI theme definitions.

use egui::{Color32, Visuals};

use crate::workouts::WorkoutKind;

/// Theme configuration for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Get the egui Visuals for this theme.
    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => dark_visuals(),
            Theme::Light => light_visuals(),
        }
    }

    /// The other theme.
    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Icon for the theme toggle button.
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Dark => "🌙",
            Theme::Light => "☀",
        }
    }
}

/// Dark theme colors.
pub struct DarkTheme;

impl DarkTheme {
    /// Background color
    pub const BACKGROUND: Color32 = Color32::from_rgb(45, 52, 57);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgb(42, 49, 54);
    /// Card background
    pub const CARD_BG: Color32 = Color32::from_rgb(66, 72, 77);
    /// Primary text
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(236, 239, 241);
    /// Secondary text
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(170, 170, 170);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(80, 86, 92);
}

/// Light theme colors.
pub struct LightTheme;

impl LightTheme {
    /// Background color
    pub const BACKGROUND: Color32 = Color32::from_rgb(250, 250, 252);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgb(255, 255, 255);
    /// Card background
    pub const CARD_BG: Color32 = Color32::from_rgb(240, 242, 244);
    /// Primary text
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(32, 32, 40);
    /// Secondary text
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(96, 96, 104);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(218, 218, 224);
}

/// Running accent (green)
pub const RUNNING: Color32 = Color32::from_rgb(0, 196, 106);
/// Cycling accent (orange)
pub const CYCLING: Color32 = Color32::from_rgb(255, 181, 69);
/// Warning color (red)
pub const WARNING: Color32 = Color32::from_rgb(234, 67, 53);

/// Accent color for a workout kind.
pub fn kind_color(kind: WorkoutKind) -> Color32 {
    match kind {
        WorkoutKind::Running => RUNNING,
        WorkoutKind::Cycling => CYCLING,
    }
}

/// Accent color for a popup styling class such as `cycling-popup`.
pub fn popup_color(class_name: &str) -> Color32 {
    if class_name.starts_with(WorkoutKind::Cycling.tag()) {
        CYCLING
    } else {
        RUNNING
    }
}

/// Create dark theme visuals.
fn dark_visuals() -> Visuals {
    let mut visuals = Visuals::dark();

    visuals.window_fill = DarkTheme::PANEL_BG;
    visuals.panel_fill = DarkTheme::PANEL_BG;
    visuals.faint_bg_color = DarkTheme::CARD_BG;
    visuals.extreme_bg_color = DarkTheme::BACKGROUND;

    visuals.widgets.noninteractive.bg_fill = DarkTheme::CARD_BG;
    visuals.widgets.inactive.bg_fill = DarkTheme::CARD_BG;
    visuals.widgets.active.bg_fill = RUNNING;

    visuals.selection.bg_fill = RUNNING.linear_multiply(0.4);
    visuals.selection.stroke.color = RUNNING;

    visuals.widgets.noninteractive.fg_stroke.color = DarkTheme::TEXT_PRIMARY;
    visuals.widgets.inactive.fg_stroke.color = DarkTheme::TEXT_SECONDARY;

    visuals.widgets.noninteractive.bg_stroke.color = DarkTheme::BORDER;
    visuals.widgets.inactive.bg_stroke.color = DarkTheme::BORDER;

    visuals
}

/// Create light theme visuals.
fn light_visuals() -> Visuals {
    let mut visuals = Visuals::light();

    visuals.window_fill = LightTheme::PANEL_BG;
    visuals.panel_fill = LightTheme::PANEL_BG;
    visuals.faint_bg_color = LightTheme::CARD_BG;
    visuals.extreme_bg_color = LightTheme::BACKGROUND;

    visuals.widgets.noninteractive.bg_fill = LightTheme::CARD_BG;
    visuals.widgets.inactive.bg_fill = LightTheme::CARD_BG;

    visuals.selection.bg_fill = RUNNING.linear_multiply(0.2);
    visuals.selection.stroke.color = RUNNING;

    visuals.widgets.noninteractive.fg_stroke.color = LightTheme::TEXT_PRIMARY;
    visuals.widgets.inactive.fg_stroke.color = LightTheme::TEXT_SECONDARY;

    visuals.widgets.noninteractive.bg_stroke.color = LightTheme::BORDER;
    visuals.widgets.inactive.bg_stroke.color = LightTheme::BORDER;

    visuals
}
