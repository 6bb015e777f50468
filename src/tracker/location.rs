//! Starting position for the map.

use std::path::Path;

use thiserror::Error;

use crate::storage::config::MapSettings;
use crate::workouts::Coordinates;

/// Geolocation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeolocationError {
    #[error("Could not get your position")]
    Unavailable,

    #[error("Position access denied: {0}")]
    Denied(String),
}

/// Source of the user's current position.
pub trait Geolocator {
    fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Position taken from the `map.home` setting.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    home: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(home: Option<Coordinates>) -> Self {
        Self { home }
    }

    pub fn from_settings(settings: &MapSettings) -> Self {
        Self::new(settings.home)
    }
}

impl Geolocator for ConfiguredLocation {
    fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        match self.home {
            Some(coords) if coords.lat.is_finite() && coords.lng.is_finite() => Ok(coords),
            Some(coords) => Err(GeolocationError::Denied(format!(
                "invalid home position {}",
                coords
            ))),
            None => Err(GeolocationError::Unavailable),
        }
    }
}

/// Where the map opens.
///
/// Falls back to `map.default_center` when the position is unavailable, so
/// the map can always be clicked. The error is returned for display.
pub fn start_position(
    locator: &impl Geolocator,
    settings: &MapSettings,
) -> (Coordinates, Option<GeolocationError>) {
    match locator.current_position() {
        Ok(position) => (position, None),
        Err(e) => (settings.default_center, Some(e)),
    }
}

/// Notice shown when the map opened on the fallback center.
pub fn fallback_notice(err: &GeolocationError, config_path: &Path) -> String {
    format!(
        "{}. Set map.home in {} to start the map at your position.",
        err,
        config_path.display()
    )
}
