//! Workout entity types.
//!
//! A workout is either a run or a ride. Both share position, distance,
//! duration and creation time; the kind-specific input (cadence or elevation
//! gain) and its derived metric (pace or speed) live in [`WorkoutDetails`],
//! so a workout can never carry both or neither.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier assigned when a workout is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(Uuid);

impl WorkoutId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for WorkoutId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geographic position in decimal degrees.
///
/// Serialized as a `[lat, lng]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

impl Coordinates {
    /// Create a new position.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(coords: Coordinates) -> Self {
        [coords.lat, coords.lng]
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// Kind of workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    /// Running (cadence, pace)
    #[default]
    Running,
    /// Cycling (elevation gain, speed)
    Cycling,
}

impl WorkoutKind {
    /// Capitalized display name.
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    /// Lowercase tag, also used for popup styling.
    pub fn tag(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Icon shown in list entries and marker popups.
    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃",
            WorkoutKind::Cycling => "🚴",
        }
    }
}

impl std::fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Kind-specific input and derived metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutDetails {
    Running {
        /// Steps per minute
        cadence: f64,
        /// Minutes per kilometer (derived)
        pace: f64,
    },
    Cycling {
        /// Meters climbed
        elevation_gain: f64,
        /// Kilometers per hour (derived)
        speed: f64,
    },
}

impl WorkoutDetails {
    /// Kind these details belong to.
    pub fn kind(&self) -> WorkoutKind {
        match self {
            WorkoutDetails::Running { .. } => WorkoutKind::Running,
            WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// Form field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    ElevationGain,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Distance => write!(f, "distance"),
            Field::Duration => write!(f, "duration"),
            Field::Cadence => write!(f, "cadence"),
            Field::ElevationGain => write!(f, "elevation gain"),
        }
    }
}

/// Rejected workout input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a number")]
    NotANumber { field: Field },

    #[error("{field} must be finite")]
    NotFinite { field: Field },

    #[error("{field} must be greater than zero")]
    NotPositive { field: Field },

    #[error("{field} must not be negative")]
    Negative { field: Field },
}

impl ValidationError {
    /// Field that failed validation.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::NotANumber { field }
            | ValidationError::NotFinite { field }
            | ValidationError::NotPositive { field }
            | ValidationError::Negative { field } => *field,
        }
    }
}

fn positive(field: Field, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(value)
}

fn non_negative(field: Field, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(value)
}

/// Kind-specific input before derived metrics are computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KindInput {
    Running { cadence: f64 },
    Cycling { elevation_gain: f64 },
}

impl KindInput {
    /// Kind this input describes.
    pub fn kind(&self) -> WorkoutKind {
        match self {
            KindInput::Running { .. } => WorkoutKind::Running,
            KindInput::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// Validated numeric input for creating or editing a workout.
///
/// Holding a `WorkoutDraft` means every field already passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutDraft {
    distance: f64,
    duration: f64,
    input: KindInput,
}

impl WorkoutDraft {
    /// Validate running input.
    pub fn running(distance: f64, duration: f64, cadence: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            distance: positive(Field::Distance, distance)?,
            duration: positive(Field::Duration, duration)?,
            input: KindInput::Running {
                cadence: positive(Field::Cadence, cadence)?,
            },
        })
    }

    /// Validate cycling input.
    pub fn cycling(
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            distance: positive(Field::Distance, distance)?,
            duration: positive(Field::Duration, duration)?,
            input: KindInput::Cycling {
                elevation_gain: non_negative(Field::ElevationGain, elevation_gain)?,
            },
        })
    }

    /// Validate input of either kind.
    pub fn new(distance: f64, duration: f64, input: KindInput) -> Result<Self, ValidationError> {
        match input {
            KindInput::Running { cadence } => Self::running(distance, duration, cadence),
            KindInput::Cycling { elevation_gain } => {
                Self::cycling(distance, duration, elevation_gain)
            }
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn input(&self) -> KindInput {
        self.input
    }

    pub fn kind(&self) -> WorkoutKind {
        self.input.kind()
    }

    fn details(&self) -> WorkoutDetails {
        derive_details(self.distance, self.duration, self.input)
    }
}

fn derive_details(distance: f64, duration: f64, input: KindInput) -> WorkoutDetails {
    match input {
        KindInput::Running { cadence } => WorkoutDetails::Running {
            cadence,
            pace: duration / distance,
        },
        KindInput::Cycling { elevation_gain } => WorkoutDetails::Cycling {
            elevation_gain,
            speed: distance / (duration / 60.0),
        },
    }
}

/// Build the "<Kind> on <Month> <Day>" title.
pub fn describe(kind: WorkoutKind, date: NaiveDate) -> String {
    format!("{} on {}", kind.label(), date.format("%B %-d"))
}

/// A logged running or cycling session.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    coords: Coordinates,
    distance: f64,
    duration: f64,
    created_at: DateTime<Utc>,
    description: String,
    details: WorkoutDetails,
}

impl Workout {
    /// Create a running workout at the given position.
    pub fn running(
        coords: Coordinates,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self::from_draft(
            coords,
            WorkoutDraft::running(distance, duration, cadence)?,
        ))
    }

    /// Create a cycling workout at the given position.
    pub fn cycling(
        coords: Coordinates,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self::from_draft(
            coords,
            WorkoutDraft::cycling(distance, duration, elevation_gain)?,
        ))
    }

    /// Create a workout from validated input, stamped with the current time.
    pub fn from_draft(coords: Coordinates, draft: WorkoutDraft) -> Self {
        Self::from_draft_at(coords, draft, Utc::now())
    }

    /// Create a workout from validated input with an explicit creation time.
    pub fn from_draft_at(
        coords: Coordinates,
        draft: WorkoutDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        let description = describe(draft.kind(), local_date(created_at));
        Self {
            id: WorkoutId::new(),
            coords,
            distance: draft.distance,
            duration: draft.duration,
            created_at,
            description,
            details: draft.details(),
        }
    }

    /// Rebuild a previously stored workout from its validated numbers.
    pub(crate) fn restore(
        id: WorkoutId,
        coords: Coordinates,
        created_at: DateTime<Utc>,
        description: String,
        draft: WorkoutDraft,
    ) -> Self {
        Self {
            id,
            coords,
            distance: draft.distance,
            duration: draft.duration,
            created_at,
            description,
            details: draft.details(),
        }
    }

    pub fn id(&self) -> WorkoutId {
        self.id
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    /// Distance in kilometers.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Duration in minutes.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn details(&self) -> WorkoutDetails {
        self.details
    }

    pub fn kind(&self) -> WorkoutKind {
        self.details.kind()
    }

    /// Kind-specific input without the derived metric.
    pub fn input(&self) -> KindInput {
        match self.details {
            WorkoutDetails::Running { cadence, .. } => KindInput::Running { cadence },
            WorkoutDetails::Cycling { elevation_gain, .. } => {
                KindInput::Cycling { elevation_gain }
            }
        }
    }

    /// Pace in min/km, running only.
    pub fn pace(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Running { pace, .. } => Some(pace),
            WorkoutDetails::Cycling { .. } => None,
        }
    }

    /// Speed in km/h, cycling only.
    pub fn speed(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Cycling { speed, .. } => Some(speed),
            WorkoutDetails::Running { .. } => None,
        }
    }

    /// Copy of this workout with pace or speed recomputed from its current
    /// distance and duration.
    pub fn recompute_derived(&self) -> Workout {
        let mut workout = self.clone();
        workout.recompute_derived_in_place();
        workout
    }

    /// Recompute pace or speed in place.
    pub fn recompute_derived_in_place(&mut self) {
        self.details = derive_details(self.distance, self.duration, self.input());
    }

    /// Re-derive the description from the current kind and creation date.
    ///
    /// Edits leave the description alone; call this to bring it back in line.
    pub fn refresh_description(&mut self) {
        self.description = describe(self.kind(), local_date(self.created_at));
    }

    /// Replace the editable fields, keeping id, position, creation time and
    /// description. Derived metrics are recomputed.
    pub(crate) fn apply_edit(&mut self, draft: &WorkoutDraft) {
        self.distance = draft.distance;
        self.duration = draft.duration;
        self.details = draft.details();
        self.recompute_derived_in_place();
    }
}

fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}
