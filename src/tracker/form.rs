//! Workout form values and the form collaborator.

use crate::workouts::{Field, KindInput, ValidationError, Workout, WorkoutDraft, WorkoutKind};

/// Raw field contents as typed into the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    pub kind: WorkoutKind,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation_gain: String,
}

impl FormValues {
    /// Empty form for `kind`.
    pub fn empty(kind: WorkoutKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Prefill from an existing workout for editing.
    pub fn from_workout(workout: &Workout) -> Self {
        let mut values = Self {
            kind: workout.kind(),
            distance: workout.distance().to_string(),
            duration: workout.duration().to_string(),
            ..Default::default()
        };
        match workout.input() {
            KindInput::Running { cadence } => values.cadence = cadence.to_string(),
            KindInput::Cycling { elevation_gain } => {
                values.elevation_gain = elevation_gain.to_string()
            }
        }
        values
    }

    /// Parse and validate the fields relevant to the selected kind.
    pub fn parse(&self) -> Result<WorkoutDraft, ValidationError> {
        let distance = parse_number(Field::Distance, &self.distance)?;
        let duration = parse_number(Field::Duration, &self.duration)?;

        match self.kind {
            WorkoutKind::Running => {
                let cadence = parse_number(Field::Cadence, &self.cadence)?;
                WorkoutDraft::running(distance, duration, cadence)
            }
            WorkoutKind::Cycling => {
                let elevation_gain = parse_number(Field::ElevationGain, &self.elevation_gain)?;
                WorkoutDraft::cycling(distance, duration, elevation_gain)
            }
        }
    }

    /// Blank the numeric fields, keeping the selected kind.
    pub fn clear_numbers(&mut self) {
        self.distance.clear();
        self.duration.clear();
        self.cadence.clear();
        self.elevation_gain.clear();
    }
}

fn parse_number(field: Field, raw: &str) -> Result<f64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::NotANumber { field });
    }
    raw.parse::<f64>()
        .map_err(|_| ValidationError::NotANumber { field })
}

/// Entry form the tracker reads submissions from.
pub trait WorkoutForm {
    /// Current field contents.
    fn read(&self) -> FormValues;

    /// Fill every field.
    fn populate(&mut self, values: FormValues);

    /// Blank the numeric fields.
    fn clear(&mut self);

    fn show(&mut self);

    fn hide(&mut self);
}
