//! Validation boundary between raw user input and the session manager.

use crate::error::FormError;
use crate::types::{Activity, Workout, WorkoutType};

/// Values as collected from the user, already parsed to numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutForm {
    pub kind: String,
    pub distance: f64,
    pub duration: f64,
    pub cadence: Option<f64>,
    pub elevation: Option<f64>,
}

/// Input that passed validation and can be handed to the session manager.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedInput {
    pub kind: WorkoutType,
    pub distance: f64,
    pub duration: f64,
    /// Cadence for running, elevation gain for cycling.
    pub extra: f64,
}

impl WorkoutForm {
    /// Pre-fills the form with an existing workout's values.
    pub fn from_workout(w: &Workout) -> Self {
        let (cadence, elevation) = match w.activity() {
            Activity::Running { cadence, .. } => (Some(*cadence), None),
            Activity::Cycling { elevation_gain, .. } => (None, Some(*elevation_gain)),
        };
        Self {
            kind: w.kind().as_str().to_string(),
            distance: w.distance(),
            duration: w.duration(),
            cadence,
            elevation,
        }
    }

    /// Replaces the fields that were given, keeping the rest.
    #[must_use]
    pub fn with_overrides(
        mut self,
        kind: Option<String>,
        distance: Option<f64>,
        duration: Option<f64>,
        cadence: Option<f64>,
        elevation: Option<f64>,
    ) -> Self {
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(distance) = distance {
            self.distance = distance;
        }
        if let Some(duration) = duration {
            self.duration = duration;
        }
        if cadence.is_some() {
            self.cadence = cadence;
        }
        if elevation.is_some() {
            self.elevation = elevation;
        }
        self
    }

    /// Every value used must be finite; distance, duration and cadence must
    /// be positive. Elevation gain may be zero or negative.
    pub fn validate(&self) -> Result<ValidatedInput, FormError> {
        let kind = self
            .kind
            .parse::<WorkoutType>()
            .map_err(|_| FormError::UnknownType(self.kind.clone()))?;

        let extra = match kind {
            WorkoutType::Running => self
                .cadence
                .ok_or(FormError::Missing("cadence", kind.as_str()))?,
            WorkoutType::Cycling => self
                .elevation
                .ok_or(FormError::Missing("elevation", kind.as_str()))?,
        };
        let extra_name = match kind {
            WorkoutType::Running => "cadence",
            WorkoutType::Cycling => "elevation",
        };

        finite("distance", self.distance)?;
        finite("duration", self.duration)?;
        finite(extra_name, extra)?;

        positive("distance", self.distance)?;
        positive("duration", self.duration)?;
        if kind == WorkoutType::Running {
            positive("cadence", extra)?;
        }

        Ok(ValidatedInput {
            kind,
            distance: self.distance,
            duration: self.duration,
            extra,
        })
    }
}

fn finite(name: &'static str, v: f64) -> Result<(), FormError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(FormError::NotFinite(name))
    }
}

fn positive(name: &'static str, v: f64) -> Result<(), FormError> {
    if v > 0.0 {
        Ok(())
    } else {
        Err(FormError::NotPositive(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coords;
    use chrono::Local;

    fn running(distance: f64, duration: f64, cadence: f64) -> WorkoutForm {
        WorkoutForm {
            kind: "running".into(),
            distance,
            duration,
            cadence: Some(cadence),
            elevation: None,
        }
    }

    #[test]
    fn accepts_valid_running_input() {
        let input = running(5.2, 24.0, 178.0).validate().expect("valid");
        assert_eq!(input.kind, WorkoutType::Running);
        assert_eq!(input.extra, 178.0);
    }

    #[test]
    fn rejects_non_positive_values() {
        assert_eq!(
            running(0.0, 24.0, 178.0).validate(),
            Err(FormError::NotPositive("distance"))
        );
        assert_eq!(
            running(5.0, -1.0, 178.0).validate(),
            Err(FormError::NotPositive("duration"))
        );
        assert_eq!(
            running(5.0, 24.0, 0.0).validate(),
            Err(FormError::NotPositive("cadence"))
        );
    }

    #[test]
    fn rejects_non_finite_values() {
        assert_eq!(
            running(f64::NAN, 24.0, 178.0).validate(),
            Err(FormError::NotFinite("distance"))
        );
        assert_eq!(
            running(5.0, f64::INFINITY, 178.0).validate(),
            Err(FormError::NotFinite("duration"))
        );
    }

    #[test]
    fn cycling_allows_negative_elevation_but_needs_a_value() {
        let mut form = WorkoutForm {
            kind: "cycling".into(),
            distance: 27.0,
            duration: 95.0,
            cadence: Some(90.0),
            elevation: None,
        };
        assert_eq!(form.validate(), Err(FormError::Missing("elevation", "cycling")));

        form.elevation = Some(-40.0);
        let input = form.validate().expect("downhill ride is fine");
        assert_eq!(input.extra, -40.0);

        form.elevation = Some(f64::NAN);
        assert_eq!(form.validate(), Err(FormError::NotFinite("elevation")));
    }

    #[test]
    fn unknown_type_is_a_form_error() {
        let mut form = running(1.0, 1.0, 1.0);
        form.kind = "hiking".into();
        assert_eq!(form.validate(), Err(FormError::UnknownType("hiking".into())));
    }

    #[test]
    fn prefill_then_override_for_edits() {
        let w = Workout::new(
            WorkoutType::Cycling,
            Coords(0.0, 0.0),
            27.0,
            95.0,
            523.0,
            "1".into(),
            Local::now().fixed_offset(),
        );
        let form = WorkoutForm::from_workout(&w);
        assert_eq!(form.elevation, Some(523.0));
        assert_eq!(form.cadence, None);

        let edited = form.with_overrides(None, Some(30.0), None, None, None);
        let input = edited.validate().expect("valid");
        assert_eq!(input.distance, 30.0);
        assert_eq!(input.duration, 95.0);
        assert_eq!(input.extra, 523.0);
    }
}
