use crate::error::WorkoutError;
use chrono::{DateTime, Datelike, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of trailing epoch-millisecond digits kept in a workout id.
pub const ID_WIDTH: usize = 10;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Running,
    Cycling,
}

impl WorkoutType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴‍♀️",
        }
    }
}

impl FromStr for WorkoutType {
    type Err = WorkoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(Self::Running),
            "cycling" => Ok(Self::Cycling),
            _ => Err(WorkoutError::InvalidVariant(s.to_string())),
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(latitude, longitude)` in degrees. Stored as a two element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords(pub f64, pub f64);

impl Coords {
    pub const fn lat(self) -> f64 {
        self.0
    }

    pub const fn lng(self) -> f64 {
        self.1
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.0, self.1)
    }
}

/// Variant payload: the activity specific metric plus its derived value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Activity {
    Running {
        /// steps per minute
        cadence: f64,
        /// min/km
        pace: f64,
    },
    Cycling {
        /// meters
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        /// km/h
        speed: f64,
    },
}

impl Activity {
    /// Builds the payload for `kind` with its derived metric computed.
    pub fn new(kind: WorkoutType, distance: f64, duration: f64, extra: f64) -> Self {
        match kind {
            WorkoutType::Running => Self::Running {
                cadence: extra,
                pace: pace(distance, duration),
            },
            WorkoutType::Cycling => Self::Cycling {
                elevation_gain: extra,
                speed: speed(distance, duration),
            },
        }
    }

    pub const fn kind(&self) -> WorkoutType {
        match self {
            Self::Running { .. } => WorkoutType::Running,
            Self::Cycling { .. } => WorkoutType::Cycling,
        }
    }

    /// Cadence for running, elevation gain for cycling.
    pub const fn extra(&self) -> f64 {
        match self {
            Self::Running { cadence, .. } => *cadence,
            Self::Cycling { elevation_gain, .. } => *elevation_gain,
        }
    }
}

pub fn pace(distance: f64, duration: f64) -> f64 {
    duration / distance
}

pub fn speed(distance: f64, duration: f64) -> f64 {
    distance / (duration / 60.0)
}

/// Hands out workout ids: the last [`ID_WIDTH`] digits of the creation time
/// in epoch milliseconds, bumped forward so one clock never repeats itself.
#[derive(Debug, Default, Clone)]
pub struct IdClock {
    last_ms: i64,
}

impl IdClock {
    pub fn next_id(&mut self, now: DateTime<FixedOffset>) -> String {
        let ms = now.timestamp_millis().max(self.last_ms.saturating_add(1));
        self.last_ms = ms;

        let digits = ms.to_string();
        let start = digits.len().saturating_sub(ID_WIDTH);
        digits[start..].to_string()
    }
}

/// A single logged exercise session.
///
/// The header (`id`, `created_at`, `coords`, `description`) never changes once
/// built. Distance, duration and the activity payload may be rewritten by an
/// edit, after which [`Workout::recompute`] refreshes the derived metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    id: String,
    /// Kept with the offset it was logged under; the description's month
    /// and day are read in that offset.
    #[serde(alias = "date")]
    created_at: DateTime<FixedOffset>,
    coords: Coords,
    distance: f64,
    duration: f64,
    description: String,
    #[serde(flatten)]
    activity: Activity,
}

impl Workout {
    /// Builds a workout from an untyped variant name.
    ///
    /// Values are not validated here; the form layer rejects non-finite and
    /// non-positive input before anything reaches the model.
    pub fn create(
        kind: &str,
        coords: Coords,
        distance: f64,
        duration: f64,
        extra: f64,
        id: String,
        created_at: DateTime<FixedOffset>,
    ) -> Result<Self, WorkoutError> {
        let kind: WorkoutType = kind.parse()?;
        Ok(Self::new(kind, coords, distance, duration, extra, id, created_at))
    }

    pub fn new(
        kind: WorkoutType,
        coords: Coords,
        distance: f64,
        duration: f64,
        extra: f64,
        id: String,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            description: describe(kind, &created_at),
            id,
            created_at,
            coords,
            distance,
            duration,
            activity: Activity::new(kind, distance, duration, extra),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance(&self) -> f64 {
        self.distance
    }

    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn activity(&self) -> &Activity {
        &self.activity
    }

    pub const fn kind(&self) -> WorkoutType {
        self.activity.kind()
    }

    pub const fn pace(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { pace, .. } => Some(pace),
            Activity::Cycling { .. } => None,
        }
    }

    pub const fn speed(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { speed, .. } => Some(speed),
            Activity::Running { .. } => None,
        }
    }

    /// Text shown in the map popup for this workout.
    pub fn popup_content(&self) -> String {
        format!("{} {}", self.kind().icon(), self.description)
    }

    /// Replaces the editable fields. Derived metrics are stale until
    /// [`Workout::recompute`] runs.
    ///
    /// Switching variant rebuilds the description from the new type and the
    /// original creation time, so it stays a function of `(type, created_at)`.
    pub fn rewrite(&mut self, distance: f64, duration: f64, activity: Activity) {
        let kind_changed = activity.kind() != self.kind();
        self.distance = distance;
        self.duration = duration;
        self.activity = activity;
        if kind_changed {
            self.description = describe(self.kind(), &self.created_at);
        }
    }

    /// Recomputes pace or speed from the current distance and duration.
    pub fn recompute(&mut self) {
        let (distance, duration) = (self.distance, self.duration);
        match &mut self.activity {
            Activity::Running { pace: p, .. } => *p = pace(distance, duration),
            Activity::Cycling { speed: s, .. } => *s = speed(distance, duration),
        }
    }
}

fn describe(kind: WorkoutType, created_at: &DateTime<FixedOffset>) -> String {
    format!(
        "{} on {} {}",
        kind.label(),
        MONTHS[created_at.month0() as usize],
        created_at.day()
    )
}
