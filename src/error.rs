#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite store error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Could not prepare store location: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not encode workouts: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum WorkoutError {
    #[error("Unknown workout type: {0:?} (expected \"running\" or \"cycling\")")]
    InvalidVariant(String),
    #[error("Workout not found: {0}")]
    NotFound(String),
    #[error("Could not persist workouts: {0}")]
    Persistence(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Inputs have to be positive numbers ({0} is not a finite number)")]
    NotFinite(&'static str),
    #[error("Inputs have to be positive numbers ({0} must be greater than zero)")]
    NotPositive(&'static str),
    #[error("Missing {0} for a {1} workout")]
    Missing(&'static str, &'static str),
    #[error("Unknown workout type: {0:?}")]
    UnknownType(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("Could not get your current position")]
    Unavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("GPX generation failed: {0}")]
    Gpx(String),
}
