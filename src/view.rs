use crate::error::PositionError;
use crate::session::SortedView;
use crate::types::{Activity, Coords, Workout};
use crate::utils::format_number;
use std::io::{self, Write};

/// One-shot source of the user's current position.
pub trait PositionProvider {
    fn request_position(self) -> Result<Coords, PositionError>;
}

/// Position configured up front (e.g. `--home`). `None` behaves like a
/// denied geolocation request.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition(pub Option<Coords>);

impl PositionProvider for FixedPosition {
    fn request_position(self) -> Result<Coords, PositionError> {
        self.0.ok_or(PositionError::Unavailable)
    }
}

/// Places one marker per workout on a map.
pub trait MarkerRenderer {
    fn place_marker(&mut self, workout: &Workout);
}

/// Draws the workout list. Every call rebuilds the list from scratch.
pub trait ListRenderer {
    fn render(&mut self, view: &SortedView<'_>) -> io::Result<()>;
}

/// Plain text list, one block per workout.
pub struct TextList<W> {
    out: W,
}

impl<W: Write> TextList<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_one(&mut self, w: &Workout) -> io::Result<()> {
        let icon = w.kind().icon();
        writeln!(self.out, "[{}] {}", w.id(), w.description())?;
        writeln!(
            self.out,
            "  {icon} {} km   ⏱ {} min",
            format_number(w.distance()),
            format_number(w.duration())
        )?;
        match w.activity() {
            Activity::Running { cadence, pace } => writeln!(
                self.out,
                "  ⚡️ {pace:.1} min/km   🦶🏼 {} spm",
                format_number(*cadence)
            ),
            Activity::Cycling {
                elevation_gain,
                speed,
            } => writeln!(
                self.out,
                "  ⚡️ {speed:.1} km/h   ⛰ {} m",
                format_number(*elevation_gain)
            ),
        }
    }
}

impl<W: Write> ListRenderer for TextList<W> {
    fn render(&mut self, view: &SortedView<'_>) -> io::Result<()> {
        if view.is_empty() {
            writeln!(self.out, "No workouts yet.")?;
            return Ok(());
        }
        for w in view.iter() {
            self.render_one(w)?;
        }
        self.out.flush()
    }
}
