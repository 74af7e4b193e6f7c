use crate::types::{Coords, WorkoutType};
use crate::utils::parse_coords;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    about = "Log running and cycling workouts at a place on the map"
)]
pub struct Cli {
    /// Workout database (SQLite).
    ///
    /// Default: ~/.mapty/workouts.sqlite3
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Current position as LAT,LNG. Without it, anything that needs a
    /// position fix (new workouts without --at, marker export) is refused.
    #[arg(long, global = true, value_name = "LAT,LNG", value_parser = parse_coords, allow_hyphen_values = true)]
    pub home: Option<Coords>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Running,
    Cycling,
}

impl From<Kind> for WorkoutType {
    fn from(k: Kind) -> Self {
        match k {
            Kind::Running => Self::Running,
            Kind::Cycling => Self::Cycling,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Log a new workout.
    Add {
        #[arg(value_enum)]
        kind: Kind,

        /// Distance in km.
        #[arg(long)]
        distance: f64,

        /// Duration in minutes.
        #[arg(long)]
        duration: f64,

        /// Steps per minute (running).
        #[arg(long)]
        cadence: Option<f64>,

        /// Elevation gain in meters (cycling).
        #[arg(long, allow_hyphen_values = true)]
        elevation: Option<f64>,

        /// Where the workout happened; defaults to --home.
        #[arg(long, value_name = "LAT,LNG", value_parser = parse_coords, allow_hyphen_values = true)]
        at: Option<Coords>,
    },

    /// List workouts, oldest first or by distance.
    List {
        /// Longest workouts first.
        #[arg(long)]
        sort: bool,
    },

    /// Change an existing workout. Omitted fields keep their current value.
    Edit {
        id: String,

        #[arg(long = "type", value_enum)]
        kind: Option<Kind>,

        #[arg(long)]
        distance: Option<f64>,

        #[arg(long)]
        duration: Option<f64>,

        #[arg(long)]
        cadence: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        elevation: Option<f64>,
    },

    /// Delete one workout.
    Delete { id: String },

    /// Delete every workout.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },

    /// Write all workouts as GPX waypoints.
    Markers {
        /// Output file; stdout when omitted.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Center the map on this workout.
        #[arg(long, value_name = "ID")]
        focus: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "mapty",
            "add",
            "cycling",
            "--distance",
            "27",
            "--duration",
            "95",
            "--elevation",
            "-12",
            "--at",
            "-33.9,18.4",
        ])
        .expect("valid args");

        match cli.cmd {
            Cmd::Add {
                kind,
                elevation,
                at,
                ..
            } => {
                assert_eq!(kind, Kind::Cycling);
                assert_eq!(elevation, Some(-12.0));
                assert_eq!(at, Some(Coords(-33.9, 18.4)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mapty", "list", "--sort", "-vv", "--home", "51.5,-0.12"])
            .expect("valid args");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.home, Some(Coords(51.5, -0.12)));
        assert!(matches!(cli.cmd, Cmd::List { sort: true }));
    }

    #[test]
    fn markers_focus_takes_a_workout_id() {
        let cli = Cli::try_parse_from(["mapty", "markers", "--focus", "1234567890"])
            .expect("valid args");
        match cli.cmd {
            Cmd::Markers { out, focus } => {
                assert_eq!(out, None);
                assert_eq!(focus.as_deref(), Some("1234567890"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
