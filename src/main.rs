#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result, bail};
use clap::Parser;
use mapty::{
    cli::{self, Cmd},
    database::SqliteStore,
    error::WorkoutError,
    form::WorkoutForm,
    gpx::GpxMarkers,
    session::{Placement, SessionManager, SortOrder},
    types::{Coords, WorkoutType},
    utils,
    view::{FixedPosition, ListRenderer, MarkerRenderer, PositionProvider, TextList},
};
use std::fs;
use std::io;
use std::path::Path;

#[macro_use]
extern crate mapty;

type Session = SessionManager<SqliteStore>;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let db_path = cli.db.clone().unwrap_or_else(utils::default_db_path);
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("opening workout database: {}", db_path.display()))?;
    let mut session = SessionManager::new(store);
    let restored = session.restore().context("reading saved workouts")?;
    dlog!("db={} restored={restored}", db_path.display());

    let position = FixedPosition(cli.home);

    match cli.cmd {
        Cmd::Add {
            kind,
            distance,
            duration,
            cadence,
            elevation,
            at,
        } => {
            let coords = match at {
                Some(c) => c,
                None => position
                    .request_position()
                    .context("pass --at LAT,LNG or set --home")?,
            };
            let form = WorkoutForm {
                kind: WorkoutType::from(kind).as_str().to_string(),
                distance,
                duration,
                cadence,
                elevation,
            };
            submit(&mut session, &form, coords)?;
            render_list(&session, SortOrder::Insertion)
        }
        Cmd::List { sort } => render_list(&session, SortOrder::by_distance(sort)),
        Cmd::Edit {
            id,
            kind,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            let target = session.begin_edit(&id)?;
            let coords = target.coords();
            let form = WorkoutForm::from_workout(target).with_overrides(
                kind.map(|k| WorkoutType::from(k).as_str().to_string()),
                distance,
                duration,
                cadence,
                elevation,
            );
            let submitted = submit(&mut session, &form, coords);
            if submitted.is_err() {
                session.cancel_edit();
            }
            submitted?;
            render_list(&session, SortOrder::Insertion)
        }
        Cmd::Delete { id } => {
            let removed = session.delete(&id)?;
            println!("Deleted {}", removed.description());
            render_list(&session, SortOrder::Insertion)
        }
        Cmd::Clear { yes } => {
            if !yes {
                bail!(
                    "This deletes all {} workouts. Re-run with --yes to confirm.",
                    session.len()
                );
            }
            session.clear_all()?;
            println!("All workouts deleted.");
            Ok(())
        }
        Cmd::Markers { out, focus } => {
            let home = position
                .request_position()
                .context("the map needs a position fix; set --home")?;
            export_markers(&session, home, focus.as_deref(), out.as_deref())
        }
    }
}

fn submit(session: &mut Session, form: &WorkoutForm, coords: Coords) -> Result<()> {
    let input = form.validate()?;
    let draft = session.create(
        input.kind.as_str(),
        coords,
        input.distance,
        input.duration,
        input.extra,
    )?;
    match session.add_or_replace(draft)? {
        Placement::Added(id) => println!("Added workout {id}"),
        Placement::Replaced(id) => println!("Updated workout {id}"),
    }
    Ok(())
}

fn render_list(session: &Session, order: SortOrder) -> Result<()> {
    let mut list = TextList::new(io::stdout().lock());
    list.render(&session.sorted_view(order))
        .context("writing workout list")
}

fn export_markers(
    session: &Session,
    home: Coords,
    focus: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let mut markers = GpxMarkers::default();
    for w in session.workouts() {
        markers.place_marker(w);
    }
    if markers.is_empty() {
        tracing::warn!("no workouts to mark; the map only shows your position");
    }

    let center = match focus {
        Some(id) => {
            let Some(w) = session.find(id) else {
                return Err(WorkoutError::NotFound(id.to_string()).into());
            };
            markers.focus(id);
            w.coords()
        }
        None => home,
    };
    tracing::info!(center = %center, markers = markers.len(), "map markers ready");

    let gpx = markers.to_gpx()?;
    match out {
        Some(path) => fs::write(path, gpx)
            .with_context(|| format!("writing GPX: {}", path.display()))?,
        None => print!("{gpx}"),
    }
    Ok(())
}
