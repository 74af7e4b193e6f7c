use mapty::database::{BlobStore, SqliteStore};
use mapty::error::WorkoutError;
use mapty::form::WorkoutForm;
use mapty::session::{Placement, STORE_KEY, SessionManager, SortOrder};
use mapty::types::{Coords, Workout, WorkoutType};
use std::path::Path;

const LONDON: Coords = Coords(51.5, -0.12);

fn open(path: &Path) -> SessionManager<SqliteStore> {
    let store = SqliteStore::open(path).expect("open sqlite store");
    let mut session = SessionManager::new(store);
    session.restore().expect("restore");
    session
}

fn log(session: &mut SessionManager<SqliteStore>, form: &WorkoutForm) -> String {
    let input = form.validate().expect("valid form");
    let draft = session
        .create(
            input.kind.as_str(),
            LONDON,
            input.distance,
            input.duration,
            input.extra,
        )
        .expect("create");
    match session.add_or_replace(draft).expect("add") {
        Placement::Added(id) => id,
        Placement::Replaced(id) => panic!("unexpected replace of {id}"),
    }
}

fn run(distance: f64, duration: f64, cadence: f64) -> WorkoutForm {
    WorkoutForm {
        kind: "running".into(),
        distance,
        duration,
        cadence: Some(cadence),
        elevation: None,
    }
}

fn ride(distance: f64, duration: f64, elevation: f64) -> WorkoutForm {
    WorkoutForm {
        kind: "cycling".into(),
        distance,
        duration,
        cadence: None,
        elevation: Some(elevation),
    }
}

#[test]
fn workouts_survive_a_restart() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = tmp.path().join("workouts.sqlite3");

    let saved: Vec<Workout> = {
        let mut session = open(&db);
        assert!(session.is_empty());
        log(&mut session, &run(5.2, 24.0, 178.0));
        log(&mut session, &ride(27.0, 95.0, 523.0));
        session.workouts().to_vec()
    };

    let session = open(&db);
    assert_eq!(session.workouts(), saved.as_slice());

    let run = &session.workouts()[0];
    assert_eq!(run.kind(), WorkoutType::Running);
    assert!((run.pace().expect("pace") - 4.615).abs() < 1e-3);
    let ride = &session.workouts()[1];
    assert!((ride.speed().expect("speed") - 17.05).abs() < 1e-2);
}

#[test]
fn edit_delete_and_sort_are_persisted() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = tmp.path().join("workouts.sqlite3");

    let (short, long, middle) = {
        let mut session = open(&db);
        let short = log(&mut session, &run(3.0, 18.0, 170.0));
        let long = log(&mut session, &ride(40.0, 120.0, 300.0));
        let middle = log(&mut session, &run(10.0, 55.0, 175.0));

        session.begin_edit(&short).expect("present");
        let form = WorkoutForm::from_workout(session.edit_target().expect("target"))
            .with_overrides(None, Some(4.0), Some(20.0), None, None);
        let input = form.validate().expect("valid");
        let draft = session
            .create(
                input.kind.as_str(),
                LONDON,
                input.distance,
                input.duration,
                input.extra,
            )
            .expect("create");
        assert_eq!(
            session.add_or_replace(draft).expect("replace"),
            Placement::Replaced(short.clone())
        );
        (short, long, middle)
    };

    let mut session = open(&db);
    let edited = session.find(&short).expect("edited workout kept its id");
    assert_eq!(edited.distance(), 4.0);
    assert_eq!(edited.pace(), Some(5.0));
    assert_eq!(edited.activity().extra(), 170.0);

    let sorted: Vec<String> = session
        .sorted_view(SortOrder::DistanceDescending)
        .iter()
        .map(|w| w.id().to_string())
        .collect();
    assert_eq!(sorted, vec![long.clone(), middle.clone(), short.clone()]);
    let stored: Vec<&str> = session.workouts().iter().map(Workout::id).collect();
    assert_eq!(stored, vec![short.as_str(), long.as_str(), middle.as_str()]);

    session.delete(&long).expect("delete");
    assert!(matches!(
        session.delete(&long),
        Err(WorkoutError::NotFound(_))
    ));
    drop(session);

    let session = open(&db);
    let ids: Vec<&str> = session.workouts().iter().map(Workout::id).collect();
    assert_eq!(ids, vec![short.as_str(), middle.as_str()]);
}

#[test]
fn clear_all_leaves_nothing_to_restore() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = tmp.path().join("workouts.sqlite3");

    {
        let mut session = open(&db);
        log(&mut session, &run(5.0, 25.0, 170.0));
        session.clear_all().expect("clear");
        assert!(session.store().get(STORE_KEY).expect("get").is_none());
    }

    assert!(open(&db).is_empty());
}

#[test]
fn corrupted_blob_restores_as_empty() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = tmp.path().join("workouts.sqlite3");

    {
        let mut store = SqliteStore::open(&db).expect("open");
        store.set(STORE_KEY, "[{\"id\": 1").expect("set");
    }

    let mut session = open(&db);
    assert!(session.is_empty());

    log(&mut session, &ride(12.0, 40.0, 0.0));
    drop(session);
    assert_eq!(open(&db).len(), 1);
}
