use std::fs;

use snake_core::Score;
use snake_persistence::{FileHighScoreStore, PersistenceError};
use snake_system_session::HighScoreStore;

#[test]
fn missing_file_reads_as_zero() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = FileHighScoreStore::new(dir.path().join("absent.toml"));

    assert_eq!(store.read().expect("read succeeds"), Score::ZERO);
}

#[test]
fn written_score_survives_a_new_store() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("nested").join("best.toml");

    let mut store = FileHighScoreStore::new(&path);
    store.write(Score::new(90)).expect("write succeeds");

    let reopened = FileHighScoreStore::new(&path);
    assert_eq!(reopened.read().expect("read succeeds"), Score::new(90));
    assert!(!dir.path().join("nested").join("best.toml.tmp").exists());
}

#[test]
fn rewrite_replaces_previous_record() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("best.toml");
    let mut store = FileHighScoreStore::new(&path);

    store.write(Score::new(40)).expect("first write");
    store.write(Score::new(70)).expect("second write");

    let contents = fs::read_to_string(&path).expect("file exists");
    assert_eq!(contents.trim(), "high_score = 70");
}

#[test]
fn malformed_file_reports_parse_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("best.toml");
    fs::write(&path, "high_score = \"lots\"").expect("seed file");

    let error = FileHighScoreStore::new(&path)
        .read()
        .expect_err("malformed record");

    assert!(matches!(error, PersistenceError::Parse { .. }));
    assert!(error.to_string().contains("best.toml"));
}

#[test]
fn negative_score_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("best.toml");
    fs::write(&path, "high_score = -5").expect("seed file");

    let result = FileHighScoreStore::new(&path).read();

    assert!(matches!(result, Err(PersistenceError::Parse { .. })));
}

#[test]
fn directory_in_place_of_file_reports_io_error() {
    let dir = tempfile::tempdir().expect("create temp dir");

    let result = FileHighScoreStore::new(dir.path()).read();

    assert!(matches!(result, Err(PersistenceError::Io { .. })));
}
