use rusqlite::Connection;
use std::thread;
use std::time::Duration;
use tagnote_core::{KeyValueRepository, RepoError, SqliteKeyValueRepository};

#[test]
fn set_blob_overwrites_and_keeps_other_keys() {
    let repo = SqliteKeyValueRepository::open_in_memory().unwrap();
    repo.set_blob("state", "v1").unwrap();
    repo.set_blob("other", "x").unwrap();
    repo.set_blob("state", "v2").unwrap();

    assert_eq!(repo.get_blob("state").unwrap().as_deref(), Some("v2"));
    assert_eq!(repo.get_blob("other").unwrap().as_deref(), Some("x"));
    assert_eq!(repo.get_blob("absent").unwrap(), None);
}

#[test]
fn overwrite_refreshes_updated_at() {
    let repo = SqliteKeyValueRepository::open_in_memory().unwrap();
    assert_eq!(repo.updated_at("state").unwrap(), None);

    repo.set_blob("state", "v1").unwrap();
    let first = repo.updated_at("state").unwrap().unwrap();
    thread::sleep(Duration::from_millis(20));
    repo.set_blob("state", "v2").unwrap();
    let second = repo.updated_at("state").unwrap().unwrap();

    assert!(second > first, "updated_at {second} should move past {first}");
}

#[test]
fn blobs_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.sqlite3");

    SqliteKeyValueRepository::open(&path)
        .unwrap()
        .set_blob("state", r#"{"notes":[],"tags":[]}"#)
        .unwrap();

    let reopened = SqliteKeyValueRepository::open(&path).unwrap();
    assert_eq!(
        reopened.get_blob("state").unwrap().as_deref(),
        Some(r#"{"notes":[],"tags":[]}"#)
    );
}

#[test]
fn file_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newer.sqlite3");
    Connection::open(&path)
        .unwrap()
        .pragma_update(None, "user_version", 42)
        .unwrap();

    let err = match SqliteKeyValueRepository::open(&path) {
        Ok(_) => panic!("newer schema should not open"),
        Err(err) => err,
    };
    assert!(matches!(err, RepoError::SchemaTooNew { found: 42, .. }));
}

#[test]
fn blank_key_is_rejected_before_touching_sqlite() {
    let repo = SqliteKeyValueRepository::open_in_memory().unwrap();
    assert!(matches!(
        repo.set_blob(" ", "v"),
        Err(RepoError::InvalidKey(_))
    ));
    assert!(matches!(repo.get_blob(""), Err(RepoError::InvalidKey(_))));
}
