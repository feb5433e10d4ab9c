use std::cell::Cell;
use std::rc::Rc;
use tagnote_core::{
    open_coordinator, Coordinator, CoreConfig, KeyValueRepository, MemoryKeyValueRepository,
    NoteId, NoteInput, PersistenceAdapter, RepoError, RepoResult, Snapshot,
    SqliteKeyValueRepository, TagId, DEFAULT_STORAGE_KEY,
};

#[test]
fn every_transition_is_saved_and_reloaded() {
    let repo = MemoryKeyValueRepository::new();
    let (tag_id, note_id) = {
        let mut coordinator = Coordinator::open(PersistenceAdapter::new(repo.clone()));
        let tag = coordinator.add_tag("work");
        let note = coordinator.add_note(NoteInput::new("a").with_tag(Some(tag.id.clone())));
        coordinator.add_note(NoteInput::new("untagged"));
        (tag.id, note.id)
    };

    let reopened = Coordinator::open(PersistenceAdapter::new(repo));
    let snapshot = reopened.snapshot();
    assert_eq!(snapshot.notes.len(), 2);
    assert_eq!(snapshot.note(&note_id).unwrap().tag_id, Some(tag_id.clone()));
    assert_eq!(snapshot.notes[1].tag_id, None);
    assert_eq!(snapshot.tag(&tag_id).unwrap().count, 1);
    assert_eq!(reopened.version(), 0);
}

#[test]
fn stored_blob_uses_camel_case_wire_shape() {
    let repo = MemoryKeyValueRepository::new();
    let mut coordinator = Coordinator::open(PersistenceAdapter::new(repo.clone()));
    coordinator.add_note(NoteInput::new("a"));

    let blob = repo.get_blob(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let note = &json["notes"][0];
    assert!(note["tagId"].is_null());
    assert_eq!(note["text"], "a");
    assert!(json["tags"].as_array().unwrap().is_empty());
}

#[test]
fn sqlite_file_round_trip_reproduces_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.sqlite3");

    let saved = {
        let repo = SqliteKeyValueRepository::open(&path).unwrap();
        let mut coordinator = Coordinator::open(PersistenceAdapter::new(repo));
        let tag = coordinator.add_tag("t");
        coordinator.add_note(
            NoteInput::new("one")
                .with_title("title")
                .with_tag(Some(tag.id.clone())),
        );
        coordinator.add_note(NoteInput::new("two"));
        coordinator.snapshot()
    };

    let repo = SqliteKeyValueRepository::open(&path).unwrap();
    let loaded = PersistenceAdapter::new(repo).load().unwrap();
    assert_eq!(loaded, *saved);
}

#[test]
fn open_coordinator_reads_config_storage_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.sqlite3");
    let config = CoreConfig {
        db_path: Some(path.clone()),
        storage_key: "custom_key".to_string(),
        ..CoreConfig::default()
    };

    {
        let mut coordinator = open_coordinator(config.clone()).unwrap();
        coordinator.add_tag("kept");
    }

    let repo = SqliteKeyValueRepository::open(&path).unwrap();
    assert!(repo.get_blob(DEFAULT_STORAGE_KEY).unwrap().is_none());
    assert!(repo.get_blob("custom_key").unwrap().is_some());

    let reopened = open_coordinator(config).unwrap();
    assert_eq!(reopened.tag_count(), 1);
}

#[test]
fn stored_non_uuid_ids_load_and_survive_next_save() {
    let repo = MemoryKeyValueRepository::new();
    repo.set_blob(
        DEFAULT_STORAGE_KEY,
        r#"{"notes":[{"id":"n1","tagId":"t1","title":null,"text":"old","created":"2024-05-01T10:00:00.000Z","updated":"2024-05-01T10:00:00.000Z"}],
            "tags":[{"id":"t1","name":"work","count":1}]}"#,
    )
    .unwrap();

    let loaded = PersistenceAdapter::new(repo.clone()).load().unwrap();
    assert_eq!(loaded.notes[0].id, NoteId::from("n1"));
    assert_eq!(loaded.notes[0].tag_id, Some(TagId::from("t1")));

    let t1 = TagId::from("t1");
    let mut coordinator = Coordinator::open(PersistenceAdapter::new(repo.clone()));
    coordinator.add_note(NoteInput::new("new").with_tag(Some(t1.clone())));
    assert_eq!(coordinator.tag(&t1).unwrap().count, 2);

    let blob = repo.get_blob(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(json["notes"][0]["id"], "n1");
    assert_eq!(json["tags"][0]["id"], "t1");
    assert_eq!(json["tags"][0]["count"], 2);
}

#[test]
fn worked_example_replays_from_stored_state() {
    let repo = MemoryKeyValueRepository::new();
    repo.set_blob(
        DEFAULT_STORAGE_KEY,
        r#"{"notes":[],"tags":[{"id":"t1","name":"work","count":0}]}"#,
    )
    .unwrap();
    let t1 = TagId::from("t1");
    let mut coordinator = Coordinator::open(PersistenceAdapter::new(repo.clone()));

    let note = coordinator.add_note(NoteInput::new("a").with_title("").with_tag(Some(t1.clone())));
    assert_eq!(coordinator.tag(&t1).unwrap().count, 1);
    assert!(coordinator.delete_tag(&t1).is_err());
    coordinator.delete_note(&note.id).unwrap();
    assert_eq!(coordinator.tag(&t1).unwrap().count, 0);
    coordinator.delete_tag(&t1).unwrap();

    let stored = PersistenceAdapter::new(repo).load().unwrap();
    assert!(stored.tags.is_empty());
    assert!(stored.notes.is_empty());
}

#[test]
fn corrupt_blob_starts_from_empty_state() {
    let repo = MemoryKeyValueRepository::new();
    repo.set_blob(DEFAULT_STORAGE_KEY, r#"{"notes": 5}"#).unwrap();

    let coordinator = Coordinator::open(PersistenceAdapter::new(repo));
    assert_eq!(*coordinator.snapshot(), Snapshot::default());
}

struct FailingRepository {
    writes: Rc<Cell<u32>>,
}

impl KeyValueRepository for FailingRepository {
    fn get_blob(&self, key: &str) -> RepoResult<Option<String>> {
        Err(RepoError::InvalidKey(key.to_string()))
    }

    fn set_blob(&self, key: &str, _value: &str) -> RepoResult<()> {
        self.writes.set(self.writes.get() + 1);
        Err(RepoError::InvalidKey(key.to_string()))
    }
}

#[test]
fn storage_failures_never_roll_back_memory_state() {
    let writes = Rc::new(Cell::new(0));
    let repo = FailingRepository {
        writes: Rc::clone(&writes),
    };
    let mut coordinator = Coordinator::open(PersistenceAdapter::new(repo));
    assert_eq!(coordinator.note_count(), 0);

    let tag = coordinator.add_tag("t");
    coordinator.add_note(NoteInput::new("kept").with_tag(Some(tag.id.clone())));

    assert_eq!(writes.get(), 2);
    assert_eq!(coordinator.note_count(), 1);
    assert_eq!(coordinator.tag(&tag.id).unwrap().count, 1);
}
