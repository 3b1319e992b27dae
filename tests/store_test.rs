//! Tests for the key/value stores.

use tempfile::NamedTempFile;

use spyx_missions::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreKey, records};

/// Opens a store on a temporary file. The file handle must stay in scope to
/// keep the database alive.
fn setup_test_db() -> (NamedTempFile, SqliteStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = SqliteStore::open(db_path).expect("Failed to open store");
    (db_file, store)
}

#[test]
fn test_get_missing_key_is_none() {
    let (_db, store) = setup_test_db();
    assert_eq!(store.get("players").expect("Get failed"), None);
}

#[test]
fn test_set_then_get() {
    let (_db, store) = setup_test_db();
    store.set("players", "[]".to_string()).expect("Set failed");
    assert_eq!(
        store.get("players").expect("Get failed").as_deref(),
        Some("[]")
    );
}

#[test]
fn test_set_replaces_value() {
    let (_db, store) = setup_test_db();
    store.set("selectedWorld", "\"Alien\"".to_string()).expect("Set failed");
    store.set("selectedWorld", "\"Dune\"".to_string()).expect("Set failed");
    assert_eq!(
        store.get("selectedWorld").expect("Get failed").as_deref(),
        Some("\"Dune\"")
    );
    assert_eq!(store.entries().expect("Entries failed").len(), 1);
}

#[test]
fn test_remove_key() {
    let (_db, store) = setup_test_db();
    store.set("players", "[]".to_string()).expect("Set failed");
    store.remove("players").expect("Remove failed");
    assert_eq!(store.get("players").expect("Get failed"), None);
    store.remove("players").expect("Removing a missing key failed");
}

#[test]
fn test_entries_sorted_by_key() {
    let (_db, store) = setup_test_db();
    store.set("selectedWorld", "\"Dune\"".to_string()).expect("Set failed");
    store.set("gameSettings", "{}".to_string()).expect("Set failed");
    store.set("players", "[]".to_string()).expect("Set failed");

    let keys: Vec<String> = store
        .entries()
        .expect("Entries failed")
        .iter()
        .map(|e| e.key().clone())
        .collect();
    assert_eq!(keys, vec!["gameSettings", "players", "selectedWorld"]);
}

#[test]
fn test_values_survive_reopen() {
    let (db, store) = setup_test_db();
    records::save(&store, StoreKey::SelectedWorld, "Dune").expect("Save failed");
    drop(store);

    let path = db.path().to_str().expect("Invalid path").to_string();
    let reopened = SqliteStore::open(path).expect("Reopen failed");
    let world: Option<String> =
        records::load(&reopened, StoreKey::SelectedWorld).expect("Load failed");
    assert_eq!(world.as_deref(), Some("Dune"));
}

#[test]
fn test_open_bad_path_fails() {
    let result = SqliteStore::open("/nonexistent/dir/spyx.db".to_string());
    assert!(result.is_err());
}

#[test]
fn test_memory_store_basics() {
    let store = MemoryStore::new();
    assert!(store.is_empty().expect("Failed to count"));
    store.set("players", "[]".to_string()).expect("Set failed");
    store.set("players", "[1]".to_string()).expect("Set failed");
    assert_eq!(store.len().expect("Failed to count"), 1);
    assert_eq!(store.get("players").expect("Get failed").as_deref(), Some("[1]"));
    store.remove("players").expect("Remove failed");
    assert!(store.is_empty().expect("Failed to count"));
}

#[test]
fn test_records_reject_malformed_json() {
    let store = MemoryStore::new();
    store
        .set(StoreKey::SelectedWorld.as_ref(), "not json".to_string())
        .expect("Set failed");
    let result: Result<Option<String>, _> = records::load(&store, StoreKey::SelectedWorld);
    assert!(result.is_err());
}

#[test]
fn test_store_keys_use_record_names() {
    assert_eq!(StoreKey::Players.as_ref(), "players");
    assert_eq!(StoreKey::SelectedWorld.as_ref(), "selectedWorld");
    assert_eq!(StoreKey::GameSettings.as_ref(), "gameSettings");
    assert_eq!(StoreKey::SelectedPlayer.as_ref(), "selectedPlayer");
}

#[test]
fn test_store_error_reports_creation_site() {
    let err = StoreError::new("disk full");
    let line = line!() - 1;
    assert_eq!(err.file, file!());
    assert_eq!(
        err.to_string(),
        format!("Store error: disk full at {}:{}", file!(), line)
    );
}
