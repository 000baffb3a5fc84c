use super::*;
use serde_json::json;

#[test]
fn memory_kv_counts_writes_and_can_refuse_them() {
    let mut kv = MemoryKv::new();
    assert_eq!(kv.get("a").unwrap(), None);
    kv.put("a", json!([1])).unwrap();
    assert_eq!(kv.get("a").unwrap(), Some(json!([1])));
    assert_eq!(kv.writes(), 1);

    kv.fail_writes(true);
    assert!(matches!(kv.put("a", json!([2])), Err(MemeError::Storage(_))));
    assert_eq!(kv.get("a").unwrap(), Some(json!([1])));
    assert_eq!(kv.writes(), 1);
}

#[test]
fn missing_file_opens_empty_and_is_created_on_put() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/store.json");
    let mut kv = JsonFileKv::open(&path).unwrap();
    assert_eq!(kv.get("saved-memes").unwrap(), None);
    assert!(!path.exists());

    kv.put("saved-memes", json!([{"id": "1"}])).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());

    let reopened = JsonFileKv::open(&path).unwrap();
    assert_eq!(reopened.get("saved-memes").unwrap(), Some(json!([{"id": "1"}])));
}

#[test]
fn other_slots_survive_a_put() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

    let mut kv = JsonFileKv::open(&path).unwrap();
    kv.put("saved-memes", json!([])).unwrap();

    let on_disk: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(on_disk, json!({"theme": "dark", "saved-memes": []}));
}

#[test]
fn blank_file_is_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "  \n").unwrap();
    assert_eq!(JsonFileKv::open(&path).unwrap().get("x").unwrap(), None);
}

#[test]
fn corrupt_files_are_storage_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    for content in ["{not json", "[1,2,3]"] {
        std::fs::write(&path, content).unwrap();
        let err = JsonFileKv::open(&path).unwrap_err();
        assert!(matches!(err, MemeError::Storage(_)), "{content}: {err}");
    }
}

#[test]
fn failed_put_leaves_memory_state_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("sub");
    let mut kv = JsonFileKv::open(&sub.join("store.json")).unwrap();

    // A plain file where the store directory should go.
    std::fs::write(&sub, b"x").unwrap();
    assert!(matches!(kv.put("k", json!(1)), Err(MemeError::Storage(_))));
    assert_eq!(kv.get("k").unwrap(), None);
}
