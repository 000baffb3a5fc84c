use super::*;
use crate::history::kv::MemoryKv;
use serde_json::json;

fn record(id: &str) -> HistoryRecord {
    HistoryRecord {
        id: id.to_owned(),
        image_url: format!("https://cdn.example/{id}.jpg"),
        top_text: "TOP".into(),
        bottom_text: "BOTTOM".into(),
        data_url: "data:image/jpeg;base64,/9j/".into(),
        created_at: id.parse().unwrap_or(0),
    }
}

fn ids<K: KvStore>(store: &HistoryStore<K>) -> Vec<&str> {
    store.list().iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn empty_slot_opens_empty() {
    let store = HistoryStore::open(MemoryKv::new()).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
}

#[test]
fn append_is_newest_first_and_persisted() {
    let mut store = HistoryStore::open(MemoryKv::new()).unwrap();
    store.append(record("1")).unwrap();
    store.append(record("2")).unwrap();
    store.append(record("3")).unwrap();
    assert_eq!(ids(&store), ["3", "2", "1"]);
    assert_eq!(store.kv().writes(), 3);

    let slot = store.kv().get(HISTORY_SLOT).unwrap().unwrap();
    assert_eq!(slot[0]["id"], "3");
    assert_eq!(slot[0]["imageUrl"], "https://cdn.example/3.jpg");
    assert_eq!(slot[0]["createdAt"], 3);
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut store = HistoryStore::open(MemoryKv::new()).unwrap();
    store.append(record("1")).unwrap();
    let err = store.append(record("1")).unwrap_err();
    assert!(matches!(err, MemeError::Validation(_)));
    assert_eq!(store.len(), 1);
    assert_eq!(store.kv().writes(), 1);
}

#[test]
fn remove_deletes_exactly_one_record() {
    let mut store = HistoryStore::open(MemoryKv::new()).unwrap();
    for id in ["1", "2", "3"] {
        store.append(record(id)).unwrap();
    }
    assert!(store.remove("2").unwrap());
    assert_eq!(ids(&store), ["3", "1"]);
    assert!(store.get("2").is_none());
    assert_eq!(store.get("1").unwrap().top_text, "TOP");
}

#[test]
fn removing_an_absent_id_is_a_noop_without_write() {
    let mut store = HistoryStore::open(MemoryKv::new()).unwrap();
    store.append(record("1")).unwrap();
    assert!(!store.remove("nope").unwrap());
    assert_eq!(ids(&store), ["1"]);
    assert_eq!(store.kv().writes(), 1);
}

#[test]
fn failed_writes_roll_back() {
    let mut failing = MemoryKv::new();
    failing
        .put(HISTORY_SLOT, serde_json::to_value([record("1")]).unwrap())
        .unwrap();
    failing.fail_writes(true);
    let mut store = HistoryStore::open(failing).unwrap();

    assert!(store.append(record("2")).is_err());
    assert_eq!(ids(&store), ["1"]);
    assert!(store.remove("1").is_err());
    assert_eq!(ids(&store), ["1"]);
}

#[test]
fn malformed_slot_is_a_storage_error() {
    let mut kv = MemoryKv::new();
    kv.put(HISTORY_SLOT, json!({"id": "1"})).unwrap();
    let err = HistoryStore::open(kv).unwrap_err();
    assert!(matches!(err, MemeError::Storage(_)));
}
