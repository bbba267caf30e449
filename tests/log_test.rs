//! Result log tests against the in-memory store.

use later_store::kv::{KvOp, MemoryStore};
use later_store::{Keyspace, Storage, TaskKey};
use serde_json::{Value, json};
use std::sync::Arc;

fn test_storage(prefix: &str) -> (Storage<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let storage = Storage::with_store(Arc::clone(&store), Keyspace::new(prefix));
    (storage, store)
}

#[tokio::test]
async fn email_scenario_end_to_end() {
    let (storage, _) = test_storage("jobs:");
    let task = json!({"type": "email", "to": "a@b.com"});

    // sha1 of the canonical body {"to":"a@b.com","type":"email"}
    let key = storage.enqueue(&task).await.unwrap();
    assert_eq!(
        key.as_str(),
        "jobs:cd4d4f40b86bff9526f33581a372305c099c5e21"
    );

    let (got, got_key) = storage.dequeue::<Value>().await.unwrap().into_task().unwrap();
    assert_eq!(got, task);
    assert_eq!(got_key, key);

    storage.log_append(&key, &json!({"status": "sent"})).await.unwrap();

    let entries = storage.log_entries().await.unwrap();
    assert_eq!(
        entries.last().map(String::as_str),
        Some("jobs:cd4d4f40b86bff9526f33581a372305c099c5e21-result")
    );
    assert_eq!(
        storage.result::<Value>(&key).await.unwrap(),
        Some(json!({"status": "sent"}))
    );
}

#[tokio::test]
async fn log_appends_at_the_tail() {
    let (storage, _) = test_storage("");
    let first = TaskKey::new("aaa");
    let second = TaskKey::new("bbb");

    storage.log_append(&first, &json!(1)).await.unwrap();
    storage.log_append(&second, &json!(2)).await.unwrap();

    assert_eq!(
        storage.log_entries().await.unwrap(),
        vec!["aaa-result".to_string(), "bbb-result".to_string()]
    );
}

#[tokio::test]
async fn repeated_append_duplicates_reference_and_overwrites_body() {
    let (storage, _) = test_storage("jobs:");
    let key = TaskKey::new("jobs:abc");

    storage.log_append(&key, &json!({"status": "retry"})).await.unwrap();
    storage.log_append(&key, &json!({"status": "sent"})).await.unwrap();

    assert_eq!(
        storage.log_entries().await.unwrap(),
        vec!["jobs:abc-result".to_string(), "jobs:abc-result".to_string()]
    );
    assert_eq!(
        storage.result::<Value>(&key).await.unwrap(),
        Some(json!({"status": "sent"}))
    );
}

#[tokio::test]
async fn result_for_unlogged_task_is_none() {
    let (storage, _) = test_storage("");
    let result = storage.result::<Value>(&TaskKey::new("missing")).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn log_and_queue_lists_are_disjoint() {
    let (storage, _) = test_storage("jobs:");
    let key = storage.enqueue(&json!({"n": 1})).await.unwrap();
    storage.log_append(&key, &json!("done")).await.unwrap();

    assert_eq!(storage.pending().await.unwrap(), vec![key]);
    assert_eq!(storage.log_entries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_log_push_writes_no_result() {
    let (storage, store) = test_storage("");
    let key = TaskKey::new("abc");
    store.fail_on(KvOp::RPush);

    let err = storage.log_append(&key, &json!("done")).await.unwrap_err();
    assert!(err.is_store_error());
    assert!(!store.contains_key(&key.result_key()));
}
