//! Integration tests for ChatService
//!
//! Run the documented behaviors end to end against both backends.

use std::collections::HashSet;
use std::sync::Arc;

use dutyroster::{Chat, ChatKey, ChatService, InitStatus, Properties, RegStatus, Trigger, UnregStatus};
use objectstore::{FsStore, JSON_CONTENT_TYPE, MemoryStore, ObjectStore};
use tempfile::TempDir;

fn team() -> Chat {
    Chat::new("group", "-100").with_title("Team")
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

async fn read_properties(store: &dyn ObjectStore, chat: &Chat) -> Properties {
    let key = format!("{}/{}/properties.json", chat.key.chat_type, chat.key.id);
    let body = store.get(&key).await.expect("properties should exist");
    serde_json::from_slice(&body).expect("properties should parse")
}

async fn write_properties(store: &dyn ObjectStore, chat: &Chat, properties: &Properties) {
    let key = format!("{}/{}/properties.json", chat.key.chat_type, chat.key.id);
    store
        .put(&key, serde_json::to_vec(properties).unwrap(), JSON_CONTENT_TYPE)
        .await
        .unwrap();
}

async fn register_all(service: &ChatService, chat: &Chat, users: &[&str]) {
    for user in users {
        service.reg(chat, user).await.unwrap();
    }
}

// =============================================================================
// Idempotency
// =============================================================================

#[tokio::test]
async fn test_init_twice_writes_once() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());

    let first = service.init(&team()).await.unwrap();
    assert!(matches!(first, InitStatus::Created { .. }));
    let after_first = read_properties(memory.as_ref(), &team()).await;
    let writes = memory.put_count();

    let second = service.init(&team()).await.unwrap();
    assert_eq!(
        second,
        InitStatus::AlreadyExists {
            chat_name: "Team".to_string()
        }
    );
    assert_eq!(memory.put_count(), writes);
    assert_eq!(read_properties(memory.as_ref(), &team()).await, after_first);
}

#[tokio::test]
async fn test_reg_twice_creates_and_counts_once() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    service.init(&team()).await.unwrap();
    let writes = memory.put_count();

    service.reg(&team(), "alice").await.unwrap();
    // one roster marker + one counter update
    assert_eq!(memory.put_count(), writes + 2);

    let status = service.reg(&team(), "alice").await.unwrap();
    assert_eq!(
        status,
        RegStatus::AlreadyPresent {
            username: "alice".to_string()
        }
    );
    assert_eq!(status.to_string(), "User @alice is already registered.");
    assert_eq!(memory.put_count(), writes + 2);
    assert_eq!(read_properties(memory.as_ref(), &team()).await.count_people, 1);
}

#[tokio::test]
async fn test_unreg_absent_does_nothing() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    service.init(&team()).await.unwrap();
    register_all(&service, &team(), &["alice"]).await;
    let writes = memory.put_count();

    let status = service.unreg(&team(), "bob").await.unwrap();
    assert_eq!(
        status,
        UnregStatus::AlreadyAbsent {
            username: "bob".to_string()
        }
    );
    assert_eq!(memory.delete_count(), 0);
    assert_eq!(memory.put_count(), writes);
    assert_eq!(read_properties(memory.as_ref(), &team()).await.count_people, 1);
}

#[tokio::test]
async fn test_counter_never_goes_below_zero() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    service.init(&team()).await.unwrap();

    // Roster entry exists but the counter has drifted to zero
    memory.put("group/-100/@alice", Vec::new(), "").await.unwrap();

    let status = service.unreg(&team(), "alice").await.unwrap();
    assert_eq!(
        status,
        UnregStatus::Removed {
            username: "alice".to_string(),
            count_people: 0
        }
    );
    for _ in 0..3 {
        service.unreg(&team(), "alice").await.unwrap();
    }
    assert_eq!(read_properties(memory.as_ref(), &team()).await.count_people, 0);
}

// =============================================================================
// Rotation
// =============================================================================

#[tokio::test]
async fn test_rotation_no_immediate_repeat() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    service.init(&team()).await.unwrap();
    register_all(&service, &team(), &["a", "b", "c", "d"]).await;
    write_properties(
        memory.as_ref(),
        &team(),
        &Properties {
            duty_count: 2,
            count_people: 4,
            last_duty: names(&["a", "b"]),
        },
    )
    .await;

    let duty: HashSet<String> = service.duty(&team()).await.unwrap().into_iter().collect();
    assert_eq!(duty, names(&["c", "d"]).into_iter().collect());

    let stored = read_properties(memory.as_ref(), &team()).await;
    let stored: HashSet<String> = stored.last_duty.into_iter().collect();
    assert_eq!(stored, duty);
}

#[tokio::test]
async fn test_rotation_stable_when_pool_is_duty_set() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    service.init(&team()).await.unwrap();
    register_all(&service, &team(), &["a", "b"]).await;
    write_properties(
        memory.as_ref(),
        &team(),
        &Properties {
            duty_count: 2,
            count_people: 2,
            last_duty: names(&["b", "a"]),
        },
    )
    .await;
    let writes = memory.put_count();

    let duty = service.duty(&team()).await.unwrap();
    assert_eq!(duty, names(&["b", "a"]));
    assert_eq!(memory.put_count(), writes);
}

#[tokio::test]
async fn test_rotation_small_candidate_pool() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    service.init(&team()).await.unwrap();
    register_all(&service, &team(), &["a", "b", "c"]).await;
    write_properties(
        memory.as_ref(),
        &team(),
        &Properties {
            duty_count: 3,
            count_people: 3,
            last_duty: names(&["a", "b"]),
        },
    )
    .await;

    assert_eq!(service.duty(&team()).await.unwrap(), names(&["c"]));
    assert_eq!(read_properties(memory.as_ref(), &team()).await.last_duty, names(&["c"]));
}

#[tokio::test]
async fn test_rotation_preserves_other_fields() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    service.init(&team()).await.unwrap();
    register_all(&service, &team(), &["a", "b", "c"]).await;
    service.set_duty_count(&team(), 2).await.unwrap();

    let duty = service.duty(&team()).await.unwrap();
    let stored = read_properties(memory.as_ref(), &team()).await;
    assert_eq!(stored.duty_count, 2);
    assert_eq!(stored.count_people, 3);
    assert_eq!(stored.last_duty, duty);
}

// =============================================================================
// Clear / reset / settings
// =============================================================================

#[tokio::test]
async fn test_clear_then_init_yields_defaults() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    service.init(&team()).await.unwrap();
    register_all(&service, &team(), &["a", "b"]).await;
    service.set_duty_count(&team(), 2).await.unwrap();
    service.duty(&team()).await.unwrap();
    service.trigger_on(&team()).await.unwrap();

    let status = service.clear(&team()).await.unwrap();
    assert_eq!(status.to_string(), "Trigger for \"Team\" removed.");
    assert!(service.list_chats().await.unwrap().is_empty());

    service.init(&team()).await.unwrap();
    assert_eq!(read_properties(memory.as_ref(), &team()).await, Properties::default());
    assert!(service.list(&team()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_trigger_body_counts_as_enabled() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    service.init(&team()).await.unwrap();
    memory.put("trigger/group@-100", Vec::new(), JSON_CONTENT_TYPE).await.unwrap();

    assert_eq!(service.list_chats().await.unwrap(), vec![team().key]);
    let status = service.status(&team()).await.unwrap();
    assert_eq!(status.trigger, Some(Trigger::default()));
}

#[tokio::test]
async fn test_rejected_username_leaves_counter_alone() {
    let temp = TempDir::new().unwrap();
    let store: Arc<dyn ObjectStore> = Arc::new(FsStore::open(temp.path().join("bucket")).await.unwrap());
    let service = ChatService::new(store.clone());
    service.init(&team()).await.unwrap();
    register_all(&service, &team(), &["alice"]).await;

    for name in ["", "ops/bob"] {
        assert!(service.reg(&team(), name).await.unwrap_err().is_invalid_username());
    }
    assert_eq!(read_properties(store.as_ref(), &team()).await.count_people, 1);
    assert_eq!(service.list(&team()).await.unwrap(), names(&["alice"]));

    service.clear(&team()).await.unwrap();
    service.init(&team()).await.unwrap();
    assert_eq!(read_properties(store.as_ref(), &team()).await, Properties::default());
    assert!(service.list(&team()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reset_restores_defaults() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    service.init(&team()).await.unwrap();
    register_all(&service, &team(), &["a", "b", "c"]).await;

    let status = service.reset(&team()).await.unwrap();
    assert!(matches!(status, InitStatus::Created { .. }));
    assert_eq!(read_properties(memory.as_ref(), &team()).await, Properties::default());
    assert!(service.list(&team()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_set_duty_count_round_trip() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    service.init(&team()).await.unwrap();
    register_all(&service, &team(), &["a", "b"]).await;
    service.duty(&team()).await.unwrap();
    let before = read_properties(memory.as_ref(), &team()).await;

    assert_eq!(service.set_duty_count(&team(), 3).await.unwrap(), 3);

    let after = read_properties(memory.as_ref(), &team()).await;
    assert_eq!(after.duty_count, 3);
    assert_eq!(after.count_people, before.count_people);
    assert_eq!(after.last_duty, before.last_duty);
}

#[tokio::test]
async fn test_set_duty_count_without_init_is_not_found() {
    let service = ChatService::new(Arc::new(MemoryStore::new()));
    let err = service.set_duty_count(&team(), 3).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_corrupt_settings_is_parse_error() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    memory
        .put("group/-100/properties.json", b"not json".to_vec(), JSON_CONTENT_TYPE)
        .await
        .unwrap();

    let err = service.duty(&team()).await.unwrap_err();
    assert!(err.is_parse());
    assert_eq!(err.to_string(), "Failed to parse settings.");
}

#[tokio::test]
async fn test_chats_are_isolated() {
    let memory = Arc::new(MemoryStore::new());
    let service = ChatService::new(memory.clone());
    let other = Chat::new("group", "-1000").with_title("Other");

    service.init(&team()).await.unwrap();
    service.init(&other).await.unwrap();
    register_all(&service, &team(), &["a"]).await;
    register_all(&service, &other, &["z"]).await;

    service.clear(&team()).await.unwrap();
    assert_eq!(service.list(&other).await.unwrap(), names(&["z"]));
    assert_eq!(read_properties(memory.as_ref(), &other).await.count_people, 1);
}

// =============================================================================
// Filesystem backend
// =============================================================================

#[tokio::test]
async fn test_full_flow_on_fs_backend() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FsStore::open(temp.path().join("bucket")).await.unwrap());
    let service = ChatService::new(store.clone());

    service.init(&team()).await.unwrap();
    register_all(&service, &team(), &["alice", "bob", "carol"]).await;
    service.unreg(&team(), "bob").await.unwrap();
    service.trigger_on(&team()).await.unwrap();
    service.trigger_on(&Chat::new("private", "42")).await.unwrap();

    assert_eq!(service.list(&team()).await.unwrap(), names(&["alice", "carol"]));
    assert_eq!(read_properties(store.as_ref(), &team()).await.count_people, 2);

    let mut chats = service.list_chats().await.unwrap();
    chats.sort();
    assert_eq!(chats, vec![ChatKey::new("group", "-100"), ChatKey::new("private", "42")]);

    let first = service.duty(&team()).await.unwrap();
    let second = service.duty(&team()).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_ne!(first, second);

    // Reopening the bucket sees the same state
    let reopened = ChatService::new(Arc::new(FsStore::open(temp.path().join("bucket")).await.unwrap()));
    assert_eq!(reopened.status(&team()).await.unwrap().properties.last_duty, second);

    service.reset(&team()).await.unwrap();
    assert!(service.list(&team()).await.unwrap().is_empty());
    assert_eq!(service.list_chats().await.unwrap(), vec![ChatKey::new("private", "42")]);
}
