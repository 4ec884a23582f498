use std::io::Write;
use std::time::{Duration, Instant};

use chrono::DateTime;
use serde_json::json;

use docbind_console::{
    BackendRestart, ClientIdError, ConsoleConfig, ConsoleError, HeartbeatStatus, NewClientForm,
};
use docbind_core_store::{field, DocRef, Error, SnapshotSource, Value};
use docbind_memory_store::MemoryStore;

fn health() -> DocRef {
    DocRef::new("config", "healthMonitor")
}

fn store() -> MemoryStore {
    MemoryStore::from_json(json!({
        "config": {
            "healthMonitor": { "heartbeat": { "seconds": 1_650_000_000, "nanoseconds": 0 }, "reset": false }
        },
        "clients": {
            "alice@example.com": { "enabled": true }
        }
    }))
    .unwrap()
}

#[test]
fn config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "restart_cooldown_secs": 30, "bindings": {{ "default_zone": "Europe/Paris" }} }}"#
    )
    .unwrap();

    let config = ConsoleConfig::load(file.path()).unwrap();
    assert_eq!(config.restart_cooldown(), Duration::from_secs(30));
    assert_eq!(config.bindings.default_zone.as_deref(), Some("Europe/Paris"));
    assert_eq!(config.clients_collection, "clients");
}

#[test]
fn missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConsoleConfig::load(dir.path().join("console.json")).unwrap_err();
    assert!(matches!(err, ConsoleError::ConfigIo { .. }));
}

#[tokio::test]
async fn restart_resets_heartbeat_and_cools_down() {
    let store = store();
    let config = ConsoleConfig::default();
    let monitor = config.monitor();
    let now = DateTime::from_timestamp(1_650_000_060, 0).unwrap();
    assert_eq!(
        monitor.status(&store.snapshot(&health()), now),
        HeartbeatStatus::Online
    );

    let mut restart = BackendRestart::new(health(), config.restart_cooldown());
    let pressed = Instant::now();
    assert!(restart.trigger(&store, pressed).await);

    let snap = store.snapshot(&health());
    assert_eq!(snap.get(&field!("reset")), Some(&Value::Bool(true)));
    assert_eq!(
        snap.get(&field!("heartbeat.seconds")),
        Some(&Value::Integer(1_643_673_600))
    );
    assert_eq!(monitor.status(&snap, now), HeartbeatStatus::Offline);

    // Second press inside the window is ignored.
    assert!(restart.is_disabled(pressed + Duration::from_secs(5)));
    assert!(!restart.trigger(&store, pressed + Duration::from_secs(5)).await);
    assert_eq!(store.applied_writes().len(), 2);

    assert!(!restart.is_disabled(pressed + Duration::from_secs(10)));
}

#[tokio::test]
async fn failed_restart_still_cools_down() {
    let store = store();
    store.fail_next_write(Error::rejected("permission denied"));

    let mut restart = BackendRestart::new(health(), Duration::from_secs(10));
    let pressed = Instant::now();
    assert!(!restart.trigger(&store, pressed).await);
    assert_eq!(
        restart.runner().error(),
        Some(&Error::rejected("permission denied"))
    );
    assert!(restart.is_disabled(pressed + Duration::from_secs(1)));
    assert!(store.applied_writes().is_empty());
}

#[tokio::test]
async fn create_and_delete_clients() {
    let store = store();
    let directory = ConsoleConfig::default().directory();
    assert_eq!(directory.list(&store), vec!["alice@example.com"]);

    let doc = directory.create(&store, "Bob@Example.com").await.unwrap();
    assert_eq!(doc, DocRef::new("clients", "bob@example.com"));
    assert_eq!(
        store.subscribe(&doc).borrow().get(&field!("enabled")),
        Some(&Value::Bool(false))
    );

    let err = directory.create(&store, "alice@example.com").await.unwrap_err();
    assert!(matches!(
        err,
        ConsoleError::ClientId(ClientIdError::Duplicate { .. })
    ));

    directory.delete(&store, "alice@example.com").await.unwrap();
    assert_eq!(directory.list(&store), vec!["bob@example.com"]);
}

#[tokio::test]
async fn new_client_form_keeps_id_on_failure() {
    let store = store();
    let directory = ConsoleConfig::default().directory();
    let mut form = NewClientForm::new();

    form.input("carol@example.com");
    store.fail_next_write(Error::transport("offline"));
    assert!(!form.submit(&directory, &store).await);
    assert_eq!(form.id(), "carol@example.com");
    assert_eq!(form.runner().error(), Some(&Error::transport("offline")));

    assert!(form.submit(&directory, &store).await);
    assert_eq!(form.id(), "");
    assert!(form.runner().error().is_none());
    assert!(directory
        .list(&store)
        .contains(&"carol@example.com".to_string()));
}
