use popsub_store::broker::{PendingPublish, QoS, SubscriptionEntry, TopicFilter, in_flight_key};
use popsub_store::config::StorageSettings;
use popsub_store::storage::{StorageService, Store};
use std::process::Command;
use tempfile::tempdir;

/// Set on the re-executed test binary; holds the database directory the
/// child writes into before aborting.
const CRASH_DIR_ENV: &str = "STORE_CRASH_CHILD_DIR";

fn settings(path: &std::path::Path) -> StorageSettings {
    StorageSettings {
        path: path.to_str().unwrap().to_string(),
        flush_every_ms: None,
        ..StorageSettings::default()
    }
}

#[test]
fn committed_state_survives_restart() {
    let dir = tempdir().unwrap();
    let key = in_flight_key("c1", 42);
    let in_flight = PendingPublish::new("c1", "a/b", b"sent".to_vec(), QoS::ExactlyOnce)
        .with_message_id(42);

    {
        let store = Store::open(&settings(dir.path())).unwrap();
        store.store_retained("a/b", b"X", QoS::AtLeastOnce).unwrap();
        store.store_retained("d/e", b"Z", QoS::AtMostOnce).unwrap();
        for payload in ["m1", "m2"] {
            store
                .store_publish_for_future(PendingPublish::new(
                    "c1",
                    "a/b",
                    payload.as_bytes().to_vec(),
                    QoS::AtLeastOnce,
                ))
                .unwrap();
        }
        store.add_in_flight(in_flight.clone(), &key).unwrap();
        store
            .add_new_subscription(SubscriptionEntry::new("c1", "a/+", QoS::AtLeastOnce), "c1")
            .unwrap();
    }

    let store = Store::open(&settings(dir.path())).unwrap();

    let filter = TopicFilter::new("a/+").unwrap();
    let retained = store.search_matching(&filter).unwrap();
    assert_eq!(retained.len(), 1);
    assert_eq!(retained[0].payload, b"X");
    assert_eq!(retained[0].qos, QoS::AtLeastOnce);

    let queued: Vec<Vec<u8>> = store
        .retrieve_persisted_publishes("c1")
        .unwrap()
        .into_iter()
        .map(|e| e.payload)
        .collect();
    assert_eq!(queued, vec![b"m1".to_vec(), b"m2".to_vec()]);

    assert_eq!(store.retrieve_in_flight(&key).unwrap(), Some(in_flight));
    assert_eq!(
        store.retrieve_all_subscriptions().unwrap(),
        vec![SubscriptionEntry::new("c1", "a/+", QoS::AtLeastOnce)]
    );
}

#[test]
fn removals_survive_restart() {
    let dir = tempdir().unwrap();

    {
        let store = Store::open(&settings(dir.path())).unwrap();
        store.store_retained("a/b", b"X", QoS::AtLeastOnce).unwrap();
        store
            .add_new_subscription(SubscriptionEntry::new("c1", "#", QoS::AtMostOnce), "c1")
            .unwrap();
        store.flush().unwrap();

        store.store_retained("a/b", b"", QoS::AtLeastOnce).unwrap();
        store.remove_all_subscriptions("c1").unwrap();
        store.flush().unwrap();
    }

    let store = Store::open(&settings(dir.path())).unwrap();
    assert!(store.search_matching(&|_: &str| true).unwrap().is_empty());
    assert!(store.retrieve_all_subscriptions().unwrap().is_empty());
}

/// Runs only inside the child spawned by `acknowledged_writes_survive_abort`.
#[test]
fn crash_child_writes_then_aborts() {
    let Ok(path) = std::env::var(CRASH_DIR_ENV) else {
        return;
    };
    let settings = StorageSettings {
        path,
        ..StorageSettings::default()
    };
    let store = Store::open(&settings).unwrap();

    store
        .store_publish_for_future(PendingPublish::new(
            "c1",
            "a/b",
            b"m1".to_vec(),
            QoS::AtLeastOnce,
        ))
        .unwrap();
    store.store_retained("a/b", b"X", QoS::AtLeastOnce).unwrap();
    store
        .add_in_flight(
            PendingPublish::new("c1", "a/b", b"sent".to_vec(), QoS::ExactlyOnce).with_message_id(9),
            &in_flight_key("c1", 9),
        )
        .unwrap();
    store
        .add_new_subscription(SubscriptionEntry::new("c1", "a/#", QoS::AtLeastOnce), "c1")
        .unwrap();

    // no flush, no drop
    std::process::abort();
}

#[test]
fn acknowledged_writes_survive_abort() {
    let dir = tempdir().unwrap();
    let exe = std::env::current_exe().unwrap();

    let status = Command::new(exe)
        .args(["crash_child_writes_then_aborts", "--exact", "--test-threads=1"])
        .env(CRASH_DIR_ENV, dir.path())
        .status()
        .unwrap();
    assert!(!status.success(), "child should have aborted: {status:?}");

    let store = Store::open(&settings(dir.path())).unwrap();

    let queued = store.retrieve_persisted_publishes("c1").unwrap();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].payload, b"m1");

    let retained = store.search_matching(&|t: &str| t == "a/b").unwrap();
    assert_eq!(retained.len(), 1);
    assert_eq!(retained[0].payload, b"X");

    assert!(store.retrieve_in_flight(&in_flight_key("c1", 9)).unwrap().is_some());
    assert_eq!(store.retrieve_subscriptions("c1").unwrap().len(), 1);
}
