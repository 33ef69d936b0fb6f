#![allow(dead_code)]

use std::path::PathBuf;

use broker_targets::{Queue, State, Target, TargetStore};

pub fn folder_to_use() -> PathBuf {
    tempfile::Builder::new()
        .prefix("targets_test_")
        .tempdir()
        .expect("failed to create temp dir")
        .into_path()
}

pub fn target(name: &str, address: &str) -> Target {
    Target {
        address: address.to_string(),
        ..Target::new(name)
    }
}

/// Two brokers in two namespaces, three targets in total.
pub fn seeded_store() -> TargetStore {
    let store = TargetStore::default();
    store.mutate_broker("ns1", "broker1", |m| {
        m.set_id("b1-id")
            .set_address("http://broker1.ns1")
            .set_decouple_queue(Some(Queue::new("b1-topic", "b1-sub")))
            .set_state(State::Ready)
            .upsert_targets([
                target("t1", "http://t1.ns1"),
                target("t2", "http://t2.ns1"),
            ]);
    });
    store.mutate_broker("ns2", "broker2", |m| {
        m.set_id("b2-id")
            .set_address("http://broker2.ns2")
            .upsert_targets([target("t3", "http://t3.ns2")]);
    });
    store
}
