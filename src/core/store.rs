use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use targets_protocol::broker_key;
use tracing::debug;

use crate::core::error::StoreError;
use crate::core::mutation::{BrokerMutation, Resolution};
use crate::core::read::ReadTargets;
use crate::core::snapshot::Snapshot;

/// The writable routing table.
///
/// Readers load the current [`Snapshot`] without locking. Writers go through
/// [`TargetStore::mutate_broker`], which holds `write_lock` while it builds the
/// next snapshot and swaps it in. The swap is the only point where a change
/// becomes visible.
pub struct TargetStore {
    current: ArcSwap<Snapshot>,
    write_lock: Mutex<()>,
}

impl TargetStore {
    pub fn new(snapshot: Snapshot) -> Self {
        TargetStore {
            current: ArcSwap::from_pointee(snapshot),
            write_lock: Mutex::new(()),
        }
    }

    /// Restores a store from bytes produced by [`Snapshot::bytes`].
    pub fn from_bytes(raw: &[u8]) -> Result<Self, StoreError> {
        Ok(Self::new(Snapshot::from_bytes(raw)?))
    }

    /// Applies one session to the broker `namespace/name`.
    ///
    /// `mutate` runs exactly once, synchronously, under the write lock. An
    /// absent broker is seeded empty and only created if the session changes
    /// something. Returns `true` if a new snapshot was published.
    pub fn mutate_broker<F>(&self, namespace: &str, name: &str, mutate: F) -> bool
    where
        F: FnOnce(&mut BrokerMutation),
    {
        let _guard = self.write_lock.lock();
        let current = self.current.load_full();
        let key = broker_key(namespace, name);
        let existing = current.get_broker_by_key(&key);

        let mut session = BrokerMutation::new(namespace, name, existing.map(|b| b.as_ref()));
        mutate(&mut session);

        let next = match session.resolve() {
            Resolution::Untouched => {
                debug!(broker = %key, "session made no changes");
                return false;
            }
            Resolution::Delete => {
                if existing.is_none() {
                    debug!(broker = %key, "delete of absent broker ignored");
                    return false;
                }
                current.with_broker(&key, None)
            }
            Resolution::Upsert(broker) => {
                if existing.is_some_and(|old| **old == broker) {
                    debug!(broker = %key, "broker unchanged");
                    return false;
                }
                current.with_broker(&key, Some(Arc::new(broker)))
            }
        };

        debug!(
            broker = %key,
            brokers = next.broker_count(),
            targets = next.target_count(),
            digest = next.digest(),
            "published snapshot"
        );
        self.current.store(Arc::new(next));
        true
    }
}

impl Default for TargetStore {
    fn default() -> Self {
        Self::new(Snapshot::empty())
    }
}

impl ReadTargets for TargetStore {
    fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }
}
