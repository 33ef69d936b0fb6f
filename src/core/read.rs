use std::ops::ControlFlow;
use std::sync::Arc;

use bytes::Bytes;
use targets_protocol::{Broker, KeyError, Target};

use crate::core::error::StoreError;
use crate::core::snapshot::Snapshot;

/// Read access to a published routing table.
///
/// Every provided method pins whichever snapshot is current when it is called
/// and answers from it alone. Two calls may see two different snapshots; use
/// [`ReadTargets::snapshot`] directly when several reads must agree.
pub trait ReadTargets {
    fn snapshot(&self) -> Arc<Snapshot>;

    fn get_broker(&self, namespace: &str, name: &str) -> Option<Arc<Broker>> {
        self.snapshot().get_broker(namespace, name).cloned()
    }

    fn get_broker_by_key(&self, key: &str) -> Option<Arc<Broker>> {
        self.snapshot().get_broker_by_key(key).cloned()
    }

    fn get_target(&self, namespace: &str, broker: &str, name: &str) -> Option<Arc<Target>> {
        self.snapshot().get_target(namespace, broker, name).cloned()
    }

    fn get_target_by_key(&self, key: &str) -> Result<Option<Arc<Target>>, KeyError> {
        Ok(self.snapshot().get_target_by_key(key)?.cloned())
    }

    fn range_brokers<F>(&self, visit: F)
    where
        F: FnMut(&Broker) -> ControlFlow<()>,
    {
        self.snapshot().range_brokers(visit)
    }

    fn range_all_targets<F>(&self, visit: F)
    where
        F: FnMut(&Target) -> ControlFlow<()>,
    {
        self.snapshot().range_all_targets(visit)
    }

    fn bytes(&self) -> Result<Bytes, StoreError> {
        self.snapshot().bytes()
    }

    /// The text form of the current snapshot. Never fails.
    fn text(&self) -> String {
        self.snapshot().to_string()
    }

    fn equals_bytes(&self, other: &[u8]) -> bool {
        self.snapshot().equals_bytes(other)
    }

    fn equals_string(&self, other: &str) -> bool {
        self.snapshot().equals_string(other)
    }
}
