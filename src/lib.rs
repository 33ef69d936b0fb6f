//! In-memory routing table from event brokers to the targets that receive
//! their events.
//!
//! [`TargetStore`] is the writable table: readers never block and writers
//! commit one broker at a time through [`TargetStore::mutate_broker`].
//! [`FileTargets`] is the read-only counterpart for processes that consume a
//! table written elsewhere.

pub mod core;

pub use crate::core::checkpoint;
pub use crate::core::{BrokerMutation, FileTargets, ReadTargets, Snapshot, StoreError, TargetStore};
pub use targets_protocol::{
    broker_key, split_broker_key, split_target_key, target_key, Broker, KeyError, Queue, State,
    Target,
};
