use std::collections::BTreeMap;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use targets_protocol::{
    broker_key, split_broker_key, split_target_key, Broker, KeyError, Target, TargetMap,
};
use xxhash_rust::xxh3::xxh3_64;

use crate::core::error::StoreError;

/// Broker key -> broker. A persistent map: cloning is O(1) and an insert or
/// remove copies only the path to the touched key, so consecutive snapshots
/// share every untouched node.
pub(crate) type BrokerMap = imbl::HashMap<String, Arc<Broker>>;

const ENCODE_FAILED_TEXT: &str = "<routing table could not be encoded>";

/*
Wire layout (JSON, compact for bytes, pretty for text):
{ "brokers": { "<ns>/<name>": Broker, ... } }

Brokers and each broker's targets are written in key order.
*/
#[derive(Serialize)]
struct TableRef<'a> {
    brokers: BTreeMap<&'a str, &'a Broker>,
}

#[derive(Deserialize)]
struct Table {
    #[serde(default, deserialize_with = "broker_entries")]
    brokers: Vec<(String, Broker)>,
}

/// Keeps every `key: broker` entry in input order, repeated keys included.
fn broker_entries<'de, D>(deserializer: D) -> Result<Vec<(String, Broker)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Entries;

    impl<'de> Visitor<'de> for Entries {
        type Value = Vec<(String, Broker)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of broker key to broker")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(Entries)
}

struct Encoded {
    bytes: Bytes,
    text: String,
}

/// Immutable view of every broker and target at one point in time.
///
/// The serialized form is computed once when the snapshot is built, so
/// `bytes`, `to_string` and the `equals_*` comparisons never re-encode.
pub struct Snapshot {
    brokers: BrokerMap,
    encoded: Result<Encoded, String>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::publish(BrokerMap::new())
    }

    /// Builds a snapshot keyed by each broker's own identity. Targets are
    /// re-keyed by name and forced under the broker that holds them.
    pub fn from_brokers<I>(brokers: I) -> Self
    where
        I: IntoIterator<Item = Broker>,
    {
        let map = brokers
            .into_iter()
            .map(normalize)
            .map(|broker| (broker.key(), Arc::new(broker)))
            .collect();
        Self::publish(map)
    }

    /// Reconstitutes a snapshot from the output of [`Snapshot::bytes`].
    /// Zero-length input is an empty table.
    ///
    /// Each broker stays under its map key. Missing identity fields are taken
    /// from the key; fields that name a different broker are rejected.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, StoreError> {
        if raw.is_empty() {
            return Ok(Self::empty());
        }
        let table: Table = serde_json::from_slice(raw)?;
        let mut brokers = BrokerMap::new();
        for (key, broker) in table.brokers {
            let broker = normalize(identify(&key, broker)?);
            if brokers.insert(key.clone(), Arc::new(broker)).is_some() {
                return Err(StoreError::DuplicateBroker(key));
            }
        }
        Ok(Self::publish(brokers))
    }

    pub(crate) fn publish(brokers: BrokerMap) -> Self {
        let encoded = encode(&brokers);
        Snapshot { brokers, encoded }
    }

    /// Copy-on-write: every broker except `key` is shared with `self`.
    pub(crate) fn with_broker(&self, key: &str, broker: Option<Arc<Broker>>) -> Self {
        let brokers = match broker {
            Some(broker) => self.brokers.update(key.to_string(), broker),
            None => self.brokers.without(key),
        };
        Self::publish(brokers)
    }

    pub fn get_broker(&self, namespace: &str, name: &str) -> Option<&Arc<Broker>> {
        self.brokers.get(&broker_key(namespace, name))
    }

    pub fn get_broker_by_key(&self, key: &str) -> Option<&Arc<Broker>> {
        self.brokers.get(key)
    }

    pub fn get_target(&self, namespace: &str, broker: &str, name: &str) -> Option<&Arc<Target>> {
        self.get_broker(namespace, broker)?.targets.get(name)
    }

    /// Looks a target up by `namespace/broker/name`. A key without exactly
    /// three segments is an error, never a miss.
    pub fn get_target_by_key(&self, key: &str) -> Result<Option<&Arc<Target>>, KeyError> {
        let (namespace, broker, name) = split_target_key(key)?;
        Ok(self.get_target(namespace, broker, name))
    }

    /// Every broker. The order is stable for this snapshot only.
    pub fn brokers(&self) -> impl Iterator<Item = &Arc<Broker>> + '_ {
        self.brokers.values()
    }

    /// Every target of every broker. The order is stable for this snapshot only.
    pub fn all_targets(&self) -> impl Iterator<Item = &Arc<Target>> + '_ {
        self.brokers
            .values()
            .flat_map(|broker| broker.targets.values())
    }

    pub fn range_brokers<F>(&self, mut visit: F)
    where
        F: FnMut(&Broker) -> ControlFlow<()>,
    {
        for broker in self.brokers() {
            if visit(broker.as_ref()).is_break() {
                return;
            }
        }
    }

    pub fn range_all_targets<F>(&self, mut visit: F)
    where
        F: FnMut(&Target) -> ControlFlow<()>,
    {
        for target in self.all_targets() {
            if visit(target.as_ref()).is_break() {
                return;
            }
        }
    }

    pub fn broker_count(&self) -> usize {
        self.brokers.len()
    }

    pub fn target_count(&self) -> usize {
        self.brokers.values().map(|b| b.targets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.brokers.is_empty()
    }

    pub fn bytes(&self) -> Result<Bytes, StoreError> {
        match &self.encoded {
            Ok(encoded) => Ok(encoded.bytes.clone()),
            Err(msg) => Err(StoreError::Encode(msg.clone())),
        }
    }

    pub fn equals_bytes(&self, other: &[u8]) -> bool {
        matches!(&self.encoded, Ok(encoded) if encoded.bytes.as_ref() == other)
    }

    pub fn equals_string(&self, other: &str) -> bool {
        matches!(&self.encoded, Ok(encoded) if encoded.text == other)
    }

    /// xxh3 of the encoded bytes, 0 if encoding failed.
    pub fn digest(&self) -> u64 {
        match &self.encoded {
            Ok(encoded) => xxh3_64(&encoded.bytes),
            Err(_) => 0,
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.brokers == other.brokers
    }
}

impl Eq for Snapshot {}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("brokers", &self.brokers.len())
            .field("targets", &self.target_count())
            .field("digest", &format_args!("{:016x}", self.digest()))
            .finish()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.encoded {
            Ok(encoded) => f.write_str(&encoded.text),
            Err(_) => f.write_str(ENCODE_FAILED_TEXT),
        }
    }
}

/// Fills empty identity fields from `key` and rejects fields that disagree.
fn identify(key: &str, mut broker: Broker) -> Result<Broker, StoreError> {
    let (namespace, name) = split_broker_key(key)?;
    if broker.namespace.is_empty() {
        broker.namespace = namespace.to_string();
    }
    if broker.name.is_empty() {
        broker.name = name.to_string();
    }
    if broker.namespace != namespace || broker.name != name {
        return Err(StoreError::BrokerMismatch {
            key: key.to_string(),
            found: broker.key(),
        });
    }
    Ok(broker)
}

fn normalize(mut broker: Broker) -> Broker {
    let targets = std::mem::take(&mut broker.targets);
    let adopted: TargetMap = targets
        .into_values()
        .map(|target| {
            let target = broker.adopt(Arc::unwrap_or_clone(target));
            (target.name.clone(), Arc::new(target))
        })
        .collect();
    broker.targets = adopted;
    broker
}

fn encode(brokers: &BrokerMap) -> Result<Encoded, String> {
    let table = TableRef {
        brokers: brokers
            .iter()
            .map(|(key, broker)| (key.as_str(), broker.as_ref()))
            .collect(),
    };
    let bytes = serde_json::to_vec(&table).map_err(|e| e.to_string())?;
    let text = serde_json::to_string_pretty(&table).map_err(|e| e.to_string())?;
    Ok(Encoded {
        bytes: Bytes::from(bytes),
        text,
    })
}
