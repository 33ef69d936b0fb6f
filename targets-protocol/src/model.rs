use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::keys::{broker_key, target_key};

/// Target name -> target. Values are shared between consecutive snapshots.
pub type TargetMap = HashMap<String, Arc<Target>>;

/// Lifecycle label assigned by the control plane. The store only records it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    #[default]
    Unknown,
    Ready,
}

/// A topic/subscription pair used for decoupling or retries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Queue {
    pub topic: String,
    pub subscription: String,
    pub state: State,
}

impl Queue {
    pub fn new(topic: impl Into<String>, subscription: impl Into<String>) -> Self {
        Queue {
            topic: topic.into(),
            subscription: subscription.into(),
            state: State::Unknown,
        }
    }
}

/// A subscriber endpoint (trigger) under a broker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    pub id: String,
    pub name: String,
    pub namespace: String,
    pub broker: String,
    pub address: String,
    /// Exact-match attribute filter. Empty matches every event.
    pub filter_attributes: BTreeMap<String, String>,
    pub retry_queue: Option<Queue>,
    pub state: State,
}

impl Target {
    pub fn new(name: impl Into<String>) -> Self {
        Target {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> String {
        target_key(&self.namespace, &self.broker, &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Broker {
    pub id: String,
    pub name: String,
    pub namespace: String,
    pub address: String,
    pub decouple_queue: Option<Queue>,
    #[serde(with = "crate::ordered")]
    pub targets: TargetMap,
    pub state: State,
}

impl Broker {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Broker {
            namespace: namespace.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> String {
        broker_key(&self.namespace, &self.name)
    }

    pub fn target(&self, name: &str) -> Option<&Arc<Target>> {
        self.targets.get(name)
    }

    /// Rewrites a target so it belongs to this broker.
    pub fn adopt(&self, mut target: Target) -> Target {
        if target.namespace != self.namespace {
            target.namespace.clone_from(&self.namespace);
        }
        if target.broker != self.name {
            target.broker.clone_from(&self.name);
        }
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_identity_fields() {
        let broker = Broker::new("ns", "b");
        let target = broker.adopt(Target::new("t"));
        assert_eq!(broker.key(), "ns/b");
        assert_eq!(target.key(), "ns/b/t");
    }

    #[test]
    fn adopt_overrides_foreign_identity() {
        let broker = Broker::new("ns", "b");
        let foreign = Target {
            namespace: "other".into(),
            broker: "elsewhere".into(),
            ..Target::new("t")
        };
        let adopted = broker.adopt(foreign);
        assert_eq!(adopted.namespace, "ns");
        assert_eq!(adopted.broker, "b");
        assert_eq!(adopted.name, "t");
    }

    #[test]
    fn state_uses_upper_case_labels() {
        assert_eq!(serde_json::to_string(&State::Ready).unwrap(), "\"READY\"");
        let parsed: State = serde_json::from_str("\"UNKNOWN\"").unwrap();
        assert_eq!(parsed, State::Unknown);
    }

    #[test]
    fn broker_targets_encode_sorted() {
        let mut broker = Broker::new("ns", "b");
        for name in ["zeta", "alpha", "mid"] {
            let target = broker.adopt(Target::new(name));
            broker.targets.insert(name.to_string(), Arc::new(target));
        }
        let json = serde_json::to_string(&broker).unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        let mid = json.find("\"mid\"").unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        assert!(alpha < mid && mid < zeta, "targets not sorted: {json}");
    }
}
