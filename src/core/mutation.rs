use std::sync::Arc;

use targets_protocol::{Broker, Queue, State, Target};

/// What a finished session asks the store to do.
pub(crate) enum Resolution {
    /// Nothing was changed; publish nothing.
    Untouched,
    Upsert(Broker),
    Delete,
}

/// Collects changes to a single broker. Obtained from
/// [`TargetStore::mutate_broker`](crate::TargetStore::mutate_broker) and
/// committed as one unit once the closure returns.
///
/// The session works on a private copy of the broker. Its target map holds
/// the same `Arc`s as the published broker until an entry is replaced.
#[derive(Debug)]
pub struct BrokerMutation {
    broker: Broker,
    touched: bool,
    deleted: bool,
}

impl BrokerMutation {
    pub(crate) fn new(namespace: &str, name: &str, existing: Option<&Broker>) -> Self {
        let broker = match existing {
            Some(broker) => broker.clone(),
            None => Broker::new(namespace, name),
        };
        BrokerMutation {
            broker,
            touched: false,
            deleted: false,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.broker.namespace
    }

    pub fn name(&self) -> &str {
        &self.broker.name
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.broker.id = id.into();
        self.touched = true;
        self
    }

    pub fn set_address(&mut self, address: impl Into<String>) -> &mut Self {
        self.broker.address = address.into();
        self.touched = true;
        self
    }

    pub fn set_decouple_queue(&mut self, queue: Option<Queue>) -> &mut Self {
        self.broker.decouple_queue = queue;
        self.touched = true;
        self
    }

    pub fn set_state(&mut self, state: State) -> &mut Self {
        self.broker.state = state;
        self.touched = true;
        self
    }

    /// Inserts or replaces targets by name. Each target's namespace and broker
    /// are overwritten with this broker's identity.
    pub fn upsert_targets<I>(&mut self, targets: I) -> &mut Self
    where
        I: IntoIterator<Item = Target>,
    {
        for target in targets {
            let target = self.broker.adopt(target);
            self.broker
                .targets
                .insert(target.name.clone(), Arc::new(target));
            self.touched = true;
        }
        self
    }

    /// Removes targets by name. Missing targets are ignored.
    pub fn delete_targets<'t, I>(&mut self, targets: I) -> &mut Self
    where
        I: IntoIterator<Item = &'t Target>,
    {
        for target in targets {
            if self.broker.targets.remove(&target.name).is_some() {
                self.touched = true;
            }
        }
        self
    }

    /// Removes the broker with all of its targets. Wins over every other call
    /// made in the same session, before or after it.
    pub fn delete(&mut self) {
        self.deleted = true;
    }

    pub(crate) fn resolve(self) -> Resolution {
        if self.deleted {
            Resolution::Delete
        } else if self.touched {
            Resolution::Upsert(self.broker)
        } else {
            Resolution::Untouched
        }
    }
}
