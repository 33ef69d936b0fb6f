mod common;

use std::collections::BTreeMap;

use broker_targets::{ReadTargets, State, TargetStore};
use proptest::prelude::*;

use crate::common::target;

#[derive(Debug, Clone)]
enum Op {
    Upsert { broker: u8, target: u8, address: u8 },
    DeleteTarget { broker: u8, target: u8 },
    SetState { broker: u8, ready: bool },
    DeleteBroker { broker: u8 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3u8, 0..4u8, 0..3u8).prop_map(|(broker, target, address)| Op::Upsert {
            broker,
            target,
            address,
        }),
        (0..3u8, 0..4u8).prop_map(|(broker, target)| Op::DeleteTarget { broker, target }),
        (0..3u8, any::<bool>()).prop_map(|(broker, ready)| Op::SetState { broker, ready }),
        (0..3u8).prop_map(|broker| Op::DeleteBroker { broker }),
    ]
}

/// broker name -> (state, target name -> address)
type Model = BTreeMap<String, (State, BTreeMap<String, String>)>;

fn apply(store: &TargetStore, model: &mut Model, op: &Op) {
    match *op {
        Op::Upsert {
            broker,
            target: t,
            address,
        } => {
            let name = format!("b{broker}");
            let tname = format!("t{t}");
            let addr = format!("http://{address}");
            store.mutate_broker("ns", &name, |m| {
                m.upsert_targets([target(&tname, &addr)]);
            });
            model.entry(name).or_default().1.insert(tname, addr);
        }
        Op::DeleteTarget { broker, target: t } => {
            let (name, tname) = (format!("b{broker}"), format!("t{t}"));
            store.mutate_broker("ns", &name, |m| {
                m.delete_targets([&target(&tname, "")]);
            });
            if let Some((_, targets)) = model.get_mut(&name) {
                targets.remove(&tname);
            }
        }
        Op::SetState { broker, ready } => {
            let name = format!("b{broker}");
            let state = if ready { State::Ready } else { State::Unknown };
            store.mutate_broker("ns", &name, |m| {
                m.set_state(state);
            });
            model.entry(name).or_default().0 = state;
        }
        Op::DeleteBroker { broker } => {
            let name = format!("b{broker}");
            store.mutate_broker("ns", &name, |m| m.delete());
            model.remove(&name);
        }
    }
}

proptest! {
    #[test]
    fn store_reflects_last_committed_state(ops in prop::collection::vec(op(), 0..40)) {
        let store = TargetStore::default();
        let mut model = Model::new();
        for op in &ops {
            apply(&store, &mut model, op);
        }

        let snapshot = store.snapshot();
        prop_assert_eq!(snapshot.broker_count(), model.len());
        for (name, (state, targets)) in &model {
            let broker = snapshot.get_broker("ns", name).expect("broker in model");
            prop_assert_eq!(broker.state, *state);
            prop_assert_eq!(broker.targets.len(), targets.len());
            for (tname, addr) in targets {
                let t = snapshot.get_target("ns", name, tname).expect("target in model");
                prop_assert_eq!(&t.address, addr);
            }
        }

        let bytes = snapshot.bytes().unwrap();
        prop_assert!(snapshot.equals_bytes(&bytes));
        let restored = TargetStore::from_bytes(&bytes).unwrap();
        prop_assert!(restored.equals_bytes(&bytes));
    }

    #[test]
    fn repeating_an_upsert_changes_nothing(ops in prop::collection::vec(op(), 1..20)) {
        let store = TargetStore::default();
        let mut model = Model::new();
        for op in &ops {
            apply(&store, &mut model, op);
        }
        store.mutate_broker("ns", "b0", |m| {
            m.upsert_targets([target("again", "http://again")]);
        });
        let before = store.bytes().unwrap();
        let republished = store.mutate_broker("ns", "b0", |m| {
            m.upsert_targets([target("again", "http://again")]);
        });
        prop_assert!(!republished);
        prop_assert!(store.equals_bytes(&before));
    }
}
