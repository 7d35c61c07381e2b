//! Property tests over generated operation sequences

use crate::seeded;
use proptest::prelude::*;
use spanstore::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    Read(String),
    Write(String, String),
}

fn key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(String::from)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        key_strategy().prop_map(Op::Read),
        (key_strategy(), "[a-z0-9]{0,4}").prop_map(|(k, v)| Op::Write(k, v)),
    ]
}

fn build(store: &std::sync::Arc<Store>, ops: &[Op]) -> Span {
    ops.iter().fold(store.start(), |span, op| match op {
        Op::Read(k) => span.read(k.as_str()),
        Op::Write(k, v) => span.write(k.as_str(), v.as_str()),
    })
}

proptest! {
    #[test]
    fn write_only_chains_always_congruent(
        writes in prop::collection::vec((key_strategy(), "[a-z]{0,3}"), 0..20),
        external in prop::collection::vec((key_strategy(), "[a-z]{0,3}"), 0..5),
    ) {
        let store = seeded(&[("a", "1"), ("b", "2")]);
        let span = writes
            .iter()
            .fold(store.start(), |span, (k, v)| span.write(k.as_str(), v.as_str()));
        for (k, v) in &external {
            store.set(k.as_str(), v.as_str());
        }
        prop_assert!(span.is_congruent());
    }

    #[test]
    fn reads_follow_model(ops in prop::collection::vec(op_strategy(), 0..30)) {
        let store = seeded(&[("a", "1"), ("c", "3")]);
        let mut local: HashMap<String, String> = HashMap::new();
        let mut span = store.start();

        for op in &ops {
            match op {
                Op::Read(k) => {
                    span = span.read(k.as_str());
                    match local.get(k) {
                        Some(v) => {
                            prop_assert!(span.is_uncommitted());
                            prop_assert_eq!(span.value().as_str(), v.as_str());
                        }
                        None => {
                            prop_assert!(!span.is_uncommitted());
                            prop_assert_eq!(span.value().clone(), store.get(k.as_str()));
                        }
                    }
                }
                Op::Write(k, v) => {
                    span = span.write(k.as_str(), v.as_str());
                    local.insert(k.clone(), v.clone());
                }
            }
        }
    }

    #[test]
    fn uncontended_commit_applies_last_write_per_key(ops in prop::collection::vec(op_strategy(), 0..30)) {
        let store = seeded(&[("a", "1"), ("b", "2")]);
        let before = store.snapshot();
        let span = build(&store, &ops);
        let pending = span.pending_writes();

        prop_assert!(span.commit());

        let mut expected: HashMap<Key, Value> = before.into_iter().collect();
        for (k, v) in pending {
            expected.insert(k, v);
        }
        for (k, v) in &expected {
            prop_assert_eq!(&store.get(k), v);
        }
    }

    #[test]
    fn conflicting_commit_changes_nothing(
        ops in prop::collection::vec(op_strategy(), 1..30),
        new_value in "[A-Z]{1,3}",
    ) {
        let store = seeded(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]);
        let span = build(&store, &ops);

        // Invalidate the first durable read, if there is one
        let durable = span
            .ancestors()
            .filter(|node| node.is_durable_read())
            .last()
            .map(|node| node.key().clone());

        if let Some(key) = durable {
            store.set(key, new_value.as_str());
            let snapshot = store.snapshot();
            prop_assert!(!span.is_congruent());
            prop_assert!(!span.commit());
            prop_assert_eq!(store.snapshot(), snapshot);
        }
    }
}
