//! Read semantics

use crate::seeded;
use spanstore::prelude::*;
use spanstore::SpanKind;

#[test]
fn read_your_writes_ignores_store_value() {
    let store = seeded(&[("k", "durable")]);
    let span = store.start().write("k", "v1").read("k");

    assert_eq!(span.value(), &Value::from("v1"));
    assert!(span.is_uncommitted());
}

#[test]
fn read_falls_back_to_store() {
    let store = seeded(&[("k", "durable")]);
    let span = store.start().read("k");

    assert_eq!(*span.value(), store.get("k"));
    assert!(!span.is_uncommitted());
}

#[test]
fn read_after_read_of_same_key_is_durable() {
    let store = seeded(&[("k", "1")]);
    let span = store.start().read("k").read("k");
    assert!(!span.is_uncommitted());
    assert_eq!(span.read_set_len(), 2);
}

#[test]
fn root_record_is_empty() {
    let store = seeded(&[]);
    let root = store.start();
    let record = root.record();

    assert_eq!(root.kind(), SpanKind::Root);
    assert!(record.key.is_empty());
    assert!(record.value.is_empty());
    assert!(!record.uncommitted);
}

#[test]
fn every_chain_ends_in_one_root() {
    let store = seeded(&[]);
    let span = store.start().write("a", "1").read("a").read("b").write("c", "2");

    let roots = span
        .ancestors()
        .filter(|node| node.kind() == SpanKind::Root)
        .count();
    assert_eq!(roots, 1);
    assert_eq!(span.ancestors().last().map(|n| n.kind()), Some(SpanKind::Root));
}

#[test]
fn siblings_do_not_see_each_other() {
    let store = seeded(&[]);
    let prefix = store.start();
    let left = prefix.write("k", "left");
    let right = prefix.read("k");

    assert_eq!(left.value(), &Value::from("left"));
    assert!(right.value().is_empty());
    assert!(!right.is_uncommitted());
}

#[test]
fn keys_accept_owned_and_borrowed_strings() {
    let store = seeded(&[]);
    let owned = String::from("owned");
    let span = store
        .start()
        .write(owned.clone(), String::from("1"))
        .write(Key::from("typed"), Value::from("2"))
        .read(owned.as_str());

    assert_eq!(span.value(), &Value::from("1"));
}
