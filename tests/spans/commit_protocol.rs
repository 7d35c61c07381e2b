//! Commit protocol

use crate::seeded;
use spanstore::prelude::*;
use spanstore::{CommitError, Error, StoreConfig};
use std::sync::Arc;

#[test]
fn commit_applies_writes() {
    let store = seeded(&[]);
    assert!(store.start().write("k", "v").commit());
    assert_eq!(store.get("k"), "v");
}

#[test]
fn disjoint_root_transactions_both_commit() {
    let store = seeded(&[("a", "0"), ("b", "0")]);
    let t1 = store.start().read("a").write("a", "1");
    let t2 = store.start().read("b").write("b", "1");

    assert!(t1.commit());
    assert!(t2.commit());
    assert_eq!(store.get("a"), "1");
    assert_eq!(store.get("b"), "1");
}

#[test]
fn aborted_commit_leaves_store_untouched() {
    let store = seeded(&[("A", "1")]);
    let span = store
        .start()
        .write("before", "x")
        .read("A")
        .write("after", "y");
    store.set("A", "2");
    let snapshot = store.snapshot();

    let err = span.try_commit().unwrap_err();
    assert!(matches!(err, CommitError::ValidationFailed(_)));
    assert_eq!(store.snapshot(), snapshot);
}

#[test]
fn retry_after_abort_succeeds() {
    let store = seeded(&[("n", "1")]);
    let stale = store.start().read("n").write("n", "2");
    store.set("n", "5");
    assert!(!stale.commit());

    let fresh = store.start().read("n");
    let next: u32 = fresh.value().as_str().parse().unwrap();
    assert!(fresh.write("n", (next + 1).to_string()).commit());
    assert_eq!(store.get("n"), "6");
}

#[test]
fn abort_converts_to_retryable_error() {
    fn commit_version(span: Span) -> spanstore::Result<u64> {
        let applied = span.try_commit()?;
        Ok(applied.commit_version)
    }

    let store = seeded(&[("A", "1")]);
    let span = store.start().read("A").write("B", "2");
    store.set("A", "9");

    let err = commit_version(span).unwrap_err();
    assert!(matches!(err, Error::TransactionAborted { .. }));
    assert!(err.is_retryable());
}

#[test]
fn store_with_config_commits() {
    let config = StoreConfig::from_toml_str("shard_amount = 8\ninitial_capacity = 16").unwrap();
    let store = Arc::new(Store::with_config(&config).unwrap());
    assert!(store.start().write("k", "v").commit());
    assert_eq!(store.get("k"), "v");
}
