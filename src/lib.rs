//! spanstore - in-memory transactional key-value store
//!
//! Transactions are immutable chains of read/write operations ("spans"),
//! built without locks and validated against the store at commit time
//! (optimistic concurrency control).
//!
//! # Quick Start
//!
//! ```
//! use spanstore::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(Store::from_entries([("A", "1")]));
//!
//! // Read, then write based on what was read
//! let txn = store.start().read("A");
//! assert_eq!(txn.value(), &Value::from("1"));
//! let txn = txn.write("A", "2");
//!
//! // Validate-then-apply under the store lock
//! assert!(txn.commit());
//! assert_eq!(store.get("A"), "2");
//! ```
//!
//! # Conflicts
//!
//! A commit fails when a value the transaction read from the store has
//! changed since. The store is left untouched and the caller rebuilds the
//! transaction from a fresh root.
//!
//! ```
//! use spanstore::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(Store::from_entries([("A", "1")]));
//! let stale = store.start().read("A");
//!
//! assert!(store.start().write("A", "3").commit());
//! assert!(!stale.is_congruent());
//! assert!(!stale.commit());
//! assert_eq!(store.get("A"), "3");
//! ```
//!
//! # Architecture
//!
//! - [`spanstore_core`]: keys, values, errors, configuration
//! - [`spanstore_storage`]: the shared store and its commit lock
//! - [`spanstore_concurrency`]: spans, congruency checks, commit

pub mod prelude;

pub use spanstore_concurrency::{
    is_congruent, validate_read_chain, validate_replay, Ancestors, ApplyResult, CommitError,
    ConflictType, Span, SpanKind, SpanNode, StoreExt, ValidationResult,
};
pub use spanstore_core::{Error, Key, Record, Result, StoreConfig, Value, DEFAULT_SHARD_AMOUNT};
pub use spanstore_storage::{CommitGuard, Store};
