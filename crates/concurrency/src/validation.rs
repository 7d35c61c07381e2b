//! Congruency checks for OCC
//!
//! A transaction is congruent when every durable read in its chain still
//! matches the store. Key rules:
//! - Only reads served by the store (durable reads) can go stale
//! - Writes are never validated; blind writes do not conflict
//! - Uncommitted reads are answered by the chain itself and cannot be
//!   invalidated by other transactions
//! - An absent key and a key holding the zero value compare equal

use crate::span::{Span, SpanNode};
use rustc_hash::FxHashMap;
use spanstore_core::{Key, Value};
use spanstore_storage::Store;

/// Types of conflicts that can occur during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// A durable read no longer matches the store
    StaleRead {
        /// The key that was read
        key: Key,
        /// Value recorded when the read was taken
        read_value: Value,
        /// Value in the store at validation time
        current_value: Value,
        /// Depth of the read node in its chain
        depth: usize,
    },

    /// Replaying the chain produced a different value for a read than the
    /// one recorded on the read node
    ReplayMismatch {
        /// The key that was read
        key: Key,
        /// Value recorded on the read node
        expected: Value,
        /// Value the read observes during replay
        found: Value,
        /// Depth of the read node in its chain
        depth: usize,
    },
}

impl ConflictType {
    /// Key involved in the conflict
    pub fn key(&self) -> &Key {
        match self {
            ConflictType::StaleRead { key, .. } | ConflictType::ReplayMismatch { key, .. } => key,
        }
    }
}

/// Result of transaction validation
///
/// Accumulates all conflicts found during validation.
/// A transaction commits only if is_valid() returns true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// All conflicts detected during validation
    pub conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// Create a successful validation result (no conflicts)
    pub fn ok() -> Self {
        ValidationResult {
            conflicts: Vec::new(),
        }
    }

    /// Create a validation result with a single conflict
    pub fn conflict(conflict: ConflictType) -> Self {
        ValidationResult {
            conflicts: vec![conflict],
        }
    }

    /// Check if validation passed (no conflicts)
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.conflicts.extend(other.conflicts);
    }

    /// Get the number of conflicts
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }
}

/// Whether every durable read in `span`'s chain matches the store now
///
/// Stops at the first stale read. Does not take the commit lock, so the
/// answer is only a point-in-time snapshot.
pub fn is_congruent(span: &Span) -> bool {
    let store = span.store();
    span.ancestors()
        .filter(|node| node.is_durable_read())
        .all(|node| store.get(node.key()) == *node.value())
}

/// Validate every durable read in `span`'s chain against the store
///
/// Unlike [`is_congruent`] this walks the whole chain and reports each stale
/// read, nearest first.
pub fn validate_read_chain(span: &Span) -> ValidationResult {
    let store = span.store();
    let mut result = ValidationResult::ok();

    for node in span.ancestors().filter(|node| node.is_durable_read()) {
        let current_value = store.get(node.key());
        if current_value != *node.value() {
            result.conflicts.push(ConflictType::StaleRead {
                key: node.key().clone(),
                read_value: node.value().clone(),
                current_value,
                depth: node.depth(),
            });
        }
    }

    result
}

/// Replay a chain root-to-leaf without touching the store
///
/// Writes go to a local overlay; each read must observe, through the overlay
/// and then the store, exactly the value recorded on it. This is the check
/// an in-place apply would make, done before anything is written.
///
/// `chain` must be ordered root first.
pub fn validate_replay(chain: &[&SpanNode], store: &Store) -> ValidationResult {
    let mut overlay: FxHashMap<&Key, &Value> = FxHashMap::default();
    let mut result = ValidationResult::ok();

    for node in chain {
        if node.is_write() {
            overlay.insert(node.key(), node.value());
        } else if node.is_read() {
            let found = match overlay.get(node.key()) {
                Some(value) => (*value).clone(),
                None => store.get(node.key()),
            };
            if found != *node.value() {
                result.conflicts.push(ConflictType::ReplayMismatch {
                    key: node.key().clone(),
                    expected: node.value().clone(),
                    found,
                    depth: node.depth(),
                });
            }
        }
    }

    result
}
