//! Commit protocol for span chains
//!
//! Provides atomic validate-then-apply under the store-wide commit lock.
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. store.lock()              - serialize with every other commit
//! 2. validate_read_chain()     - re-check congruency under the lock
//! 3. IF conflicts: release lock, return ValidationFailed
//! 4. validate_replay()         - replay root-to-leaf against a local overlay
//! 5. IF conflicts: release lock, return ValidationFailed
//! 6. apply writes root-to-leaf - nothing was written before this point
//! 7. next_version()            - once per commit that wrote something
//! 8. release lock, return ApplyResult
//! ```
//!
//! Steps 4 and 6 are separate passes: nothing is written until the whole
//! chain has replayed cleanly, so an aborted commit never leaves partial
//! writes in the store.

use crate::span::{Span, SpanNode};
use crate::validation::{validate_read_chain, validate_replay, ValidationResult};
use spanstore_core::Error;

/// Error type for commit failures
#[derive(Debug, Clone, thiserror::Error)]
pub enum CommitError {
    /// Transaction aborted because durable reads went stale
    ///
    /// The store was not modified. The caller may rebuild and retry.
    #[error("Commit failed: {} conflict(s)", .0.conflict_count())]
    ValidationFailed(ValidationResult),
}

impl CommitError {
    /// Conflicts that caused the abort
    pub fn validation(&self) -> &ValidationResult {
        match self {
            CommitError::ValidationFailed(result) => result,
        }
    }
}

// Conversion to the crate-wide error type
impl From<CommitError> for Error {
    fn from(e: CommitError) -> Self {
        Error::TransactionAborted {
            reason: e.to_string(),
        }
    }
}

/// Result of applying a transaction to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyResult {
    /// Store version after the commit
    ///
    /// Unchanged from before the commit if the chain had no writes.
    pub commit_version: u64,
    /// Number of write nodes applied, in chain order
    pub writes_applied: usize,
    /// Number of read nodes checked during replay
    pub reads_validated: usize,
}

/// The chain ending at `span`, root first
///
/// Collected iteratively so long chains do not recurse.
pub(crate) fn chain_root_to_leaf(span: &Span) -> Vec<&SpanNode> {
    let mut chain = Vec::with_capacity(span.depth() + 1);
    chain.extend(span.ancestors());
    chain.reverse();
    chain
}

/// Validate and apply `span`'s chain under the store lock
pub(crate) fn commit(span: &Span) -> Result<ApplyResult, CommitError> {
    let mut guard = span.store().lock();

    let congruency = validate_read_chain(span);
    if !congruency.is_valid() {
        tracing::debug!(
            depth = span.depth(),
            conflicts = congruency.conflict_count(),
            first_key = %congruency.conflicts[0].key(),
            "commit aborted: stale read"
        );
        return Err(CommitError::ValidationFailed(congruency));
    }

    let chain = chain_root_to_leaf(span);
    let replay = validate_replay(&chain, guard.store());
    if !replay.is_valid() {
        tracing::debug!(
            depth = span.depth(),
            conflicts = replay.conflict_count(),
            first_key = %replay.conflicts[0].key(),
            "commit aborted: replay mismatch"
        );
        return Err(CommitError::ValidationFailed(replay));
    }

    let mut writes_applied = 0;
    let mut reads_validated = 0;
    for node in &chain {
        if node.is_write() {
            guard.set(node.key().clone(), node.value().clone());
            writes_applied += 1;
        } else if node.is_read() {
            reads_validated += 1;
        }
    }

    let commit_version = if writes_applied > 0 {
        guard.next_version()
    } else {
        guard.store().version()
    };

    tracing::trace!(
        commit_version,
        writes_applied,
        reads_validated,
        "span chain committed"
    );

    Ok(ApplyResult {
        commit_version,
        writes_applied,
        reads_validated,
    })
}
