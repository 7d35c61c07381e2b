//! Concurrency layer for spanstore
//!
//! This crate implements optimistic concurrency control (OCC) over span
//! chains:
//! - Span: immutable read/write history, built without locks
//! - Congruency: read-set validation against the current store
//! - Commit: validate-then-apply under the store-wide lock, two-phase so an
//!   abort never leaves partial writes
//!
//! First-committer-wins: whichever transaction takes the lock first with a
//! congruent read-set commits; later ones whose reads went stale abort and
//! must be rebuilt by the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commit;
pub mod span;
pub mod validation;

pub use commit::{ApplyResult, CommitError};
pub use span::{Ancestors, Span, SpanKind, SpanNode, StoreExt};
pub use validation::{
    is_congruent, validate_read_chain, validate_replay, ConflictType, ValidationResult,
};
