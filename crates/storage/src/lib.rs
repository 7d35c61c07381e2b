//! Storage layer for spanstore
//!
//! This crate implements the store that span transactions read from and
//! commit into:
//! - Store: DashMap-backed map with lock-free reads
//! - CommitGuard: RAII proof that the store-wide commit lock is held
//! - Version counter bumped per applied commit

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;

pub use store::{CommitGuard, Store};
