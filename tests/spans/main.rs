//! Span transaction behavior through the public facade
//!
//! ## Test Modules
//!
//! - `read_semantics`: read-your-writes, store fallback, branching
//! - `congruency`: which reads can go stale and when
//! - `commit_protocol`: apply order, abort leaves store untouched
//! - `properties`: proptest checks over generated operation sequences
//!
//! ## Running
//!
//! ```bash
//! cargo test --test spans
//! ```

mod commit_protocol;
mod properties;
mod read_semantics;

use spanstore::prelude::*;
use std::sync::Arc;

/// Store seeded with `entries`, shared for span construction
pub fn seeded(entries: &[(&str, &str)]) -> Arc<Store> {
    Arc::new(Store::from_entries(entries.iter().copied()))
}
