//! Commonly used types, for glob import

pub use spanstore_concurrency::{Span, StoreExt};
pub use spanstore_core::{Key, Value};
pub use spanstore_storage::Store;
