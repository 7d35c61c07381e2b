//! Core types for spanstore
//!
//! This crate defines the foundational types used throughout the system:
//! - Key / Value: opaque string-like scalars
//! - Record: payload of one span (key, value, uncommitted flag)
//! - Error: error type hierarchy
//! - StoreConfig: tuning for the in-memory map, loadable from TOML

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{StoreConfig, DEFAULT_SHARD_AMOUNT};
pub use error::{Error, Result};
pub use types::{Key, Record, Value};
