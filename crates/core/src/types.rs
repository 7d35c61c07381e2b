//! Key, value and record types
//!
//! Keys and values are opaque string-like scalars. There is no schema and no
//! type negotiation: the store compares values by equality only.
//!
//! # Absent keys
//!
//! The store follows a zero-value convention. A key that was never written
//! reads as [`Value::default()`], the empty value, and a key explicitly set
//! to the empty value is indistinguishable from an absent one for the
//! purpose of reads and congruency checks.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Key identifying one entry in the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    /// Create a key from anything string-like
    pub fn new(key: impl Into<String>) -> Self {
        Key(key.into())
    }

    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty key carried by root spans
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the key, returning the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key(s)
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Value stored under a key
///
/// `Value::default()` is the zero value returned for keys that were never
/// written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(String);

impl Value {
    /// Create a value from anything string-like
    pub fn new(value: impl Into<String>) -> Self {
        Value(value.into())
    }

    /// Borrow the value as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the zero value
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the value, returning the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value(s)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Payload of one operation in a transaction's history
///
/// `uncommitted` is only ever set on read records whose value came from an
/// earlier pending write in the same chain rather than from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Key the operation touched
    pub key: Key,
    /// Value read or written
    pub value: Value,
    /// Read satisfied by the transaction's own pending write
    pub uncommitted: bool,
}

impl Record {
    /// Record for a durable read or a pending write
    pub fn new(key: Key, value: Value) -> Self {
        Record {
            key,
            value,
            uncommitted: false,
        }
    }

    /// Record for a read served by an ancestor write
    pub fn uncommitted(key: Key, value: Value) -> Self {
        Record {
            key,
            value,
            uncommitted: true,
        }
    }
}
