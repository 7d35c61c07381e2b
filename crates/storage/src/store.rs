//! Shared key-value store
//!
//! The store is the single source of truth for committed data. It pairs a
//! sharded concurrent map with one store-wide commit lock.
//!
//! # Design
//!
//! - DashMap: sharded, so `get()` may run concurrently with a commit that
//!   is writing under the lock. Optimistic pre-reads taken while building a
//!   transaction are therefore memory-safe; staleness is caught later by
//!   validation, not prevented here.
//! - Commit lock: a single `parking_lot::Mutex<()>`. Holding its
//!   [`CommitGuard`] serializes validate-then-apply across all transactions
//!   on this store (first-committer-wins).
//! - Version: `AtomicU64` bumped once per applied commit and once per
//!   direct `set()`.
//!
//! # Sharing
//!
//! `Store` does not implement `Clone`. Share it through `Arc<Store>`; a
//! copied store would be a second lock domain over what should be one
//! logical store.

use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use spanstore_core::{Key, Result, StoreConfig, Value};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-guarded mapping from key to value
///
/// # Thread Safety
///
/// - get(): Lock-free read via DashMap
/// - set(): Takes the commit lock for the single write
/// - lock(): Returns a guard for multi-step validate-then-apply
///
/// # Example
///
/// ```ignore
/// use spanstore_storage::Store;
/// use std::sync::Arc;
///
/// let store = Arc::new(Store::new());
/// store.set("a", "1");
/// assert_eq!(store.get("a"), "1");
/// ```
pub struct Store {
    data: DashMap<Key, Value>,
    commit_lock: Mutex<()>,
    version: AtomicU64,
}

impl Store {
    /// Create an empty store with default configuration
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
            commit_lock: Mutex::new(()),
            version: AtomicU64::new(0),
        }
    }

    /// Create an empty store tuned by `config`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the shard amount is not a power of two
    /// greater than 1.
    pub fn with_config(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        if *config != StoreConfig::default() {
            tracing::info!(
                shard_amount = config.shard_amount,
                initial_capacity = config.initial_capacity,
                "creating store with custom configuration"
            );
        }
        Ok(Self {
            data: DashMap::with_capacity_and_shard_amount(
                config.initial_capacity,
                config.shard_amount,
            ),
            commit_lock: Mutex::new(()),
            version: AtomicU64::new(0),
        })
    }

    /// Create a store pre-populated with `entries`
    ///
    /// Seeding does not count as a commit: the version stays at 0.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let store = Self::new();
        for (key, value) in entries {
            store.data.insert(key.into(), value.into());
        }
        store
    }

    /// Current value for `key`, or the zero value if it was never written
    ///
    /// Lock-free. Safe to call while another thread holds the commit lock.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Value
    where
        Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.data
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Unconditionally overwrite `key`, outside any transaction
    ///
    /// Takes the commit lock so the write is serialized with commits.
    /// Returns the store version after the write.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) -> u64 {
        let mut guard = self.lock();
        guard.set(key.into(), value.into());
        guard.next_version()
    }

    /// Acquire the store-wide commit lock
    ///
    /// The lock is released when the returned guard is dropped.
    pub fn lock(&self) -> CommitGuard<'_> {
        CommitGuard {
            store: self,
            _lock: self.commit_lock.lock(),
        }
    }

    /// Whether `key` has an entry in the map
    ///
    /// Only for inspection: reads and validation treat an absent key and a
    /// key holding the zero value the same.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.data.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the store has no entries
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get current version
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Copy of every entry, sorted by key
    ///
    /// Not atomic with respect to concurrent commits unless the caller
    /// holds the commit lock.
    pub fn snapshot(&self) -> Vec<(Key, Value)> {
        let mut entries: Vec<(Key, Value)> = self
            .data
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("entries", &self.data.len())
            .field("version", &self.version())
            .finish()
    }
}

/// Proof that the store's commit lock is held
///
/// Everything a commit does to the store goes through this guard.
/// Dropping it unlocks the store.
pub struct CommitGuard<'a> {
    store: &'a Store,
    _lock: MutexGuard<'a, ()>,
}

impl<'a> CommitGuard<'a> {
    /// Current value for `key` while the lock is held
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Value
    where
        Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.get(key)
    }

    /// Overwrite `key`
    #[inline]
    pub fn set(&mut self, key: Key, value: Value) {
        self.store.data.insert(key, value);
    }

    /// Increment the store version and return the new value
    #[inline]
    pub fn next_version(&mut self) -> u64 {
        self.store.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// The store this guard locks
    pub fn store(&self) -> &'a Store {
        self.store
    }
}

impl fmt::Debug for CommitGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitGuard").field("store", self.store).finish()
    }
}
