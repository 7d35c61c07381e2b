//! Span chains: transactions as immutable operation histories
//!
//! A transaction is a singly-linked chain of [`SpanNode`]s running from the
//! newest operation back to a root. Extending a transaction never mutates an
//! existing node; `read` and `write` allocate a child that points at its
//! parent. Several children may share one parent, so a prefix can be
//! branched into alternative continuations.
//!
//! Building a chain never takes the store's commit lock. The only store
//! access is the optimistic pre-read in [`Span::read`] when no ancestor
//! wrote the key; whether that value is still current is decided at commit.
//!
//! ```text
//! root ── write(A,1) ── read(A) ── read(B)
//!                          │          └─ durable: value from the store
//!                          └─ uncommitted: value from write(A,1)
//! ```

use crate::commit::{self, ApplyResult, CommitError};
use crate::validation::{self, ValidationResult};
use rustc_hash::FxHashMap;
use spanstore_core::{Key, Record, Value};
use spanstore_storage::Store;
use std::fmt;
use std::sync::Arc;

/// What a span node records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// The empty transaction; has no parent
    Root,
    /// A value observed by the transaction
    Read,
    /// A pending write, applied only on commit
    Write,
}

/// One immutable operation in a transaction's history
pub struct SpanNode {
    parent: Option<Arc<SpanNode>>,
    kind: SpanKind,
    record: Record,
    depth: usize,
}

impl SpanNode {
    fn root() -> Self {
        SpanNode {
            parent: None,
            kind: SpanKind::Root,
            record: Record::default(),
            depth: 0,
        }
    }

    /// Operation kind
    #[inline]
    pub fn kind(&self) -> SpanKind {
        self.kind
    }

    /// Key, value and uncommitted flag
    #[inline]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Key touched by this operation (empty for the root)
    #[inline]
    pub fn key(&self) -> &Key {
        &self.record.key
    }

    /// Value read or written (empty for the root)
    #[inline]
    pub fn value(&self) -> &Value {
        &self.record.value
    }

    /// True for read nodes
    #[inline]
    pub fn is_read(&self) -> bool {
        self.kind == SpanKind::Read
    }

    /// True for pending writes
    #[inline]
    pub fn is_write(&self) -> bool {
        self.kind == SpanKind::Write
    }

    /// True for a read served by an ancestor write
    #[inline]
    pub fn is_uncommitted(&self) -> bool {
        self.record.uncommitted
    }

    /// True for a read whose value came from the store
    ///
    /// These are the only nodes that can go stale.
    #[inline]
    pub fn is_durable_read(&self) -> bool {
        self.is_read() && !self.record.uncommitted
    }

    /// Distance from the root (root = 0)
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Preceding node, `None` for the root
    pub fn parent(&self) -> Option<&SpanNode> {
        self.parent.as_deref()
    }
}

// Tear the chain down iteratively. The default drop would recurse once per
// uniquely-owned ancestor and overflow the stack on long chains.
impl Drop for SpanNode {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}

impl fmt::Debug for SpanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanNode")
            .field("kind", &self.kind)
            .field("key", &self.record.key)
            .field("value", &self.record.value)
            .field("uncommitted", &self.record.uncommitted)
            .field("depth", &self.depth)
            .finish()
    }
}

/// Iterator over a span and its ancestors, nearest first
pub struct Ancestors<'a> {
    next: Option<&'a SpanNode>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a SpanNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.parent.as_deref();
        Some(node)
    }
}

/// Handle to the newest operation of a transaction
///
/// Cloning a `Span` is cheap: it copies two reference-counted pointers. The
/// clone names the same node, so committing both the original and a clone
/// commits the same transaction twice, which is caller misuse and is not
/// detected.
#[derive(Clone)]
pub struct Span {
    store: Arc<Store>,
    node: Arc<SpanNode>,
}

impl Span {
    /// Root span (the empty transaction) bound to `store`
    pub fn start(store: &Arc<Store>) -> Span {
        Span {
            store: Arc::clone(store),
            node: Arc::new(SpanNode::root()),
        }
    }

    fn child(&self, kind: SpanKind, record: Record) -> Span {
        Span {
            store: Arc::clone(&self.store),
            node: Arc::new(SpanNode {
                parent: Some(Arc::clone(&self.node)),
                kind,
                record,
                depth: self.node.depth + 1,
            }),
        }
    }

    /// Extend the transaction with a read of `key`
    ///
    /// If this span or any ancestor is a pending write to `key`, the nearest
    /// such write supplies the value and the read is marked uncommitted.
    /// Otherwise the value is read from the store without locking.
    pub fn read(&self, key: impl Into<Key>) -> Span {
        let key = key.into();
        let local = self
            .ancestors()
            .find(|node| node.is_write() && node.record.key == key)
            .map(|node| node.record.value.clone());

        let record = match local {
            Some(value) => Record::uncommitted(key, value),
            None => {
                let value = self.store.get(&key);
                Record::new(key, value)
            }
        };
        self.child(SpanKind::Read, record)
    }

    /// Extend the transaction with a pending write
    pub fn write(&self, key: impl Into<Key>, value: impl Into<Value>) -> Span {
        self.child(SpanKind::Write, Record::new(key.into(), value.into()))
    }

    /// Newest node of this transaction
    #[inline]
    pub fn node(&self) -> &SpanNode {
        &self.node
    }

    /// Operation kind of the newest node
    #[inline]
    pub fn kind(&self) -> SpanKind {
        self.node.kind
    }

    /// Record of the newest node
    #[inline]
    pub fn record(&self) -> &Record {
        &self.node.record
    }

    /// Key of the newest node
    #[inline]
    pub fn key(&self) -> &Key {
        self.node.key()
    }

    /// Value of the newest node
    #[inline]
    pub fn value(&self) -> &Value {
        self.node.value()
    }

    /// True if the newest node is a read
    #[inline]
    pub fn is_read(&self) -> bool {
        self.node.is_read()
    }

    /// True if the newest node is a pending write
    #[inline]
    pub fn is_write(&self) -> bool {
        self.node.is_write()
    }

    /// True for the empty transaction
    #[inline]
    pub fn is_root(&self) -> bool {
        self.node.kind == SpanKind::Root
    }

    /// True if the newest node is a read served by an ancestor write
    #[inline]
    pub fn is_uncommitted(&self) -> bool {
        self.node.is_uncommitted()
    }

    /// Number of operations since the root
    #[inline]
    pub fn depth(&self) -> usize {
        self.node.depth
    }

    /// The span this one extends, `None` for the root
    pub fn parent(&self) -> Option<Span> {
        self.node.parent.as_ref().map(|parent| Span {
            store: Arc::clone(&self.store),
            node: Arc::clone(parent),
        })
    }

    /// Store this transaction reads from and commits into
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// This span's node followed by every ancestor up to the root
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: Some(&*self.node),
        }
    }

    /// Number of reads in the chain that came from the store
    pub fn read_set_len(&self) -> usize {
        self.ancestors()
            .filter(|node| node.is_durable_read())
            .count()
    }

    /// Final pending value per key, ordered by each key's first write
    pub fn pending_writes(&self) -> Vec<(Key, Value)> {
        let chain = commit::chain_root_to_leaf(self);
        let mut writes: Vec<(Key, Value)> = Vec::new();
        let mut index: FxHashMap<&Key, usize> = FxHashMap::default();

        for node in chain.iter().filter(|node| node.is_write()) {
            match index.get(node.key()) {
                Some(&slot) => writes[slot].1 = node.value().clone(),
                None => {
                    index.insert(node.key(), writes.len());
                    writes.push((node.key().clone(), node.value().clone()));
                }
            }
        }
        writes
    }

    /// Whether every durable read in the chain still matches the store
    ///
    /// Lock-free point-in-time check; `commit` repeats it under the lock.
    pub fn is_congruent(&self) -> bool {
        validation::is_congruent(self)
    }

    /// Every stale durable read in the chain, checked without the lock
    pub fn validate(&self) -> ValidationResult {
        validation::validate_read_chain(self)
    }

    /// Validate and apply the transaction under the store lock
    ///
    /// Returns `false` if a durable read has gone stale. The store is left
    /// untouched in that case.
    pub fn commit(self) -> bool {
        self.try_commit().is_ok()
    }

    /// Like [`commit`](Self::commit), reporting what happened
    pub fn try_commit(self) -> Result<ApplyResult, CommitError> {
        commit::commit(&self)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Span")
            .field("node", &*self.node)
            .field("store", &*self.store)
            .finish()
    }
}

/// Start transactions directly from a shared store
pub trait StoreExt {
    /// Root span bound to this store
    fn start(&self) -> Span;
}

impl StoreExt for Arc<Store> {
    fn start(&self) -> Span {
        Span::start(self)
    }
}
