// Phantom NFT Ledger - Storage Abstraction
// The ledger consumes the host key-value store through this narrow
// interface: single-key get/put/delete plus ordered prefix iteration.
//
// Mutating operations never write directly. They stage every write in a
// WriteBatch after all validation has passed, then apply the batch in one
// go. Under the host's sequential execution model this makes each public
// operation all-or-nothing as observed from outside the call.

use std::collections::BTreeMap;

use super::error::LedgerResult;

// ========================================
// Write Batching
// ========================================

/// A single staged store mutation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// An ordered set of staged writes, applied after validation
#[derive(Clone, Debug, Default)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.ops.push(WriteOp::Put { key, value });
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        self.ops.push(WriteOp::Delete { key });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

// ========================================
// Store Interface
// ========================================

/// Abstract interface over the scoped, ordered key-value store provided by
/// the host. Iteration order of `scan_prefix` is ascending byte order of the
/// keys and must be stable within a single scan.
pub trait KeyValueStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> LedgerResult<()>;

    fn delete(&mut self, key: &[u8]) -> LedgerResult<()>;

    fn contains(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Lazy iteration over all entries whose key starts with `prefix`
    fn scan_prefix<'a>(
        &'a self,
        prefix: &[u8],
    ) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>;

    /// Apply a batch of staged writes in order
    fn apply(&mut self, batch: WriteBatch) -> LedgerResult<()> {
        for op in batch.into_ops() {
            match op {
                WriteOp::Put { key, value } => self.put(key, value)?,
                WriteOp::Delete { key } => self.delete(&key)?,
            }
        }
        Ok(())
    }
}

// ========================================
// In-Memory Backend
// ========================================

/// BTreeMap-backed store used in tests and for embedding without a database
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> LedgerResult<()> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> LedgerResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    fn scan_prefix<'a>(
        &'a self,
        prefix: &[u8],
    ) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a> {
        let prefix = prefix.to_vec();
        Box::new(
            self.entries
                .range(prefix.clone()..)
                .take_while(move |(key, _)| key.starts_with(&prefix))
                .map(|(key, value)| (key.clone(), value.clone())),
        )
    }
}
