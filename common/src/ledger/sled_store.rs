// Phantom NFT Ledger - Sled Backend
// Persistent store implementation over a sled tree.

use log::error;

use super::error::{LedgerError, LedgerResult};
use super::store::KeyValueStore;

/// Sled-backed key-value store. One tree holds the whole ledger namespace,
/// partitioned by the key prefixes in `keys::prefixes`.
pub struct SledStore {
    tree: sled::Tree,
}

impl SledStore {
    pub fn new(tree: sled::Tree) -> Self {
        Self { tree }
    }

    /// Open the named tree of a database
    pub fn open(db: &sled::Db, name: &str) -> LedgerResult<Self> {
        let tree = db.open_tree(name).map_err(|e| {
            error!("failed to open tree {}: {}", name, e);
            LedgerError::Storage
        })?;
        Ok(Self::new(tree))
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.tree.get(key) {
            Ok(value) => value.map(|ivec| ivec.to_vec()),
            Err(e) => {
                error!("sled read failed: {}", e);
                None
            }
        }
    }

    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> LedgerResult<()> {
        self.tree.insert(key, value).map_err(|e| {
            error!("sled write failed: {}", e);
            LedgerError::Storage
        })?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> LedgerResult<()> {
        self.tree.remove(key).map_err(|e| {
            error!("sled delete failed: {}", e);
            LedgerError::Storage
        })?;
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> bool {
        self.tree.contains_key(key).unwrap_or(false)
    }

    fn scan_prefix<'a>(
        &'a self,
        prefix: &[u8],
    ) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a> {
        Box::new(
            self.tree
                .scan_prefix(prefix)
                .filter_map(|entry| entry.ok())
                .map(|(key, value)| (key.to_vec(), value.to_vec())),
        )
    }
}
