use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use crate::{LedgerError, ResultLedger};

use super::{KeyValueStore, StoreOp};

/// In-process store for tests and embedders; nothing is written to disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ResultLedger<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| LedgerError::Storage("memory store lock poisoned".to_string()))
    }

    /// Copy of every stored entry.
    pub fn entries(&self) -> ResultLedger<BTreeMap<String, String>> {
        Ok(self.lock()?.clone())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> ResultLedger<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn write_batch(&self, ops: Vec<StoreOp>) -> ResultLedger<()> {
        // A single lock covers the whole batch.
        let mut entries = self.lock()?;
        for op in ops {
            match op {
                StoreOp::Set { key, value } => {
                    entries.insert(key, value);
                }
                StoreOp::Remove { key } => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}
