//! Key-value storage boundary.
//!
//! The ledger keeps each field under its own string key. Reads are single
//! lookups; writes go through [`KeyValueStore::write_batch`], which must apply
//! all operations or none of them.

use crate::ResultLedger;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// One write in a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl StoreOp {
    pub fn set(key: &str, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn remove(key: &str) -> Self {
        Self::Remove {
            key: key.to_string(),
        }
    }
}

/// A string-keyed persistent store.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get_item(&self, key: &str) -> ResultLedger<Option<String>>;

    /// Applies every operation atomically.
    async fn write_batch(&self, ops: Vec<StoreOp>) -> ResultLedger<()>;

    async fn set_item(&self, key: &str, value: &str) -> ResultLedger<()> {
        self.write_batch(vec![StoreOp::set(key, value)]).await
    }

    async fn remove_item(&self, key: &str) -> ResultLedger<()> {
        self.write_batch(vec![StoreOp::remove(key)]).await
    }
}
