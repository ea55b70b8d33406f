//! Write set of a single transaction attempt.
//!
//! Shared by the backends: coalesces writes per key, enforces the write cap
//! and the read-after-write restriction from [`TransactionSettings`].

use std::collections::BTreeMap;

use indigo_types::{ItemId, TransactionSettings};

use crate::error::StorageError;

/// `Some(bytes)` is a put, `None` a delete.
pub type PendingValue = Option<Vec<u8>>;

#[derive(Debug)]
pub struct PendingWrites {
    writes: BTreeMap<ItemId, PendingValue>,
    max_writes: Option<usize>,
    forbid_read_after_write: bool,
}

impl PendingWrites {
    pub fn new(settings: &TransactionSettings) -> Self {
        Self {
            writes: BTreeMap::new(),
            max_writes: settings.max_writes,
            forbid_read_after_write: settings.forbid_read_after_write,
        }
    }

    /// Returns the pending value for `key` if the attempt already wrote it.
    ///
    /// Errors instead when reads after writes are forbidden.
    pub fn read(&self, key: &ItemId) -> Result<Option<&PendingValue>, StorageError> {
        match self.writes.get(key) {
            Some(_) if self.forbid_read_after_write => {
                Err(StorageError::PendingWrite(key.to_string()))
            }
            pending => Ok(pending),
        }
    }

    pub fn put(&mut self, key: ItemId, value: Vec<u8>) -> Result<(), StorageError> {
        self.record(key, Some(value))
    }

    pub fn delete(&mut self, key: ItemId) -> Result<(), StorageError> {
        self.record(key, None)
    }

    fn record(&mut self, key: ItemId, value: PendingValue) -> Result<(), StorageError> {
        if let Some(limit) = self.max_writes {
            if !self.writes.contains_key(&key) && self.writes.len() >= limit {
                return Err(StorageError::TooManyWrites {
                    limit,
                    key: key.to_string(),
                });
            }
        }
        self.writes.insert(key, value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn into_writes(self) -> BTreeMap<ItemId, PendingValue> {
        self.writes
    }
}
