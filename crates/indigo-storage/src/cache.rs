//! Per-attempt read/write cache over a raw transaction.
//!
//! Index segments, index contents and the id counter are all read and
//! rewritten several times within one put/delete. Caching at the transaction
//! level keeps those reads consistent with earlier writes in the same attempt
//! and avoids hitting backends that refuse reads after writes.
//!
//! A cache lives for exactly one attempt. Wrap the raw handle inside the
//! transaction body so a retried attempt starts empty.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use indigo_types::ItemId;

use crate::error::StorageError;
use crate::store::Transaction;

/// Cached view of a raw [`Transaction`].
///
/// A cached `None` means the item is known not to exist, which is distinct
/// from an item that hasn't been looked up yet.
pub struct TransactionWithCache<'a> {
    transaction: &'a mut dyn Transaction,
    cache: HashMap<ItemId, Option<Vec<u8>>>,
}

impl<'a> TransactionWithCache<'a> {
    pub fn new(transaction: &'a mut dyn Transaction) -> Self {
        Self {
            transaction,
            cache: HashMap::new(),
        }
    }

    /// Number of items (including known-missing ones) held by the cache.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Transaction for TransactionWithCache<'_> {
    fn get_many(
        &mut self,
        namespace: &str,
        ids: &[String],
    ) -> Result<Vec<Option<Vec<u8>>>, StorageError> {
        let mut seen = HashSet::new();
        let mut not_cached = Vec::new();
        for id in ids {
            let cached = self.cache.contains_key(&ItemId::new(namespace, id.as_str()));
            if !cached && seen.insert(id.as_str()) {
                not_cached.push(id.clone());
            }
        }

        if !not_cached.is_empty() {
            let fetched = self.transaction.get_many(namespace, &not_cached)?;
            if fetched.len() != not_cached.len() {
                return Err(StorageError::Backend(format!(
                    "requested {} items from {}, got {}",
                    not_cached.len(),
                    namespace,
                    fetched.len()
                )));
            }

            for (id, value) in not_cached.into_iter().zip(fetched) {
                self.cache.insert(ItemId::new(namespace, id), value);
            }
        }

        trace!(namespace, requested = ids.len(), "Transaction cache read");

        Ok(ids
            .iter()
            .map(|id| {
                self.cache
                    .get(&ItemId::new(namespace, id.as_str()))
                    .cloned()
                    .flatten()
            })
            .collect())
    }

    fn exists(&mut self, namespace: &str, id: &str) -> Result<bool, StorageError> {
        match self.cache.get(&ItemId::new(namespace, id)) {
            Some(value) => Ok(value.is_some()),
            None => self.transaction.exists(namespace, id),
        }
    }

    fn put(&mut self, namespace: &str, id: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.transaction.put(namespace, id, value.clone())?;
        self.cache.insert(ItemId::new(namespace, id), Some(value));
        Ok(())
    }

    fn delete(&mut self, namespace: &str, id: &str) -> Result<(), StorageError> {
        self.transaction.delete(namespace, id)?;
        self.cache.insert(ItemId::new(namespace, id), None);
        Ok(())
    }
}
