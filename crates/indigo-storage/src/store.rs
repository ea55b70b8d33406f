//! The persistence contract the record store and its indices consume.
//!
//! Backends store opaque byte values under `(namespace, id)`. Values written
//! through the typed helpers are JSON, so maps and sets round-trip faithfully
//! without the backend knowing anything about them.
//!
//! A transaction body may be executed more than once: backends with
//! optimistic concurrency re-run it when a commit loses against a concurrent
//! writer. Bodies must therefore rebuild all of their state on every call.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::Serialize;

use indigo_types::IndigoError;

use crate::error::StorageError;

/// Non-transactional reads.
pub trait StoreReadOps: Send + Sync {
    /// Fetch a single item, `None` if it doesn't exist.
    fn get(&self, namespace: &str, id: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let mut values = self.get_many(namespace, &[id.to_string()])?;
        Ok(values.pop().flatten())
    }

    /// Fetch several items. The result is aligned with `ids`; missing items are `None`.
    fn get_many(&self, namespace: &str, ids: &[String])
        -> Result<Vec<Option<Vec<u8>>>, StorageError>;

    fn exists(&self, namespace: &str, id: &str) -> Result<bool, StorageError>;
}

pub trait StoreListOps {
    /// Ids of all items in a namespace.
    fn list(&self, namespace: &str) -> Result<BTreeSet<String>, StorageError>;
}

/// Body of a transaction. Called once per attempt with a fresh handle.
pub type TransactionBody<'a> = dyn FnMut(&mut dyn Transaction) -> Result<(), IndigoError> + 'a;

/// A complete backend.
pub trait Store: StoreReadOps + StoreListOps {
    /// Run `body` atomically. Writes are committed only if the body returns
    /// `Ok`; an error from the body aborts the attempt and is returned as is.
    /// The backend may call `body` again if the commit conflicts.
    fn transaction(&self, body: &mut TransactionBody<'_>) -> Result<(), IndigoError>;
}

/// One attempt of a transaction.
///
/// Writes to the same key coalesce; the last one wins. Backends may refuse a
/// read of a key already written in the same attempt
/// ([`StorageError::PendingWrite`]) and may cap the number of distinct keys
/// written ([`StorageError::TooManyWrites`]).
pub trait Transaction {
    fn get(&mut self, namespace: &str, id: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let mut values = self.get_many(namespace, &[id.to_string()])?;
        Ok(values.pop().flatten())
    }

    fn get_many(
        &mut self,
        namespace: &str,
        ids: &[String],
    ) -> Result<Vec<Option<Vec<u8>>>, StorageError>;

    fn exists(&mut self, namespace: &str, id: &str) -> Result<bool, StorageError>;

    fn put(&mut self, namespace: &str, id: &str, value: Vec<u8>) -> Result<(), StorageError>;

    fn delete(&mut self, namespace: &str, id: &str) -> Result<(), StorageError>;
}

fn decode<T: DeserializeOwned>(bytes: Option<Vec<u8>>) -> Result<Option<T>, StorageError> {
    bytes
        .map(|b| serde_json::from_slice(&b).map_err(StorageError::from))
        .transpose()
}

/// JSON-typed reads over any [`StoreReadOps`].
pub trait TypedStoreReads: StoreReadOps {
    fn get_as<T: DeserializeOwned>(
        &self,
        namespace: &str,
        id: &str,
    ) -> Result<Option<T>, StorageError> {
        decode(self.get(namespace, id)?)
    }

    fn get_many_as<T: DeserializeOwned>(
        &self,
        namespace: &str,
        ids: &[String],
    ) -> Result<Vec<Option<T>>, StorageError> {
        self.get_many(namespace, ids)?.into_iter().map(decode).collect()
    }
}

impl<S: StoreReadOps + ?Sized> TypedStoreReads for S {}

/// JSON-typed reads and writes over any [`Transaction`].
pub trait TypedTransaction: Transaction {
    fn get_as<T: DeserializeOwned>(
        &mut self,
        namespace: &str,
        id: &str,
    ) -> Result<Option<T>, StorageError> {
        decode(self.get(namespace, id)?)
    }

    fn get_many_as<T: DeserializeOwned>(
        &mut self,
        namespace: &str,
        ids: &[String],
    ) -> Result<Vec<Option<T>>, StorageError> {
        self.get_many(namespace, ids)?.into_iter().map(decode).collect()
    }

    fn put_as<T: Serialize + ?Sized>(
        &mut self,
        namespace: &str,
        id: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value)?;
        self.put(namespace, id, bytes)
    }
}

impl<T: Transaction + ?Sized> TypedTransaction for T {}
