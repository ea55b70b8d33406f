//! Storage layer for the Indigo record store.
//!
//! Provides:
//! - The [`Store`] / [`Transaction`] contract, with JSON-typed helpers
//! - [`TransactionWithCache`], the per-attempt read/write cache
//! - [`MemoryStore`]: in-process, optimistic, retrying
//! - [`RocksStore`]: RocksDB-backed, serialized writers, atomic write batches

pub mod cache;
pub mod column_families;
pub mod db;
pub mod error;
pub mod keys;
pub mod memory;
pub mod pending;
pub mod store;

pub use cache::TransactionWithCache;
pub use db::{RocksStore, RocksTransaction};
pub use error::StorageError;
pub use keys::{check_key, DocumentKey};
pub use memory::{MemoryStore, MemoryStoreStats, MemoryTransaction};
pub use pending::{PendingValue, PendingWrites};
pub use store::{
    Store, StoreListOps, StoreReadOps, Transaction, TransactionBody, TypedStoreReads,
    TypedTransaction,
};
