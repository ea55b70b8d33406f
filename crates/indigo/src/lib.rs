//! # indigo
//!
//! Embeddable record store with full-text and prefix search over a
//! transactional key-value backend.
//!
//! ```text
//! Indigo<T> ── put/delete ──> Store::transaction ──> TransactionWithCache
//!    │                                                   │
//!    └── search ──> IndicesManager ──> Index ──> segments + contents
//! ```
//!
//! - [`Indigo`]: records, id generation and the put/delete protocol
//! - [`IndigoBuilder`]: assembles a store and its indices
//! - [`IndigoAdmin`]: batch re-indexing

pub mod admin;
pub mod builder;
pub mod entities;
pub mod info;

pub use admin::{
    IndigoAdmin, LoggingProgressCallback, NoOpProgressCallback, ProgressCallback, RebuildConfig,
    RebuildProgress,
};
pub use builder::{IndigoBuilder, DEFAULT_NAMESPACE};
pub use entities::Indigo;
pub use info::{EntitiesInfo, INFO_ID};

pub use indigo_index::{
    BasicWordFilter, ExactWordSelector, IndexBuilder, PrefixWordSelector, WordFilter,
    WordSelector,
};
pub use indigo_storage::{MemoryStore, RocksStore, Store};
pub use indigo_types::{Entity, IndigoError, Settings, TransactionSettings};
