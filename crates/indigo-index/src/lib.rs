//! # indigo-index
//!
//! Segmented inverted index for the Indigo record store.
//!
//! - [`terms`]: tokenizer, word filters and word selectors
//! - [`IndexSegmentData`] / [`IndexSegment`]: one shard of an index
//! - [`Contents`]: reverse mapping used for targeted removal
//! - [`Index`]: transactional add/remove and non-transactional search
//! - [`IndicesManager`]: every index configured for a record type

pub mod builder;
pub mod contents;
pub mod index;
pub mod manager;
pub mod segment;
pub mod terms;

pub use builder::IndexBuilder;
pub use contents::Contents;
pub use index::{Index, IndexTarget, INDICES_NAMESPACE};
pub use manager::IndicesManager;
pub use segment::{segment_id, IndexSegment, IndexSegmentData, SEGMENT_ID_LENGTH};
pub use terms::{
    sanitize, tokenize, BasicWordFilter, ExactWordSelector, PrefixWordSelector, WordFilter,
    WordSelector,
};
