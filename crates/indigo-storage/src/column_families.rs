//! Column family definitions for RocksDB.
//!
//! Records, index segments, index contents and id counters all live in one
//! column family; the namespace is part of the key (see [`crate::keys`]).

use rocksdb::{ColumnFamilyDescriptor, Options};

/// Column family name for stored documents
pub const CF_DOCUMENTS: &str = "documents";

/// All column family names
pub const ALL_CF_NAMES: &[&str] = &[CF_DOCUMENTS];

/// Create column family options for documents (JSON values, compressed)
fn documents_options() -> Options {
    let mut opts = Options::default();
    opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
    opts
}

/// Build all column family descriptors
pub fn build_cf_descriptors() -> Vec<ColumnFamilyDescriptor> {
    vec![ColumnFamilyDescriptor::new(CF_DOCUMENTS, documents_options())]
}
