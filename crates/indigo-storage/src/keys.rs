//! Key encoding for the RocksDB backend.
//!
//! Key format: `{namespace}:{id}`
//! - namespace and id are store ids (`[a-zA-Z0-9_-]+`), so `:` never occurs in
//!   either and splitting on the first `:` is unambiguous
//! - every key of a namespace shares the `{namespace}:` prefix, which makes
//!   listing a namespace a single prefix scan

use indigo_types::{validate_id, ItemId};

use crate::error::StorageError;

/// Validate both parts of a key and build the item id.
pub fn check_key(namespace: &str, id: &str) -> Result<ItemId, StorageError> {
    validate_id(namespace).map_err(|e| StorageError::InvalidKey(e.to_string()))?;
    validate_id(id).map_err(|e| StorageError::InvalidKey(e.to_string()))?;
    Ok(ItemId::new(namespace, id))
}

/// Key for a stored document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentKey {
    pub namespace: String,
    pub id: String,
}

impl DocumentKey {
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
        }
    }

    /// Encode key to bytes for storage
    pub fn to_bytes(&self) -> Vec<u8> {
        format!("{}:{}", self.namespace, self.id).into_bytes()
    }

    /// Decode key from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| StorageError::InvalidKey(format!("Invalid UTF-8: {}", e)))?;

        let (namespace, id) = s
            .split_once(':')
            .ok_or_else(|| StorageError::InvalidKey(format!("Invalid document key: {}", s)))?;

        Ok(Self::new(namespace, id))
    }

    /// Prefix shared by every key in a namespace
    pub fn namespace_prefix(namespace: &str) -> Vec<u8> {
        format!("{}:", namespace).into_bytes()
    }
}

impl From<&ItemId> for DocumentKey {
    fn from(item: &ItemId) -> Self {
        Self::new(item.namespace.clone(), item.id.clone())
    }
}
