//! Store identifiers.
//!
//! Ids end up in file names, RocksDB keys and hosted document ids, so every
//! fragment must match `[a-zA-Z0-9_-]+` before it reaches a backend.

use std::fmt;

use crate::error::IndigoError;

/// Check that `id` is a valid store id, returning it for chaining.
pub fn validate_id(id: &str) -> Result<&str, IndigoError> {
    if is_valid_id(id) {
        Ok(id)
    } else {
        Err(IndigoError::InvalidArgument(format!("Invalid id {:?}", id)))
    }
}

/// True if `id` is non-empty and only contains `[a-zA-Z0-9_-]`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// True if `id` looks like a record id (`[0-9]+`).
pub fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// Store id for a numeric record id.
pub fn id_as_string(id: u64) -> String {
    id.to_string()
}

/// Store ids for a list of record ids, in the same order.
pub fn ids_as_strings(ids: &[u64]) -> Vec<String> {
    ids.iter().copied().map(id_as_string).collect()
}

/// A fully qualified item in the store: namespace plus id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId {
    pub namespace: String,
    pub id: String,
}

impl ItemId {
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.id)
    }
}
