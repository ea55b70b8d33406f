//! The record contract.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// An application-defined record that the store persists and indexes.
///
/// The id is `None` until the record is first stored; the store assigns it
/// and it never changes afterwards.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync {
    fn id(&self) -> Option<u64>;

    fn set_id(&mut self, id: u64);
}
