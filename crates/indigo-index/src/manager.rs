//! Fans record updates and searches out to every configured index.

use std::collections::HashSet;

use tracing::trace;

use indigo_storage::Transaction;
use indigo_types::{Entity, IndigoError};

use crate::index::Index;
use crate::terms::tokenize;

pub struct IndicesManager<T> {
    indices: Vec<Index<T>>,
}

impl<T: Entity> IndicesManager<T> {
    pub fn new(indices: Vec<Index<T>>) -> Self {
        Self { indices }
    }

    pub fn indices(&self) -> &[Index<T>] {
        &self.indices
    }

    pub fn index(&self, index_id: &str) -> Result<&Index<T>, IndigoError> {
        self.indices
            .iter()
            .find(|index| index.id() == index_id)
            .ok_or_else(|| IndigoError::NotFound(format!("Index {} doesn't exist", index_id)))
    }

    pub fn search(&self, index_id: &str, word: &str) -> Result<HashSet<u64>, IndigoError> {
        self.index(index_id)?.get(word)
    }

    /// Add `entity` to every index. The entity must already have an id.
    pub fn add_entity(&self, entity: &T, txn: &mut dyn Transaction) -> Result<(), IndigoError> {
        let id = entity
            .id()
            .ok_or_else(|| IndigoError::InvalidArgument("Entity has no id".to_string()))?;

        for index in &self.indices {
            let words = tokenize(&index.text_of(entity));
            trace!(index_id = index.id(), id, words = words.len(), "Indexing entity");
            index.add(&words, id, txn)?;
        }
        Ok(())
    }

    pub fn remove_entity(&self, id: u64, txn: &mut dyn Transaction) -> Result<(), IndigoError> {
        for index in &self.indices {
            index.remove(id, txn)?;
        }
        Ok(())
    }
}
