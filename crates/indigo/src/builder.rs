//! Builder for [`Indigo`].

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use indigo_index::{IndexBuilder, IndicesManager};
use indigo_storage::Store;
use indigo_types::{validate_id, Entity, IndigoError};

use crate::entities::Indigo;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "entities";

/// Assembles an [`Indigo`] store. Every index is built against the store
/// given here.
pub struct IndigoBuilder<T: Entity> {
    namespace: String,
    store: Option<Arc<dyn Store>>,
    indices: Vec<IndexBuilder<T>>,
}

impl<T: Entity> Default for IndigoBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> IndigoBuilder<T> {
    pub fn new() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            store: None,
            indices: Vec::new(),
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn index(mut self, index: IndexBuilder<T>) -> Self {
        self.indices.push(index);
        self
    }

    pub fn build(self) -> Result<Indigo<T>, IndigoError> {
        validate_id(&self.namespace)?;
        let store = self
            .store
            .ok_or_else(|| IndigoError::InvalidArgument("No store specified".to_string()))?;

        let mut seen = HashSet::new();
        let mut indices = Vec::with_capacity(self.indices.len());
        for builder in self.indices {
            let index = builder.store(store.clone()).build()?;
            if !seen.insert(index.id().to_string()) {
                return Err(IndigoError::InvalidArgument(format!(
                    "Duplicate index id {}",
                    index.id()
                )));
            }
            indices.push(index);
        }

        info!(namespace = %self.namespace, indices = indices.len(), "Built record store");
        Ok(Indigo::new(self.namespace, store, IndicesManager::new(indices)))
    }
}
