//! Offline maintenance.
//!
//! Rebuilding touches far more documents than a single transaction may
//! write, so it runs as a series of transactions and is not atomic as a
//! whole. Run it while nothing else writes to the store.

use tracing::{info, warn};

use indigo_index::INDICES_NAMESPACE;
use indigo_storage::StoreListOps;
use indigo_types::{Entity, IndigoError};

use crate::entities::Indigo;

/// Configuration for index rebuild operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildConfig {
    /// Records (and, when clearing, index documents) per transaction.
    pub batch_size: usize,
    /// Delete every stored document of the configured indices first.
    /// Without this, terms of since-changed records stay in the index.
    pub clear_first: bool,
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            clear_first: false,
        }
    }
}

impl RebuildConfig {
    /// Set the batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set whether to clear indices first.
    pub fn with_clear_first(mut self, clear: bool) -> Self {
        self.clear_first = clear;
        self
    }
}

/// Progress tracking for rebuild operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildProgress {
    /// Records listed for re-indexing.
    pub total: usize,
    /// Records added back to the indices.
    pub indexed: usize,
    /// Records listed but gone by the time their batch was loaded.
    pub skipped: usize,
    /// Transactions committed while indexing.
    pub batches: usize,
    /// Index documents deleted before indexing.
    pub cleared: usize,
    /// Whether the rebuild completed.
    pub completed: bool,
}

/// Trait for receiving rebuild progress updates.
pub trait ProgressCallback: Send {
    /// Called after each committed batch, and once more on completion.
    fn on_progress(&self, progress: &RebuildProgress);
}

/// A no-op progress callback for when progress reporting isn't needed.
pub struct NoOpProgressCallback;

impl ProgressCallback for NoOpProgressCallback {
    fn on_progress(&self, _progress: &RebuildProgress) {}
}

/// A callback that logs progress at info level every `every` batches.
pub struct LoggingProgressCallback {
    every: usize,
}

impl LoggingProgressCallback {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl ProgressCallback for LoggingProgressCallback {
    fn on_progress(&self, progress: &RebuildProgress) {
        if progress.completed || progress.batches % self.every == 0 {
            info!(
                indexed = progress.indexed,
                total = progress.total,
                skipped = progress.skipped,
                batches = progress.batches,
                "Rebuild progress"
            );
        }
    }
}

/// Admin operations over an [`Indigo`] store.
pub struct IndigoAdmin<'a, T: Entity> {
    indigo: &'a Indigo<T>,
}

impl<'a, T: Entity> IndigoAdmin<'a, T> {
    pub fn new(indigo: &'a Indigo<T>) -> Self {
        Self { indigo }
    }

    /// Re-add every stored record to every index, `batch_size` records per
    /// transaction.
    pub fn regen_indices<P: ProgressCallback>(
        &self,
        config: &RebuildConfig,
        callback: &P,
    ) -> Result<RebuildProgress, IndigoError> {
        if config.batch_size == 0 {
            return Err(IndigoError::InvalidArgument(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        let mut progress = RebuildProgress::default();
        info!(namespace = self.indigo.namespace(), ?config, "Starting index rebuild");

        if config.clear_first {
            progress.cleared = self.clear_indices(config.batch_size)?;
        }

        let ids = self.indigo.list()?;
        progress.total = ids.len();

        for chunk in ids.chunks(config.batch_size) {
            let mut records = Vec::with_capacity(chunk.len());
            for (id, record) in chunk.iter().zip(self.indigo.get_many(chunk)?) {
                match record {
                    Some(mut record) => {
                        record.set_id(*id);
                        records.push(record);
                    }
                    None => {
                        warn!(id, "Record disappeared before re-indexing, skipping");
                        progress.skipped += 1;
                    }
                }
            }

            self.indigo.run_transaction(|txn| {
                for record in &records {
                    self.indigo.indices().add_entity(record, txn)?;
                }
                Ok(())
            })?;

            progress.indexed += records.len();
            progress.batches += 1;
            callback.on_progress(&progress);
        }

        progress.completed = true;
        callback.on_progress(&progress);

        info!(
            indexed = progress.indexed,
            skipped = progress.skipped,
            batches = progress.batches,
            cleared = progress.cleared,
            "Index rebuild complete"
        );
        Ok(progress)
    }

    /// Delete every segment and contents document of the configured indices.
    /// Returns the number of documents deleted.
    fn clear_indices(&self, batch_size: usize) -> Result<usize, IndigoError> {
        let indices = self.indigo.indices().indices();
        let keys: Vec<String> = self
            .indigo
            .store()
            .list(INDICES_NAMESPACE)?
            .into_iter()
            .filter(|key| indices.iter().any(|index| index.owns_key(key)))
            .collect();

        for chunk in keys.chunks(batch_size) {
            self.indigo.run_transaction(|txn| {
                for key in chunk {
                    txn.delete(INDICES_NAMESPACE, key)?;
                }
                Ok(())
            })?;
        }

        info!(deleted = keys.len(), "Cleared index documents");
        Ok(keys.len())
    }
}
