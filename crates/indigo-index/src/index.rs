//! A named index over one text field of a record type.
//!
//! Example, with ngrams:
//!
//! ```text
//! tiger -> 4      panther -> 60, 43
//! tige  -> 4      panthe  -> 60, 43
//! tig   -> 4      ...
//!                 pan     -> 60, 43
//! ```
//!
//! Terms are spread over segments (`{index}-{prefix}`), and a contents
//! document (`{index}-contents`) maps each record to the segments it is in.
//! Both are loaded from the transaction at the start of every operation and
//! written back at the end; nothing is kept between operations.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use indigo_storage::{Store, Transaction, TypedStoreReads, TypedTransaction};
use indigo_types::IndigoError;

use crate::contents::Contents;
use crate::segment::{segment_id, IndexSegment, IndexSegmentData, SEGMENT_ID_LENGTH};
use crate::terms::{WordFilter, WordSelector};

/// Namespace holding every index segment and contents document.
pub const INDICES_NAMESPACE: &str = "indices";

/// Extracts the indexed text from a record.
pub type IndexTarget<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

pub struct Index<T> {
    id: String,
    target: IndexTarget<T>,
    filter: Box<dyn WordFilter>,
    selector: Box<dyn WordSelector>,
    store: Arc<dyn Store>,
}

impl<T> Index<T> {
    pub(crate) fn new(
        id: String,
        target: IndexTarget<T>,
        filter: Box<dyn WordFilter>,
        selector: Box<dyn WordSelector>,
        store: Arc<dyn Store>,
    ) -> Self {
        Self {
            id,
            target,
            filter,
            selector,
            store,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Text of `entity` this index covers.
    pub fn text_of(&self, entity: &T) -> String {
        (self.target)(entity)
    }

    /// Records matching `search_term`.
    ///
    /// Reads the segment outside any transaction. The term is used as is, so
    /// callers should pass it through the same sanitizing as indexed words.
    pub fn get(&self, search_term: &str) -> Result<HashSet<u64>, IndigoError> {
        let segment_id = segment_id(search_term)?;
        let data = self.segment(&segment_id)?;
        Ok(IndexSegment::new(data, self.selector.as_ref()).get(search_term))
    }

    /// Index `words` for record `id`.
    ///
    /// Each segment is loaded and written once however many terms fall into it.
    pub fn add(
        &self,
        words: &[String],
        id: u64,
        txn: &mut dyn Transaction,
    ) -> Result<(), IndigoError> {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();
        let mut segment_ids = Vec::new();
        for term in words.iter().flat_map(|word| self.filter.process(word)) {
            if !seen.insert(term.clone()) {
                continue;
            }
            let segment_id = segment_id(&term)?;
            if !segment_ids.contains(&segment_id) {
                segment_ids.push(segment_id.clone());
            }
            terms.push((term, segment_id));
        }

        let loaded = self.load_segments(txn, &segment_ids)?;
        let mut segments: HashMap<String, IndexSegmentData> =
            segment_ids.iter().cloned().zip(loaded).collect();
        let mut contents = self.load_contents(txn)?;

        for (term, segment_id) in &terms {
            if let Some(data) = segments.get_mut(segment_id) {
                data.add(term, id);
            }
            contents.add(id, segment_id);
        }

        for segment_id in &segment_ids {
            if let Some(data) = segments.get(segment_id) {
                txn.put_as(INDICES_NAMESPACE, &self.segment_key(segment_id), data)?;
            }
        }
        txn.put_as(INDICES_NAMESPACE, &self.contents_key(), &contents)?;

        debug!(
            index_id = %self.id,
            id,
            terms = terms.len(),
            segments = segment_ids.len(),
            "Added record to index"
        );
        Ok(())
    }

    /// Remove record `id` from every segment it appears in.
    ///
    /// A record that was never indexed loads no segments; contents is still
    /// written.
    pub fn remove(&self, id: u64, txn: &mut dyn Transaction) -> Result<(), IndigoError> {
        let mut contents = self.load_contents(txn)?;
        let segment_ids = contents.segments_of(id);
        let segments = self.load_segments(txn, &segment_ids)?;

        for (segment_id, mut data) in segment_ids.iter().zip(segments) {
            data.remove(id);
            txn.put_as(INDICES_NAMESPACE, &self.segment_key(segment_id), &data)?;
        }

        contents.remove(id);
        txn.put_as(INDICES_NAMESPACE, &self.contents_key(), &contents)?;

        debug!(
            index_id = %self.id,
            id,
            segments = segment_ids.len(),
            "Removed record from index"
        );
        Ok(())
    }

    /// Stored data of one segment, empty if it was never written.
    pub fn segment(&self, segment_id: &str) -> Result<IndexSegmentData, IndigoError> {
        Ok(self
            .store
            .get_as::<IndexSegmentData>(INDICES_NAMESPACE, &self.segment_key(segment_id))?
            .unwrap_or_default())
    }

    /// Stored contents, empty if the index was never written.
    pub fn contents(&self) -> Result<Contents, IndigoError> {
        Ok(self
            .store
            .get_as::<Contents>(INDICES_NAMESPACE, &self.contents_key())?
            .unwrap_or_default())
    }

    /// Store key of a segment of this index.
    pub fn segment_key(&self, segment_id: &str) -> String {
        format!("{}-{}", self.id, segment_id)
    }

    /// Store key of this index's contents.
    pub fn contents_key(&self) -> String {
        format!("{}-contents", self.id)
    }

    /// Whether a key of the indices namespace belongs to this index.
    pub fn owns_key(&self, key: &str) -> bool {
        key.strip_prefix(self.id.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|rest| rest == "contents" || rest.chars().count() == SEGMENT_ID_LENGTH)
    }

    fn load_segments(
        &self,
        txn: &mut dyn Transaction,
        segment_ids: &[String],
    ) -> Result<Vec<IndexSegmentData>, IndigoError> {
        if segment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = segment_ids
            .iter()
            .map(|segment_id| self.segment_key(segment_id))
            .collect();

        Ok(txn
            .get_many_as::<IndexSegmentData>(INDICES_NAMESPACE, &keys)?
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect())
    }

    fn load_contents(&self, txn: &mut dyn Transaction) -> Result<Contents, IndigoError> {
        Ok(txn
            .get_as::<Contents>(INDICES_NAMESPACE, &self.contents_key())?
            .unwrap_or_default())
    }
}

impl<T> std::fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index").field("id", &self.id).finish()
    }
}
