//! Index segments.
//!
//! An index is sharded by the first [`SEGMENT_ID_LENGTH`] characters of each
//! term, so a lookup or update only ever touches one small document per
//! prefix instead of the whole index.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use indigo_types::{validate_id, IndigoError};

use crate::terms::WordSelector;

/// Number of leading term characters forming the segment id.
pub const SEGMENT_ID_LENGTH: usize = 2;

/// Segment id for a term, validated as a store id.
pub fn segment_id(term: &str) -> Result<String, IndigoError> {
    let id: String = term.chars().take(SEGMENT_ID_LENGTH).collect();
    if id.chars().count() < SEGMENT_ID_LENGTH {
        return Err(IndigoError::InvalidArgument(format!(
            "Search term {:?} is shorter than {} characters",
            term, SEGMENT_ID_LENGTH
        )));
    }
    validate_id(&id)?;
    Ok(id)
}

/// Term to record ids, for one segment.
///
/// A term never maps to an empty set. Stored as a JSON object of arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexSegmentData {
    words: HashMap<String, HashSet<u64>>,
}

impl IndexSegmentData {
    /// Records containing `term`; empty if the term isn't in the segment.
    pub fn get(&self, term: &str) -> HashSet<u64> {
        self.words.get(term).cloned().unwrap_or_default()
    }

    pub fn add(&mut self, term: &str, id: u64) {
        self.words.entry(term.to_string()).or_default().insert(id);
    }

    /// Remove `id` from every term, dropping terms left with no records.
    pub fn remove(&mut self, id: u64) {
        self.words.retain(|_, ids| {
            ids.remove(&id);
            !ids.is_empty()
        });
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    /// Whether `id` appears under any term.
    pub fn contains_id(&self, id: u64) -> bool {
        self.words.values().any(|ids| ids.contains(&id))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Segment data paired with the selector that answers queries against it.
pub struct IndexSegment<'a> {
    data: IndexSegmentData,
    selector: &'a dyn WordSelector,
}

impl<'a> IndexSegment<'a> {
    pub fn new(data: IndexSegmentData, selector: &'a dyn WordSelector) -> Self {
        Self { data, selector }
    }

    /// Union of the records of every term selected for `search_term`.
    pub fn get(&self, search_term: &str) -> HashSet<u64> {
        self.selector
            .select(search_term, &self.data)
            .iter()
            .flat_map(|term| self.data.get(term))
            .collect()
    }

    pub fn data(&self) -> &IndexSegmentData {
        &self.data
    }
}
