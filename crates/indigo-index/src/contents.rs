//! Reverse index: record id to the segments the record appears in.
//!
//! Lets removal load only the segments a record touches. Must always equal
//! the segment membership it describes.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Stored as a JSON object keyed by the record id as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contents {
    entries: HashMap<u64, HashSet<String>>,
}

impl Contents {
    /// Segment ids containing `id`; `None` if the record isn't indexed.
    pub fn get(&self, id: u64) -> Option<&HashSet<String>> {
        self.entries.get(&id)
    }

    /// Segment ids containing `id`, sorted, empty if the record isn't indexed.
    pub fn segments_of(&self, id: u64) -> Vec<String> {
        let mut segments: Vec<String> = self
            .entries
            .get(&id)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default();
        segments.sort();
        segments
    }

    pub fn add(&mut self, id: u64, segment_id: &str) {
        self.entries
            .entry(id)
            .or_default()
            .insert(segment_id.to_string());
    }

    pub fn remove(&mut self, id: u64) {
        self.entries.remove(&id);
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut contents = Contents::default();
        contents.add(4, "to");
        contents.add(4, "on");
        contents.add(4, "to");
        contents.add(9, "to");

        assert_eq!(contents.segments_of(4), vec!["on", "to"]);
        assert_eq!(contents.get(9).map(HashSet::len), Some(1));

        contents.remove(4);
        assert!(contents.get(4).is_none());
        assert!(contents.segments_of(4).is_empty());
        assert_eq!(contents.len(), 1);
    }

    #[test]
    fn test_serializes_with_string_keys() {
        let mut contents = Contents::default();
        contents.add(12, "pa");
        let json = serde_json::to_value(&contents).unwrap();
        assert_eq!(json, serde_json::json!({ "12": ["pa"] }));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut contents = Contents::default();
        contents.add(1, "to");
        contents.add(1, "on");
        contents.add(300, "pa");

        let json = serde_json::to_string(&contents).unwrap();
        let decoded: Contents = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, contents);
        assert_eq!(decoded.segments_of(1), vec!["on", "to"]);
    }
}
