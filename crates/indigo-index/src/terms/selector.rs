//! Word selectors decide which stored terms answer a search term.

use crate::segment::IndexSegmentData;

pub trait WordSelector: Send + Sync {
    /// Terms of `data` to union over for `search_term`.
    fn select(&self, search_term: &str, data: &IndexSegmentData) -> Vec<String>;
}

/// Looks up the search term itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactWordSelector;

impl WordSelector for ExactWordSelector {
    fn select(&self, search_term: &str, _data: &IndexSegmentData) -> Vec<String> {
        vec![search_term.to_string()]
    }
}

/// Looks up every term of the segment starting with the search term.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixWordSelector;

impl WordSelector for PrefixWordSelector {
    fn select(&self, search_term: &str, data: &IndexSegmentData) -> Vec<String> {
        data.words()
            .filter(|word| word.starts_with(search_term))
            .map(str::to_string)
            .collect()
    }
}
