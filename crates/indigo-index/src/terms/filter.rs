//! Word filters turn one raw token into the terms stored in an index.

use crate::terms::stop_words::is_stop_word;

/// Shortest term kept by [`BasicWordFilter`], and the shortest ngram it emits.
pub const MIN_TERM_LENGTH: usize = 3;

/// Turns a raw word into zero or more index terms.
///
/// May drop the word entirely (stop words, noise) or expand it into several
/// terms (ngrams).
pub trait WordFilter: Send + Sync {
    fn process(&self, word: &str) -> Vec<String>;
}

/// Strip everything but ASCII letters and digits, then lowercase.
pub fn sanitize(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Filter covering the common cases.
///
/// ```text
/// Tomato Bo O'Neill her 150ml
///   sanitize:            tomato bo oneill her 150ml
///   too short:           tomato oneill her 150ml
///   starts with digit:   tomato oneill her
///   stop words (opt-in): tomato oneill
/// ```
///
/// Stop words are only dropped when indexing. A stop word such as `her` is
/// still a valid prefix of an indexed word (`herta`), so search input must be
/// checked with [`BasicWordFilter::include_in_search`] instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicWordFilter {
    filter_stop_words: bool,
    ngram: bool,
}

impl BasicWordFilter {
    pub fn new(filter_stop_words: bool) -> Self {
        Self {
            filter_stop_words,
            ngram: false,
        }
    }

    /// Also emit every prefix of at least [`MIN_TERM_LENGTH`] characters.
    pub fn with_ngrams(mut self, ngram: bool) -> Self {
        self.ngram = ngram;
        self
    }

    pub fn filters_stop_words(&self) -> bool {
        self.filter_stop_words
    }

    pub fn ngrams(&self) -> bool {
        self.ngram
    }

    /// Whether a sanitized word may be used as a search term.
    pub fn include_in_search(&self, word: &str) -> bool {
        word.len() >= MIN_TERM_LENGTH && word.starts_with(|c: char| c.is_ascii_alphabetic())
    }

    /// Whether a sanitized word should be stored in the index.
    pub fn include_in_index(&self, word: &str) -> bool {
        self.include_in_search(word) && !(self.filter_stop_words && is_stop_word(word))
    }
}

impl WordFilter for BasicWordFilter {
    fn process(&self, word: &str) -> Vec<String> {
        let word = sanitize(word);
        if !self.include_in_index(&word) {
            return Vec::new();
        }

        if !self.ngram {
            return vec![word];
        }

        // Sanitized words are ASCII, so byte slicing is safe
        (MIN_TERM_LENGTH..=word.len())
            .map(|len| word[..len].to_string())
            .collect()
    }
}
