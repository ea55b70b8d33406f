//! English stop words.
//!
//! Only words of at least three characters are listed; shorter ones never
//! reach the stop word check.

const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "and", "any", "are",
    "because", "been", "before", "being", "below", "between", "both", "but", "can", "could",
    "did", "does", "doing", "down", "during", "each", "eight", "few", "five", "for", "four",
    "from", "further", "had", "has", "have", "having", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "into", "its", "itself", "just", "more", "most", "nine",
    "nor", "not", "now", "off", "once", "one", "only", "other", "our", "ours", "ourselves",
    "out", "over", "own", "same", "seven", "she", "should", "six", "some", "such", "ten",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "three", "through", "too", "two", "under", "until", "very",
    "was", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "would", "you", "your", "yours", "yourself", "yourselves",
];

/// `word` must already be sanitized (lowercase).
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}
