//! Term pipeline: tokenizing, filtering and selecting index terms.

pub mod filter;
pub mod selector;
pub mod stop_words;
pub mod tokenizer;

pub use filter::{sanitize, BasicWordFilter, WordFilter, MIN_TERM_LENGTH};
pub use selector::{ExactWordSelector, PrefixWordSelector, WordSelector};
pub use stop_words::is_stop_word;
pub use tokenizer::tokenize;
