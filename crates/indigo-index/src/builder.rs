//! Builder for [`Index`].

use std::sync::Arc;

use indigo_storage::Store;
use indigo_types::{validate_id, IndexSettings, IndigoError, SelectorKind};

use crate::index::{Index, IndexTarget};
use crate::terms::{BasicWordFilter, ExactWordSelector, PrefixWordSelector, WordFilter, WordSelector};

/// Assembles an [`Index`].
///
/// Defaults: [`BasicWordFilter`] without stop words or ngrams, and
/// [`ExactWordSelector`]. A target and a store are required.
pub struct IndexBuilder<T> {
    id: String,
    target: Option<IndexTarget<T>>,
    filter: Option<Box<dyn WordFilter>>,
    selector: Option<Box<dyn WordSelector>>,
    store: Option<Arc<dyn Store>>,
}

impl<T> IndexBuilder<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target: None,
            filter: None,
            selector: None,
            store: None,
        }
    }

    /// Builder configured from settings. The target still has to be set,
    /// since it depends on the record type.
    pub fn from_settings(settings: &IndexSettings) -> Self {
        let filter = BasicWordFilter::new(settings.stop_words).with_ngrams(settings.ngrams);
        let builder = Self::new(settings.id.clone()).word_filter(filter);
        match settings.selector {
            SelectorKind::Exact => builder.word_selector(ExactWordSelector),
            SelectorKind::Prefix => builder.word_selector(PrefixWordSelector),
        }
    }

    pub fn target(mut self, target: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.target = Some(Arc::new(target));
        self
    }

    pub fn word_filter(mut self, filter: impl WordFilter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn word_selector(mut self, selector: impl WordSelector + 'static) -> Self {
        self.selector = Some(Box::new(selector));
        self
    }

    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<Index<T>, IndigoError> {
        validate_id(&self.id)?;

        let store = self
            .store
            .ok_or_else(|| IndigoError::InvalidArgument("No store specified".to_string()))?;
        let target = self
            .target
            .ok_or_else(|| IndigoError::InvalidArgument("No target specified".to_string()))?;

        Ok(Index::new(
            self.id,
            target,
            self.filter
                .unwrap_or_else(|| Box::new(BasicWordFilter::default())),
            self.selector.unwrap_or_else(|| Box::new(ExactWordSelector)),
            store,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indigo_storage::MemoryStore;

    fn store() -> Arc<dyn Store> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_build() {
        let index = IndexBuilder::<String>::new("names")
            .target(|s: &String| s.clone())
            .store(store())
            .build()
            .unwrap();
        assert_eq!(index.id(), "names");
        assert_eq!(index.text_of(&"Tomato".to_string()), "Tomato");
    }

    #[test]
    fn test_requires_store() {
        let err = IndexBuilder::<String>::new("names")
            .target(|s: &String| s.clone())
            .build()
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_requires_target() {
        let err = IndexBuilder::<String>::new("names")
            .store(store())
            .build()
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_rejects_invalid_id() {
        let err = IndexBuilder::<String>::new("first names")
            .target(|s: &String| s.clone())
            .store(store())
            .build()
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_from_settings() {
        let settings = IndexSettings {
            id: "names".to_string(),
            field: "name".to_string(),
            selector: SelectorKind::Prefix,
            stop_words: true,
            ngrams: false,
        };
        let index = IndexBuilder::<String>::from_settings(&settings)
            .target(|s: &String| s.clone())
            .store(store())
            .build()
            .unwrap();
        assert_eq!(index.id(), "names");
        assert_eq!(index.contents_key(), "names-contents");
        assert_eq!(index.segment_key("to"), "names-to");
    }
}
