//! End-to-end test infrastructure for Indigo.
//!
//! Provides a shared TestHarness that owns a RocksDB store in a temporary
//! directory and a small recipe catalogue to index.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use indigo::{
    BasicWordFilter, Entity, IndexBuilder, Indigo, IndigoBuilder, PrefixWordSelector, RocksStore,
    TransactionSettings,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Option<u64>,
    pub title: String,
    pub ingredients: Vec<String>,
}

impl Recipe {
    pub fn new(title: &str, ingredients: &[&str]) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Entity for Recipe {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}

/// Shared test harness for E2E tests.
///
/// Dropping the store and calling [`TestHarness::reopen`] opens the same
/// database again.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    pub settings: TransactionSettings,
    pub store: Arc<RocksStore>,
}

impl TestHarness {
    /// Create a new test harness with unlimited transactions.
    pub fn new() -> Self {
        Self::with_settings(TransactionSettings::default())
    }

    pub fn with_settings(settings: TransactionSettings) -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            RocksStore::open(temp_dir.path(), settings.clone()).expect("Failed to open test storage"),
        );
        Self {
            _temp_dir: temp_dir,
            settings,
            store,
        }
    }

    /// Close and reopen the database. Panics if another handle to the
    /// store is still alive.
    pub fn reopen(self) -> Self {
        let Self {
            _temp_dir,
            settings,
            store,
        } = self;
        drop(Arc::into_inner(store).expect("Store still shared"));
        let store = Arc::new(
            RocksStore::open(_temp_dir.path(), settings.clone()).expect("Failed to reopen storage"),
        );
        Self {
            _temp_dir,
            settings,
            store,
        }
    }

    /// Recipe store over the harness database.
    ///
    /// `titles`: prefix search, stop words dropped.
    /// `ingredients`: ngram search over every ingredient.
    pub fn recipes(&self) -> Indigo<Recipe> {
        IndigoBuilder::new()
            .namespace("recipes")
            .store(self.store.clone())
            .index(
                IndexBuilder::new("titles")
                    .target(|r: &Recipe| r.title.clone())
                    .word_filter(BasicWordFilter::new(true))
                    .word_selector(PrefixWordSelector),
            )
            .index(
                IndexBuilder::new("ingredients")
                    .target(|r: &Recipe| r.ingredients.join(" "))
                    .word_filter(BasicWordFilter::new(false).with_ngrams(true)),
            )
            .build()
            .expect("Failed to build recipe store")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A handful of recipes with overlapping words.
pub fn sample_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new("Tomato Soup", &["tomato", "onion", "garlic", "basil"]),
        Recipe::new("Tomatillo Salsa", &["tomatillo", "onion", "chilli", "lime"]),
        Recipe::new("Garlic Bread", &["bread", "garlic", "butter"]),
        Recipe::new("Onion Tart", &["onion", "pastry", "cream", "thyme"]),
        Recipe::new("Basil Pesto", &["basil", "garlic", "pine nuts", "parmesan"]),
    ]
}
