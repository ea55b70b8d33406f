#![allow(dead_code)]

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use indigo::{BasicWordFilter, Entity, IndexBuilder, Indigo, IndigoBuilder, MemoryStore, Store};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fruit {
    pub id: Option<u64>,
    pub name: String,
    pub notes: String,
}

impl Fruit {
    pub fn new(name: &str, notes: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            notes: notes.to_string(),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

impl Entity for Fruit {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}

/// `names`: ngrams, stop words dropped. `notes`: exact words.
pub fn fruit_store(store: Arc<dyn Store>) -> Indigo<Fruit> {
    IndigoBuilder::new()
        .store(store)
        .index(
            IndexBuilder::new("names")
                .target(|f: &Fruit| f.name.clone())
                .word_filter(BasicWordFilter::new(true).with_ngrams(true)),
        )
        .index(IndexBuilder::new("notes").target(|f: &Fruit| f.notes.clone()))
        .build()
        .unwrap()
}

pub fn memory_fruit_store() -> (Indigo<Fruit>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (fruit_store(store.clone()), store)
}
