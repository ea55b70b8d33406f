//! Index behaviour against the in-memory store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use indigo_index::{
    BasicWordFilter, Index, IndexBuilder, PrefixWordSelector, INDICES_NAMESPACE,
};
use indigo_storage::{
    MemoryStore, Store, StorageError, StoreListOps, Transaction, TransactionWithCache,
};
use indigo_types::{IndigoError, TransactionSettings};

/// Raw transaction wrapper recording the keys read and written.
struct Recording<'a> {
    inner: &'a mut dyn Transaction,
    reads: Vec<Vec<String>>,
    writes: Vec<String>,
}

impl<'a> Recording<'a> {
    fn new(inner: &'a mut dyn Transaction) -> Self {
        Self {
            inner,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }
}

impl Transaction for Recording<'_> {
    fn get_many(
        &mut self,
        namespace: &str,
        ids: &[String],
    ) -> Result<Vec<Option<Vec<u8>>>, StorageError> {
        self.reads.push(ids.to_vec());
        self.inner.get_many(namespace, ids)
    }

    fn exists(&mut self, namespace: &str, id: &str) -> Result<bool, StorageError> {
        self.inner.exists(namespace, id)
    }

    fn put(&mut self, namespace: &str, id: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.writes.push(id.to_string());
        self.inner.put(namespace, id, value)
    }

    fn delete(&mut self, namespace: &str, id: &str) -> Result<(), StorageError> {
        self.inner.delete(namespace, id)
    }
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

fn ids(ids: &[u64]) -> HashSet<u64> {
    ids.iter().copied().collect()
}

fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

fn index(id: &str, store: &Arc<MemoryStore>) -> IndexBuilder<String> {
    IndexBuilder::new(id)
        .target(|s: &String| s.clone())
        .store(store.clone())
}

fn add(store: &MemoryStore, index: &Index<String>, text: &str, id: u64) {
    let words = words(text);
    store
        .transaction(&mut |txn| index.add(&words, id, txn))
        .unwrap();
}

fn remove(store: &MemoryStore, index: &Index<String>, id: u64) {
    store
        .transaction(&mut |txn| index.remove(id, txn))
        .unwrap();
}

#[test]
fn test_indexes_filtered_terms() {
    let store = memory_store();
    let names = index("names", &store)
        .word_filter(BasicWordFilter::new(true))
        .build()
        .unwrap();

    add(&store, &names, "Tomato Bo O'Neill her", 1);

    assert_eq!(names.get("tomato").unwrap(), ids(&[1]));
    assert_eq!(names.get("oneill").unwrap(), ids(&[1]));
    assert!(names.get("her").unwrap().is_empty());
    assert!(names.get("bo").unwrap().is_empty());
    assert_eq!(names.contents().unwrap().segments_of(1), vec!["on", "to"]);
}

#[test]
fn test_prefix_search() {
    let store = memory_store();
    let animals = index("animals", &store)
        .word_selector(PrefixWordSelector)
        .build()
        .unwrap();

    add(&store, &animals, "goat", 7);
    add(&store, &animals, "goose", 22);
    add(&store, &animals, "gopher", 3);
    add(&store, &animals, "gopher", 5);

    assert_eq!(animals.get("go").unwrap(), ids(&[3, 5, 7, 22]));
    assert_eq!(animals.get("goo").unwrap(), ids(&[22]));
    assert!(animals.get("ca").unwrap().is_empty());
}

#[test]
fn test_search_term_too_short() {
    let store = memory_store();
    let names = index("names", &store).build().unwrap();

    let err = names.get("p").unwrap_err();
    assert!(matches!(err, IndigoError::InvalidArgument(_)));
    assert!(names.get("").unwrap_err().is_invalid_argument());
    assert!(names.get("o'neill").unwrap_err().is_invalid_argument());
}

#[test]
fn test_ngrams_load_and_write_segment_once() {
    let store = memory_store();
    let fruit = index("fruit", &store)
        .word_filter(BasicWordFilter::new(false).with_ngrams(true))
        .build()
        .unwrap();

    let words = words("Tomato tomato");
    let mut reads = Vec::new();
    let mut writes = Vec::new();
    store
        .transaction(&mut |txn| {
            let mut recording = Recording::new(txn);
            fruit.add(&words, 1, &mut recording)?;
            reads = recording.reads.clone();
            writes = recording.writes.clone();
            Ok(())
        })
        .unwrap();

    assert_eq!(reads, vec![keys(&["fruit-to"]), keys(&["fruit-contents"])]);
    assert_eq!(writes, keys(&["fruit-to", "fruit-contents"]));

    for term in ["tom", "toma", "tomat", "tomato"] {
        assert_eq!(fruit.get(term).unwrap(), ids(&[1]), "{}", term);
    }
    assert!(fruit.get("to").unwrap().is_empty());
}

#[test]
fn test_add_is_idempotent() {
    let store = memory_store();
    let names = index("names", &store).build().unwrap();

    add(&store, &names, "panther tiger", 4);
    let once = (names.get("panther").unwrap(), names.contents().unwrap());
    add(&store, &names, "panther tiger", 4);
    let twice = (names.get("panther").unwrap(), names.contents().unwrap());

    assert_eq!(once, twice);
    assert_eq!(twice.0, ids(&[4]));
}

#[test]
fn test_remove_is_exact_and_total() {
    let store = memory_store();
    let exact = index("exact", &store).build().unwrap();
    let prefix = index("prefix", &store)
        .word_filter(BasicWordFilter::new(false).with_ngrams(true))
        .word_selector(PrefixWordSelector)
        .build()
        .unwrap();

    for index in [&exact, &prefix] {
        add(&store, index, "panther", 7);
        add(&store, index, "pancake", 8);
        remove(&store, index, 7);
    }

    assert!(!prefix.get("pan").unwrap().contains(&7));
    assert_eq!(prefix.get("pan").unwrap(), ids(&[8]));
    assert!(exact.get("panther").unwrap().is_empty());
    assert!(exact.contents().unwrap().get(7).is_none());

    // Nothing 7 contributed survives in the segment
    let segment = prefix.segment("pa").unwrap();
    assert!(!segment.contains_id(7));
    let mut terms: Vec<&str> = segment.words().collect();
    terms.sort();
    assert_eq!(terms, vec!["pan", "panc", "panca", "pancak", "pancake"]);
}

#[test]
fn test_remove_last_member_empties_segment() {
    let store = memory_store();
    let names = index("names", &store).build().unwrap();

    add(&store, &names, "panther", 7);
    remove(&store, &names, 7);

    assert!(names.segment("pa").unwrap().is_empty());
    // Segments are pruned, not deleted
    assert!(store.list(INDICES_NAMESPACE).unwrap().contains("names-pa"));
}

#[test]
fn test_remove_unindexed_record_only_touches_contents() {
    let store = memory_store();
    let names = index("names", &store).build().unwrap();
    add(&store, &names, "panther", 7);

    let mut reads = Vec::new();
    let mut writes = Vec::new();
    store
        .transaction(&mut |txn| {
            let mut recording = Recording::new(txn);
            names.remove(99, &mut recording)?;
            reads = recording.reads.clone();
            writes = recording.writes.clone();
            Ok(())
        })
        .unwrap();

    assert_eq!(reads, vec![keys(&["names-contents"])]);
    assert_eq!(writes, keys(&["names-contents"]));
    assert_eq!(names.get("panther").unwrap(), ids(&[7]));
}

#[test]
fn test_update_needs_cache_under_document_store_limits() {
    let store = Arc::new(MemoryStore::with_settings(
        TransactionSettings::document_store(),
    ));
    let names = index("names", &store).build().unwrap();
    add(&store, &names, "alpha", 1);

    // Remove then add rereads contents after writing it
    let beta = words("beta");
    let err = store
        .transaction(&mut |txn| {
            names.remove(1, txn)?;
            names.add(&beta, 1, txn)
        })
        .unwrap_err();
    assert!(matches!(err, IndigoError::Storage(_)));

    store
        .transaction(&mut |txn| {
            let mut cached = TransactionWithCache::new(txn);
            names.remove(1, &mut cached)?;
            names.add(&beta, 1, &mut cached)
        })
        .unwrap();

    assert!(names.get("alpha").unwrap().is_empty());
    assert_eq!(names.get("beta").unwrap(), ids(&[1]));
}

#[test]
fn test_contents_mirrors_segments_under_random_updates() {
    const POOL: &[&str] = &[
        "tiger", "tigress", "panther", "pancake", "goat", "goose", "gopher", "otter", "oneill",
        "tomato",
    ];

    let store = memory_store();
    let animals = index("animals", &store).build().unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let mut model: HashMap<u64, HashSet<&str>> = HashMap::new();

    for _ in 0..200 {
        let id = rng.random_range(1..=8u64);
        let op = rng.random_range(0..3);

        if op == 1 {
            remove(&store, &animals, id);
            model.remove(&id);
            continue;
        }

        let count = rng.random_range(1..=3);
        let chosen: Vec<&str> = (0..count)
            .map(|_| POOL[rng.random_range(0..POOL.len())])
            .collect();
        let text = chosen.join(" ");

        if op == 2 {
            // Replace, the way an update does
            let words = words(&text);
            store
                .transaction(&mut |txn| {
                    let mut cached = TransactionWithCache::new(txn);
                    animals.remove(id, &mut cached)?;
                    animals.add(&words, id, &mut cached)
                })
                .unwrap();
            model.remove(&id);
        } else {
            add(&store, &animals, &text, id);
        }
        model.entry(id).or_default().extend(chosen);
    }

    // Segment membership from a full scan
    let mut scanned: HashMap<u64, HashSet<String>> = HashMap::new();
    for key in store.list(INDICES_NAMESPACE).unwrap() {
        if !animals.owns_key(&key) || key == animals.contents_key() {
            continue;
        }
        let segment_id = key.trim_start_matches("animals-");
        let data = animals.segment(segment_id).unwrap();
        for id in 1..=8 {
            if data.contains_id(id) {
                scanned.entry(id).or_default().insert(segment_id.to_string());
            }
        }
    }

    let contents = animals.contents().unwrap();
    for id in 1..=8 {
        let expected: HashSet<String> = scanned.remove(&id).unwrap_or_default();
        let actual: HashSet<String> = contents.segments_of(id).into_iter().collect();
        assert_eq!(actual, expected, "contents of {}", id);
    }
    for id in contents.ids() {
        assert!(!contents.segments_of(id).is_empty());
    }

    for word in POOL {
        let expected: HashSet<u64> = model
            .iter()
            .filter(|(_, words)| words.contains(word))
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(animals.get(word).unwrap(), expected, "{}", word);
    }
}
