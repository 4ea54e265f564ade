//! Key-indexed ordered container
//!
//!     `IndexedSeq` is a mixture of a list and a dictionary: a mutable ordered
//!     sequence where every element also carries a derived key, and elements can
//!     be looked up by key without a linear scan. Insertion order is preserved;
//!     key lookup returns the lowest current index (first match) or every index
//!     in original relative order.
//!
//!     The directory maps each key to the sorted list of positions currently
//!     holding that key. Mutations keep it in sync: inserting at `i` shifts every
//!     registered position `>= i` up by one before registering `i`; removing `i`
//!     unregisters it and shifts every position `> i` down by one.
//!
//!     Keys are supplied by the caller at mutation time. The tree stores children
//!     here, keying text chunks on the `Text` sentinel and tags on their name.

use std::collections::BTreeMap;

/// Derived key of a sequence element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Sentinel key shared by all text elements.
    Text,
    /// Tag elements key on their name.
    Name(String),
}

impl Key {
    pub fn name(name: impl Into<String>) -> Self {
        Key::Name(name.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Entry<T> {
    value: T,
    key: Key,
}

/// Ordered sequence with O(log n) first-match lookup by derived key.
#[derive(Debug, Clone)]
pub struct IndexedSeq<T> {
    entries: Vec<Entry<T>>,
    directory: BTreeMap<Key, Vec<usize>>,
}

impl<T> Default for IndexedSeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IndexedSeq<T> {
    pub fn new() -> Self {
        IndexedSeq {
            entries: Vec::new(),
            directory: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|e| &e.value)
    }

    pub fn key_at(&self, index: usize) -> Option<&Key> {
        self.entries.get(index).map(|e| &e.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }

    /// Insert `value` at `index` under `key`, shifting later positions up.
    pub fn insert(&mut self, index: usize, value: T, key: Key) {
        for places in self.directory.values_mut() {
            for place in places.iter_mut() {
                if *place >= index {
                    *place += 1;
                }
            }
        }
        self.entries.insert(index, Entry { value, key: key.clone() });
        self.register(index, key);
    }

    pub fn push(&mut self, value: T, key: Key) {
        let index = self.entries.len();
        self.insert(index, value, key);
    }

    /// Remove the element at `index`, shifting later positions down.
    pub fn remove(&mut self, index: usize) -> T {
        let entry = self.entries.remove(index);
        self.unregister(index, &entry.key);
        for places in self.directory.values_mut() {
            for place in places.iter_mut() {
                if *place > index {
                    *place -= 1;
                }
            }
        }
        entry.value
    }

    /// Replace the element at `index` in place, re-keying it.
    pub fn set(&mut self, index: usize, value: T, key: Key) -> T {
        let old = std::mem::replace(
            &mut self.entries[index],
            Entry { value, key: key.clone() },
        );
        self.unregister(index, &old.key);
        self.register(index, key);
        old.value
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.directory.clear();
    }

    /// Lowest current index holding `key`.
    pub fn first_index(&self, key: &Key) -> Option<usize> {
        self.directory.get(key).and_then(|p| p.first().copied())
    }

    /// Every current index holding `key`, in original relative order.
    pub fn indexes(&self, key: &Key) -> Vec<usize> {
        self.directory.get(key).cloned().unwrap_or_default()
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.directory.get(key).is_some_and(|p| !p.is_empty())
    }

    pub fn find(&self, key: &Key) -> Option<&T> {
        self.first_index(key).and_then(|i| self.get(i))
    }

    pub fn find_all(&self, key: &Key) -> Vec<&T> {
        self.indexes(key)
            .into_iter()
            .filter_map(|i| self.get(i))
            .collect()
    }

    /// Every element's index must be registered under its key.
    pub fn is_consistent(&self) -> bool {
        if self.directory.values().map(Vec::len).sum::<usize>() != self.entries.len() {
            return false;
        }
        self.entries
            .iter()
            .enumerate()
            .all(|(i, e)| self.indexes(&e.key).contains(&i))
    }

    fn register(&mut self, index: usize, key: Key) {
        let places = self.directory.entry(key).or_default();
        let at = places.partition_point(|&p| p < index);
        places.insert(at, index);
    }

    fn unregister(&mut self, index: usize, key: &Key) {
        if let Some(places) = self.directory.get_mut(key) {
            if let Ok(at) = places.binary_search(&index) {
                places.remove(at);
            }
            if places.is_empty() {
                self.directory.remove(key);
            }
        }
    }
}

impl<T: PartialEq> PartialEq for IndexedSeq<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}
