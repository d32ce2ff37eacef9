//! Insertion-ordered grouping
//!
//! Chart series must come out in the order their keys were first seen, so the
//! grouping keeps a vector of entries plus a key → position index.

use std::collections::HashMap;
use std::hash::Hash;

/// Map from key to accumulator that iterates in first-seen order
#[derive(Debug, Clone)]
pub struct OrderedBuckets<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K, V> Default for OrderedBuckets<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Default> OrderedBuckets<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator for `key`, appended with `V::default()` on first sight
    pub fn entry(&mut self, key: K) -> &mut V {
        let pos = match self.index.get(&key) {
            Some(&pos) => pos,
            None => {
                let pos = self.entries.len();
                self.index.insert(key.clone(), pos);
                self.entries.push((key, V::default()));
                pos
            }
        };
        &mut self.entries[pos].1
    }

    /// Entries in first-seen order
    pub fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}
