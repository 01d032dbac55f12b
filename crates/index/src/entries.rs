//! Sorted multi-entry index of emitted view pairs.
//!
//! Entries are grouped by key in a `BTreeMap`. Within a key, entries are
//! ordered by document id, and entries of one document keep their emission
//! order. A reverse map from document id to emitted keys makes replacing a
//! document's entries proportional to what it emitted.

use crate::range::KeyRange;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use hashbrown::HashMap;
use viewdex_core::DocId;

/// One indexed value and the document that emitted it.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<V> {
    pub doc_id: DocId,
    pub value: V,
}

/// A sorted index of `(key, doc id, value)` entries.
#[derive(Clone, Debug)]
pub struct EntryIndex<K, V> {
    groups: BTreeMap<K, Vec<Entry<V>>>,
    /// Keys emitted per document, with multiplicity.
    by_doc: HashMap<DocId, Vec<K>>,
    len: usize,
}

impl<K: Ord + Clone, V> Default for EntryIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V> EntryIndex<K, V> {
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
            by_doc: HashMap::new(),
            len: 0,
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns the number of documents with at least one entry.
    pub fn document_count(&self) -> usize {
        self.by_doc.len()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.groups.contains_key(key)
    }

    pub fn contains_document(&self, doc_id: &str) -> bool {
        self.by_doc.contains_key(doc_id)
    }

    /// Returns the keys a document emitted, in emission order.
    pub fn keys_of(&self, doc_id: &str) -> &[K] {
        self.by_doc.get(doc_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replaces all entries of a document with the given pairs.
    ///
    /// Returns the keys of the removed entries, with multiplicity.
    pub fn replace_document(
        &mut self,
        doc_id: &str,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Vec<K> {
        let removed = self.remove_document(doc_id);

        let mut emitted = Vec::new();
        for (key, value) in pairs {
            let group = self.groups.entry(key.clone()).or_default();
            // After every entry of a smaller or equal doc id: keeps emission order
            let pos = group.partition_point(|e| e.doc_id.as_str() <= doc_id);
            group.insert(
                pos,
                Entry {
                    doc_id: doc_id.into(),
                    value,
                },
            );
            emitted.push(key);
        }

        if !emitted.is_empty() {
            self.len += emitted.len();
            self.by_doc.insert(doc_id.into(), emitted);
        }
        removed
    }

    /// Removes all entries of a document.
    ///
    /// Returns the keys of the removed entries, with multiplicity.
    pub fn remove_document(&mut self, doc_id: &str) -> Vec<K> {
        let Some(keys) = self.by_doc.remove(doc_id) else {
            return Vec::new();
        };

        let mut distinct: Vec<&K> = keys.iter().collect();
        distinct.sort();
        distinct.dedup();
        for key in distinct {
            if let Some(group) = self.groups.get_mut(key) {
                group.retain(|e| e.doc_id != doc_id);
                if group.is_empty() {
                    self.groups.remove(key);
                }
            }
        }

        self.len -= keys.len();
        keys
    }

    /// Gets all entries for a key, in document id order.
    pub fn get(&self, key: &K) -> &[Entry<V>] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over the key groups within a range in ascending key order.
    pub fn groups<'a>(
        &'a self,
        range: &'a KeyRange<K>,
    ) -> impl DoubleEndedIterator<Item = (&'a K, &'a [Entry<V>])> + 'a {
        range
            .is_satisfiable()
            .then(|| self.groups.range(range.as_bounds()))
            .into_iter()
            .flatten()
            .map(|(k, entries)| (k, entries.as_slice()))
    }

    /// Returns the entries within a range, ascending or descending.
    ///
    /// Descending order reverses both the key order and the entry order
    /// within each key.
    pub fn scan<'a>(&'a self, range: &'a KeyRange<K>, descending: bool) -> Vec<(&'a K, &'a Entry<V>)> {
        let mut rows = Vec::new();
        if descending {
            for (key, entries) in self.groups(range).rev() {
                rows.extend(entries.iter().rev().map(|e| (key, e)));
            }
        } else {
            for (key, entries) in self.groups(range) {
                rows.extend(entries.iter().map(|e| (key, e)));
            }
        }
        rows
    }

    /// Returns the smallest key.
    pub fn min_key(&self) -> Option<&K> {
        self.groups.keys().next()
    }

    /// Returns the largest key.
    pub fn max_key(&self) -> Option<&K> {
        self.groups.keys().next_back()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.by_doc.clear();
        self.len = 0;
    }
}
