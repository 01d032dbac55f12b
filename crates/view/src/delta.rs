//! Index changes produced by view updates.
//!
//! Every entry a document update removes is reported as a deletion (-1) of
//! its key and every entry it emits as an insertion (+1). Consolidating a
//! batch yields the net change per key; the distinct keys of a batch are the
//! groups whose reductions must be recomputed.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// A change to the number of entries under a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delta<K> {
    /// The key whose entries changed
    pub key: K,
    /// +1 per inserted entry, -1 per removed entry
    pub diff: i32,
}

impl<K> Delta<K> {
    #[inline]
    pub fn new(key: K, diff: i32) -> Self {
        Self { key, diff }
    }

    /// Creates an insertion delta (+1).
    #[inline]
    pub fn insert(key: K) -> Self {
        Self { key, diff: 1 }
    }

    /// Creates a deletion delta (-1).
    #[inline]
    pub fn delete(key: K) -> Self {
        Self { key, diff: -1 }
    }

    #[inline]
    pub fn is_insert(&self) -> bool {
        self.diff > 0
    }

    #[inline]
    pub fn is_delete(&self) -> bool {
        self.diff < 0
    }

    #[inline]
    pub fn is_noop(&self) -> bool {
        self.diff == 0
    }
}

/// A batch of deltas.
pub type DeltaBatch<K> = Vec<Delta<K>>;

/// Extension trait for working with delta batches.
pub trait DeltaBatchExt<K> {
    /// Sums diffs per key and drops keys whose changes cancel out.
    fn consolidate(&self) -> DeltaBatch<K>;

    /// Returns the distinct keys touched by the batch, in key order.
    fn touched_keys(&self) -> Vec<&K>;

    /// Returns the net change in entry count.
    fn net_count(&self) -> i64;
}

impl<K: Ord + Clone> DeltaBatchExt<K> for DeltaBatch<K> {
    fn consolidate(&self) -> DeltaBatch<K> {
        let mut net: BTreeMap<&K, i32> = BTreeMap::new();
        for d in self {
            *net.entry(&d.key).or_insert(0) += d.diff;
        }
        net.into_iter()
            .filter(|(_, diff)| *diff != 0)
            .map(|(key, diff)| Delta::new(key.clone(), diff))
            .collect()
    }

    fn touched_keys(&self) -> Vec<&K> {
        let mut keys: Vec<&K> = self.iter().map(|d| &d.key).collect();
        keys.sort();
        keys.dedup();
        keys
    }

    fn net_count(&self) -> i64 {
        self.iter().map(|d| d.diff as i64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_delta_kinds() {
        assert!(Delta::insert("fp1").is_insert());
        assert!(Delta::delete("fp1").is_delete());
        assert!(Delta::new("fp1", 0).is_noop());
    }

    #[test]
    fn test_consolidate_cancels_reinserted_keys() {
        let batch: DeltaBatch<&str> = vec![
            Delta::delete("a"),
            Delta::delete("b"),
            Delta::insert("b"),
            Delta::insert("c"),
            Delta::insert("c"),
        ];
        let net = batch.consolidate();
        assert_eq!(net, vec![Delta::new("a", -1), Delta::new("c", 2)]);
        assert_eq!(batch.net_count(), 1);
    }

    #[test]
    fn test_touched_keys_distinct_and_sorted() {
        let batch: DeltaBatch<&str> = vec![Delta::insert("z"), Delta::delete("a"), Delta::insert("z")];
        assert_eq!(batch.touched_keys(), vec![&"a", &"z"]);
    }
}
