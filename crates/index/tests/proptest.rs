//! Property-based tests for viewdex-index using proptest.

use std::collections::BTreeMap;

use proptest::prelude::*;
use viewdex_index::{EntryIndex, KeyRange};

fn doc_id(i: usize) -> String {
    format!("doc-{:03}", i)
}

proptest! {
    /// Scans return keys in ascending order and every entry exactly once.
    #[test]
    fn scan_is_sorted_and_complete(docs in prop::collection::vec(prop::collection::vec(0i64..50, 0..6), 1..60)) {
        let mut index = EntryIndex::new();
        let mut expected = 0;
        for (i, keys) in docs.iter().enumerate() {
            expected += keys.len();
            index.replace_document(&doc_id(i), keys.iter().map(|&k| (k, i)));
        }

        let all = KeyRange::all();
        let rows = index.scan(&all, false);
        prop_assert_eq!(rows.len(), expected);
        prop_assert_eq!(index.len(), expected);
        for pair in rows.windows(2) {
            let (k1, e1) = pair[0];
            let (k2, e2) = pair[1];
            prop_assert!(k1 < k2 || (k1 == k2 && e1.doc_id <= e2.doc_id));
        }

        let all = KeyRange::all();
        let mut descending = index.scan(&all, true);
        descending.reverse();
        prop_assert_eq!(descending, rows);
    }

    /// Replacing documents leaves the index equal to one built from the final versions only.
    #[test]
    fn replace_matches_fresh_build(
        first in prop::collection::vec(prop::collection::vec(0i64..20, 0..4), 1..30),
        second in prop::collection::vec(prop::collection::vec(0i64..20, 0..4), 1..30),
    ) {
        let mut updated = EntryIndex::new();
        for (i, keys) in first.iter().enumerate() {
            updated.replace_document(&doc_id(i), keys.iter().map(|&k| (k, 0u8)));
        }
        for (i, keys) in second.iter().enumerate() {
            updated.replace_document(&doc_id(i), keys.iter().map(|&k| (k, 0u8)));
        }

        let mut fresh = EntryIndex::new();
        for (i, keys) in first.iter().enumerate().skip(second.len()) {
            fresh.replace_document(&doc_id(i), keys.iter().map(|&k| (k, 0u8)));
        }
        for (i, keys) in second.iter().enumerate() {
            fresh.replace_document(&doc_id(i), keys.iter().map(|&k| (k, 0u8)));
        }

        prop_assert_eq!(updated.len(), fresh.len());
        prop_assert_eq!(updated.key_count(), fresh.key_count());
        prop_assert_eq!(updated.document_count(), fresh.document_count());
        let all = KeyRange::all();
        prop_assert_eq!(updated.scan(&all, false), fresh.scan(&all, false));
    }

    /// Range scans agree with filtering a full scan through `KeyRange::contains`.
    #[test]
    fn range_scan_matches_contains(
        keys in prop::collection::vec(0i64..100, 1..200),
        lower in 0i64..100,
        width in 0i64..50,
        lower_exclusive in any::<bool>(),
        upper_exclusive in any::<bool>(),
    ) {
        let mut index = EntryIndex::new();
        for (i, &k) in keys.iter().enumerate() {
            index.replace_document(&doc_id(i), vec![(k, i)]);
        }

        let range = KeyRange::bound(lower, lower + width, lower_exclusive, upper_exclusive);
        let scanned: Vec<i64> = index.scan(&range, false).into_iter().map(|(k, _)| *k).collect();

        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for &k in keys.iter().filter(|k| range.contains(k)) {
            *counts.entry(k).or_default() += 1;
        }
        let expected: Vec<i64> = counts
            .into_iter()
            .flat_map(|(k, n)| std::iter::repeat(k).take(n))
            .collect();

        prop_assert_eq!(scanned, expected);
    }

    /// Removing every document empties the index.
    #[test]
    fn remove_all_documents(docs in prop::collection::vec(prop::collection::vec(0i64..30, 0..5), 1..40)) {
        let mut index = EntryIndex::new();
        for (i, keys) in docs.iter().enumerate() {
            index.replace_document(&doc_id(i), keys.iter().map(|&k| (k, ())));
        }
        for i in 0..docs.len() {
            index.remove_document(&doc_id(i));
        }
        prop_assert!(index.is_empty());
        prop_assert_eq!(index.key_count(), 0);
        prop_assert_eq!(index.document_count(), 0);
    }
}
