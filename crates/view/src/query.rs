//! Query options and result rows.

use alloc::vec::Vec;
use viewdex_core::DocId;
use viewdex_index::KeyRange;

/// One indexed entry as returned by row queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewRow<K, V> {
    pub key: K,
    /// Id of the document that emitted the entry
    pub id: DocId,
    pub value: V,
}

/// One aggregate as returned by reduce queries.
///
/// `key` is `None` for an ungrouped reduce over the whole range.
#[derive(Clone, Debug, PartialEq)]
pub struct ReducedRow<K, O> {
    pub key: Option<K>,
    pub value: O,
}

/// Parameters of a view query.
///
/// `reduce` defaults to true when the view has a reducer. `group` asks for
/// one aggregate per key instead of one for the whole range and requires
/// `reduce`.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryOptions<K> {
    pub range: KeyRange<K>,
    pub descending: bool,
    pub skip: usize,
    pub limit: Option<usize>,
    pub reduce: Option<bool>,
    pub group: bool,
}

impl<K> Default for QueryOptions<K> {
    fn default() -> Self {
        Self {
            range: KeyRange::All,
            descending: false,
            skip: 0,
            limit: None,
            reduce: None,
            group: false,
        }
    }
}

impl<K: Ord> QueryOptions<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the query to a single key.
    pub fn key(mut self, key: K) -> Self {
        self.range = KeyRange::only(key);
        self
    }

    pub fn range(mut self, range: KeyRange<K>) -> Self {
        self.range = range;
        self
    }

    pub fn descending(mut self, descending: bool) -> Self {
        self.descending = descending;
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn reduce(mut self, reduce: bool) -> Self {
        self.reduce = Some(reduce);
        self
    }

    pub fn group(mut self, group: bool) -> Self {
        self.group = group;
        self
    }

    /// Applies `skip` and `limit` to an ordered result.
    pub(crate) fn paginate<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// The result of `query`: entry rows or aggregates.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryResult<K, V, O> {
    Rows(Vec<ViewRow<K, V>>),
    Reduced(Vec<ReducedRow<K, O>>),
}

impl<K, V, O> QueryResult<K, V, O> {
    pub fn len(&self) -> usize {
        match self {
            QueryResult::Rows(rows) => rows.len(),
            QueryResult::Reduced(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_rows(self) -> Option<Vec<ViewRow<K, V>>> {
        match self {
            QueryResult::Rows(rows) => Some(rows),
            QueryResult::Reduced(_) => None,
        }
    }

    pub fn into_reduced(self) -> Option<Vec<ReducedRow<K, O>>> {
        match self {
            QueryResult::Rows(_) => None,
            QueryResult::Reduced(rows) => Some(rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_query_options_builder() {
        let opts = QueryOptions::new().key("fp1").limit(5).skip(1).descending(true);
        assert_eq!(opts.range, KeyRange::only("fp1"));
        assert_eq!(opts.limit, Some(5));
        assert_eq!(opts.skip, 1);
        assert!(opts.descending);
        assert_eq!(opts.reduce, None);
        assert!(!opts.group);
    }

    #[test]
    fn test_paginate() {
        let opts = QueryOptions::<i32>::new().skip(2).limit(2);
        assert_eq!(opts.paginate(vec![1, 2, 3, 4, 5]), vec![3, 4]);

        let opts = QueryOptions::<i32>::new().skip(10);
        assert!(opts.paginate(vec![1, 2]).is_empty());
    }

    #[test]
    fn test_query_result_accessors() {
        let result: QueryResult<&str, u8, u64> = QueryResult::Reduced(vec![ReducedRow {
            key: Some("fp1"),
            value: 2,
        }]);
        assert_eq!(result.len(), 1);
        assert!(result.clone().into_rows().is_none());
        assert_eq!(result.into_reduced().unwrap()[0].value, 2);
    }
}
