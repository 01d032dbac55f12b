//! Committed view state and the read side of a view.
//!
//! A view's state is a set of shards behind an `Arc`. Readers hold a
//! `ViewSnapshot`, which never changes; the writer copies the state on
//! write when snapshots are still held.

use crate::query::{QueryOptions, QueryResult, ReducedRow, ViewRow};
use crate::reduce::Reducer;
use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use viewdex_core::{Error, Result};
use viewdex_index::{EntryIndex, KeyRange};

/// One partition of a view: its entries and the leaf reduction of each key.
#[derive(Clone, Debug)]
pub(crate) struct Shard<K, V, O> {
    pub(crate) entries: EntryIndex<K, V>,
    pub(crate) reductions: BTreeMap<K, O>,
}

impl<K: Ord + Clone, V, O> Shard<K, V, O> {
    fn new() -> Self {
        Self {
            entries: EntryIndex::new(),
            reductions: BTreeMap::new(),
        }
    }

    /// Recomputes the leaf reduction of the given keys.
    pub(crate) fn refresh<'k, R>(&mut self, reducer: &R, keys: impl IntoIterator<Item = &'k K>)
    where
        K: 'k,
        R: Reducer<V, Output = O> + ?Sized,
    {
        for key in keys {
            let entries = self.entries.get(key);
            if entries.is_empty() {
                self.reductions.remove(key);
            } else {
                let values: Vec<&V> = entries.iter().map(|e| &e.value).collect();
                self.reductions.insert(key.clone(), reducer.reduce(&values));
            }
        }
    }

    fn reductions_in<'a>(&'a self, range: &'a KeyRange<K>) -> impl Iterator<Item = (&'a K, &'a O)> + 'a {
        range
            .is_satisfiable()
            .then(|| self.reductions.range(range.as_bounds()))
            .into_iter()
            .flatten()
    }
}

/// The committed state of a view.
#[derive(Clone, Debug)]
pub(crate) struct State<K, V, O> {
    pub(crate) shards: Vec<Shard<K, V, O>>,
    /// Number of committed document updates.
    pub(crate) seq: u64,
}

impl<K: Ord + Clone, V, O> State<K, V, O> {
    pub(crate) fn new(shards: usize) -> Self {
        Self {
            shards: (0..shards).map(|_| Shard::new()).collect(),
            seq: 0,
        }
    }
}

/// A consistent, read-only view of an index at one point in time.
///
/// Snapshots are cheap to clone and can be sent to other threads; updates
/// made to the view afterwards are not visible through them.
pub struct ViewSnapshot<K, V, R: Reducer<V>> {
    pub(crate) name: Arc<str>,
    pub(crate) reducer: Option<Arc<R>>,
    pub(crate) state: Arc<State<K, V, R::Output>>,
}

impl<K, V, R: Reducer<V>> Clone for ViewSnapshot<K, V, R> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            reducer: self.reducer.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<K, V, R> ViewSnapshot<K, V, R>
where
    K: Ord + Clone,
    V: Clone,
    R: Reducer<V>,
{
    /// Returns the name of the view.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of document updates committed before this snapshot.
    pub fn seq(&self) -> u64 {
        self.state.seq
    }

    /// Returns whether the view has a reduce function.
    pub fn has_reducer(&self) -> bool {
        self.reducer.is_some()
    }

    /// Returns the total number of entries.
    pub fn len(&self) -> usize {
        self.state.shards.iter().map(|s| s.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of documents with at least one entry.
    pub fn document_count(&self) -> usize {
        self.state.shards.iter().map(|s| s.entries.document_count()).sum()
    }

    /// Returns all rows for a key, or nothing.
    pub fn get(&self, key: &K) -> Vec<ViewRow<K, V>> {
        self.range(&KeyRange::only(key.clone()), false)
    }

    /// Returns the rows within a key range.
    ///
    /// Rows are ordered by key, then by document id, then by emission order;
    /// `descending` reverses that order.
    pub fn range(&self, range: &KeyRange<K>, descending: bool) -> Vec<ViewRow<K, V>> {
        let mut rows: Vec<_> = self
            .state
            .shards
            .iter()
            .flat_map(|shard| shard.entries.scan(range, false))
            .collect();
        // Stable: entries of one document keep their emission order
        rows.sort_by(|(k1, e1), (k2, e2)| k1.cmp(k2).then_with(|| e1.doc_id.cmp(&e2.doc_id)));
        if descending {
            rows.reverse();
        }
        rows.into_iter()
            .map(|(key, entry)| ViewRow {
                key: key.clone(),
                id: entry.doc_id.clone(),
                value: entry.value.clone(),
            })
            .collect()
    }

    fn reducer(&self) -> Result<&R> {
        self.reducer
            .as_deref()
            .ok_or_else(|| Error::no_reducer(&*self.name))
    }

    fn combine(reducer: &R, mut partials: Vec<R::Output>) -> R::Output {
        if partials.len() == 1 {
            if let Some(only) = partials.pop() {
                return only;
            }
        }
        reducer.rereduce(&partials)
    }

    /// Returns one aggregate per distinct key in the range.
    ///
    /// Each shard contributes the leaf reduction of its part of a key's
    /// group; partials from several shards are combined with rereduce.
    pub fn reduce_grouped(&self, range: &KeyRange<K>, descending: bool) -> Result<Vec<(K, R::Output)>> {
        let reducer = self.reducer()?;

        let mut partials: BTreeMap<&K, Vec<R::Output>> = BTreeMap::new();
        for shard in &self.state.shards {
            for (key, partial) in shard.reductions_in(range) {
                partials.entry(key).or_default().push(partial.clone());
            }
        }

        let mut groups: Vec<(K, R::Output)> = partials
            .into_iter()
            .map(|(key, parts)| (key.clone(), Self::combine(reducer, parts)))
            .collect();
        if descending {
            groups.reverse();
        }
        Ok(groups)
    }

    /// Returns a single aggregate over every entry in the range, or `None`
    /// when the range holds no entries.
    pub fn reduce_all(&self, range: &KeyRange<K>) -> Result<Option<R::Output>> {
        let reducer = self.reducer()?;

        let partials: Vec<R::Output> = self
            .state
            .shards
            .iter()
            .flat_map(|shard| shard.reductions_in(range).map(|(_, partial)| partial.clone()))
            .collect();
        if partials.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::combine(reducer, partials)))
    }

    /// Runs a query described by `QueryOptions`.
    pub fn query(&self, opts: &QueryOptions<K>) -> Result<QueryResult<K, V, R::Output>> {
        let reduce = opts.reduce.unwrap_or(self.has_reducer());
        if opts.group && !reduce {
            return Err(Error::invalid_query("group requires reduce"));
        }

        if !reduce {
            let rows = self.range(&opts.range, opts.descending);
            return Ok(QueryResult::Rows(opts.paginate(rows)));
        }

        let reduced = if opts.group {
            self.reduce_grouped(&opts.range, opts.descending)?
                .into_iter()
                .map(|(key, value)| ReducedRow {
                    key: Some(key),
                    value,
                })
                .collect()
        } else {
            self.reduce_all(&opts.range)?
                .map(|value| ReducedRow { key: None, value })
                .into_iter()
                .collect()
        };
        Ok(QueryResult::Reduced(opts.paginate(reduced)))
    }
}
