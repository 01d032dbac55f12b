//! Incrementally maintained map/reduce views.
//!
//! A `View` owns one map function and an optional reducer. Every document
//! update re-runs the map function for that document only, replaces the
//! document's prior entries and recomputes the leaf reductions of the keys
//! it touched. Reads go through `ViewSnapshot`s of the committed state.

use crate::config::ViewConfig;
use crate::delta::{Delta, DeltaBatch, DeltaBatchExt};
use crate::map::{run_map, MapFunction};
use crate::reduce::{NoReduce, Reducer};
use crate::snapshot::{State, ViewSnapshot};
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::hash::BuildHasher;
use hashbrown::hash_map::DefaultHashBuilder;
use tracing::{debug, trace, warn};
use viewdex_core::{Document, Error, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Counters of the documents a view has processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewStats {
    /// Updates whose document emitted at least one pair
    pub documents_mapped: u64,
    /// Updates whose document emitted nothing
    pub documents_skipped: u64,
    /// Removals of indexed documents
    pub documents_removed: u64,
}

/// Builder for `View`.
pub struct ViewBuilder<M, R = NoReduce> {
    name: String,
    map: M,
    reducer: Option<R>,
    config: ViewConfig,
}

impl<M: MapFunction, R: Reducer<M::Value>> ViewBuilder<M, R> {
    /// Sets the reduce function.
    pub fn reduce<R2: Reducer<M::Value>>(self, reducer: R2) -> ViewBuilder<M, R2> {
        ViewBuilder {
            name: self.name,
            map: self.map,
            reducer: Some(reducer),
            config: self.config,
        }
    }

    /// Sets the number of shards.
    pub fn shards(mut self, shards: usize) -> Self {
        self.config.shards = shards;
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates the configuration and creates an empty view.
    pub fn build(self) -> Result<View<M, R>> {
        if self.name.is_empty() {
            warn!("rejected view with an empty name");
            return Err(Error::invalid_config("view name must not be empty"));
        }
        if let Err(err) = self.config.validate() {
            warn!(view = %self.name, error = %err, "rejected view configuration");
            return Err(err);
        }
        if let Some(reducer) = &self.reducer {
            let shape = self.map.shape();
            if !reducer.accepts(shape) {
                warn!(
                    view = %self.name,
                    reducer = reducer.name(),
                    %shape,
                    "reducer cannot aggregate map output"
                );
                return Err(Error::reduce_shape_mismatch(
                    self.name.as_str(),
                    reducer.name(),
                    shape,
                ));
            }
        }

        debug!(
            view = %self.name,
            shards = self.config.shards,
            reducer = self.reducer.as_ref().map(|r| r.name()).unwrap_or("none"),
            "built view"
        );

        let name: Arc<str> = Arc::from(self.name);
        Ok(View {
            snapshot: ViewSnapshot {
                name: Arc::clone(&name),
                reducer: self.reducer.map(Arc::new),
                state: Arc::new(State::new(self.config.shards)),
            },
            name,
            map: self.map,
            config: self.config,
            hasher: DefaultHashBuilder::default(),
            stats: ViewStats::default(),
        })
    }
}

/// A named, sharded index over documents.
///
/// There is a single writer (`&mut View`). Readers take snapshots with
/// `View::snapshot`; a snapshot keeps seeing the state it was taken from,
/// as writes copy shared state before modifying it.
pub struct View<M: MapFunction, R: Reducer<M::Value> = NoReduce> {
    name: Arc<str>,
    map: M,
    config: ViewConfig,
    hasher: DefaultHashBuilder,
    stats: ViewStats,
    snapshot: ViewSnapshot<M::Key, M::Value, R>,
}

impl<M: MapFunction> View<M, NoReduce> {
    /// Starts building a view without a reducer.
    pub fn builder(name: impl Into<String>, map: M) -> ViewBuilder<M, NoReduce> {
        ViewBuilder {
            name: name.into(),
            map,
            reducer: None,
            config: ViewConfig::default(),
        }
    }
}

impl<M: MapFunction, R: Reducer<M::Value>> View<M, R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn stats(&self) -> ViewStats {
        self.stats
    }

    pub fn map_function(&self) -> &M {
        &self.map
    }

    /// Returns a snapshot of the committed state.
    pub fn snapshot(&self) -> ViewSnapshot<M::Key, M::Value, R> {
        self.snapshot.clone()
    }

    /// Returns the total number of entries.
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Returns the number of documents with at least one entry.
    pub fn document_count(&self) -> usize {
        self.snapshot.document_count()
    }

    pub fn contains_document(&self, doc_id: &str) -> bool {
        self.snapshot.state.shards[self.shard_of(doc_id)]
            .entries
            .contains_document(doc_id)
    }

    fn shard_of(&self, doc_id: &str) -> usize {
        let shards = self.snapshot.state.shards.len();
        if shards == 1 {
            return 0;
        }
        (self.hasher.hash_one(doc_id) % shards as u64) as usize
    }

    /// Indexes a new document or re-indexes a changed one.
    ///
    /// Returns the entry changes: a deletion per removed entry followed by
    /// an insertion per emitted entry. Use `consolidate` for net changes.
    pub fn update(&mut self, doc: &Document) -> DeltaBatch<M::Key> {
        let pairs = run_map(&self.map, doc).into_pairs();
        self.apply(doc.id(), pairs)
    }

    /// Indexes a batch of documents, applied in input order.
    pub fn update_batch(&mut self, docs: &[Document]) -> DeltaBatch<M::Key> {
        let mapped = self.map_all(docs);

        let mut deltas: DeltaBatch<M::Key> = Vec::new();
        for (doc, pairs) in docs.iter().zip(mapped) {
            deltas.extend(self.apply(doc.id(), pairs));
        }

        debug!(
            view = %self.name,
            documents = docs.len(),
            net = deltas.net_count(),
            seq = self.snapshot.state.seq,
            "applied batch"
        );
        deltas
    }

    #[cfg(feature = "parallel")]
    fn map_all(&self, docs: &[Document]) -> Vec<Vec<(M::Key, M::Value)>> {
        let map = &self.map;
        docs.par_iter()
            .map(|doc| run_map(map, doc).into_pairs())
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn map_all(&self, docs: &[Document]) -> Vec<Vec<(M::Key, M::Value)>> {
        docs.iter()
            .map(|doc| run_map(&self.map, doc).into_pairs())
            .collect()
    }

    /// Removes every entry of a document.
    ///
    /// Removing an unknown document is a no-op.
    pub fn remove(&mut self, doc_id: &str) -> DeltaBatch<M::Key> {
        if !self.contains_document(doc_id) {
            return Vec::new();
        }
        let shard = self.shard_of(doc_id);

        let ViewSnapshot { reducer, state, .. } = &mut self.snapshot;
        let state = Arc::make_mut(state);
        let shard = &mut state.shards[shard];

        let deltas: DeltaBatch<M::Key> = shard
            .entries
            .remove_document(doc_id)
            .into_iter()
            .map(Delta::delete)
            .collect();
        if let Some(reducer) = reducer.as_deref() {
            shard.refresh(reducer, deltas.touched_keys());
        }
        state.seq += 1;
        self.stats.documents_removed += 1;
        deltas
    }

    fn apply(&mut self, doc_id: &str, pairs: Vec<(M::Key, M::Value)>) -> DeltaBatch<M::Key> {
        if pairs.is_empty() {
            self.stats.documents_skipped += 1;
            trace!(view = %self.name, doc_id, "document emitted nothing");
        } else {
            self.stats.documents_mapped += 1;
        }
        let shard = self.shard_of(doc_id);

        let ViewSnapshot { reducer, state, .. } = &mut self.snapshot;
        let state = Arc::make_mut(state);
        let shard = &mut state.shards[shard];

        let inserted: Vec<M::Key> = pairs.iter().map(|(key, _)| key.clone()).collect();
        let removed = shard.entries.replace_document(doc_id, pairs);

        let deltas: DeltaBatch<M::Key> = removed
            .into_iter()
            .map(Delta::delete)
            .chain(inserted.into_iter().map(Delta::insert))
            .collect();
        if let Some(reducer) = reducer.as_deref() {
            shard.refresh(reducer, deltas.touched_keys());
        }
        state.seq += 1;
        deltas
    }
}
