//! Map stage: documents to emitted `(key, value)` pairs.

use alloc::vec::Vec;
use core::marker::PhantomData;
use viewdex_core::{Document, ValueShape};

/// Collects the pairs a map function emits for one document.
///
/// An emitter is filled by a single map invocation and consumed once.
#[derive(Clone, Debug)]
pub struct Emitter<K, V> {
    pairs: Vec<(K, V)>,
}

impl<K, V> Default for Emitter<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Emitter<K, V> {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Emits one pair.
    #[inline]
    pub fn emit(&mut self, key: K, value: V) {
        self.pairs.push((key, value));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the emitted pairs in emission order.
    pub fn pairs(&self) -> &[(K, V)] {
        &self.pairs
    }

    pub fn into_pairs(self) -> Vec<(K, V)> {
        self.pairs
    }
}

impl<K, V> IntoIterator for Emitter<K, V> {
    type Item = (K, V);
    type IntoIter = alloc::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

/// A pure function from one document to zero or more pairs.
///
/// Implementations must read nothing but the document, and must emit
/// nothing (rather than fail) when a field they need is absent.
pub trait MapFunction: Send + Sync {
    type Key: Ord + Clone + Send + Sync;
    type Value: Clone + Send + Sync;

    /// The shape of the emitted values, checked against the reducer when a
    /// view is built.
    fn shape(&self) -> ValueShape {
        ValueShape::Any
    }

    fn map(&self, doc: &Document, emit: &mut Emitter<Self::Key, Self::Value>);
}

/// Runs a map function over one document.
pub fn run_map<M: MapFunction + ?Sized>(map: &M, doc: &Document) -> Emitter<M::Key, M::Value> {
    let mut emitter = Emitter::new();
    map.map(doc, &mut emitter);
    emitter
}

/// A map function backed by a closure.
pub struct FnMap<K, V, F> {
    shape: ValueShape,
    f: F,
    _pairs: PhantomData<fn() -> (K, V)>,
}

/// Creates a map function from a closure emitting values of the given shape.
pub fn map_fn<K, V, F>(shape: ValueShape, f: F) -> FnMap<K, V, F>
where
    F: Fn(&Document, &mut Emitter<K, V>) + Send + Sync,
{
    FnMap {
        shape,
        f,
        _pairs: PhantomData,
    }
}

impl<K, V, F> MapFunction for FnMap<K, V, F>
where
    K: Ord + Clone + Send + Sync,
    V: Clone + Send + Sync,
    F: Fn(&Document, &mut Emitter<K, V>) + Send + Sync,
{
    type Key = K;
    type Value = V;

    fn shape(&self) -> ValueShape {
        self.shape
    }

    fn map(&self, doc: &Document, emit: &mut Emitter<K, V>) {
        (self.f)(doc, emit)
    }
}
