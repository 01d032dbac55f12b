//! viewdex View - incrementally maintained map/reduce views.
//!
//! A view turns documents into sorted `(key, doc id, value)` entries with a
//! map function and, optionally, keeps per-key aggregates with a reducer.
//!
//! # Core Concepts
//!
//! - `MapFunction` / `Emitter`: the map stage, run once per document update
//! - `Reducer`: leaf reduce and rereduce (`Count`, `MaxValue`, `NoReduce`)
//! - `View` / `ViewBuilder`: the single writer of a view
//! - `ViewSnapshot`: an immutable, shareable read view of committed state
//! - `Delta`: the entry changes a document update produced
//! - `QueryOptions` / `QueryResult`: key ranges, paging, reduce and group
//!
//! # Example
//!
//! ```rust
//! use viewdex_core::{Document, Value, ValueShape};
//! use viewdex_index::KeyRange;
//! use viewdex_view::{map_fn, Count, Emitter, View};
//!
//! let tags = map_fn(ValueShape::Scalar, |doc: &Document, emit: &mut Emitter<String, Value>| {
//!     for tag in doc.get_array("tags").unwrap_or(&[]) {
//!         if let Some(tag) = tag.as_str() {
//!             emit.emit(tag.to_string(), Value::from(doc.id()));
//!         }
//!     }
//! });
//!
//! let mut view = View::builder("tags", tags).reduce(Count).build().unwrap();
//! view.update(&Document::from_json("a", r#"{"tags":["x","y"]}"#).unwrap());
//! view.update(&Document::from_json("b", r#"{"tags":["x"]}"#).unwrap());
//!
//! let snapshot = view.snapshot();
//! assert_eq!(snapshot.get(&"x".to_string()).len(), 2);
//! let counts = snapshot.reduce_grouped(&KeyRange::all(), false).unwrap();
//! assert_eq!(counts, vec![("x".to_string(), 2), ("y".to_string(), 1)]);
//! ```

#![no_std]

extern crate alloc;

pub mod config;
pub mod delta;
pub mod map;
pub mod query;
pub mod reduce;
mod snapshot;
mod view;

pub use config::{ViewConfig, DEFAULT_SHARDS, MAX_SHARDS};
pub use delta::{Delta, DeltaBatch, DeltaBatchExt};
pub use map::{map_fn, run_map, Emitter, FnMap, MapFunction};
pub use query::{QueryOptions, QueryResult, ReducedRow, ViewRow};
pub use reduce::{Count, MaxValue, NoReduce, Reducer};
pub use snapshot::ViewSnapshot;
pub use view::{View, ViewBuilder, ViewStats};
