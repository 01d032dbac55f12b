//! viewdex Index - the sorted entry store behind every view.
//!
//! - `EntryIndex`: `(key, doc id, value)` entries grouped by key, with
//!   per-document replacement
//! - `KeyRange`: inclusive/exclusive key ranges for lookups and scans
//!
//! # Example
//!
//! ```rust
//! use viewdex_index::{EntryIndex, KeyRange};
//!
//! let mut index: EntryIndex<String, u32> = EntryIndex::new();
//! index.replace_document("doc-1", vec![("fp1".to_string(), 1), ("fp2".to_string(), 2)]);
//! index.replace_document("doc-2", vec![("fp1".to_string(), 3)]);
//!
//! assert_eq!(index.get(&"fp1".to_string()).len(), 2);
//!
//! let range = KeyRange::lower_bound("fp2".to_string(), false);
//! let rows = index.scan(&range, false);
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].1.value, 2);
//! ```

#![no_std]

extern crate alloc;

mod entries;
mod range;

pub use entries::{Entry, EntryIndex};
pub use range::KeyRange;
