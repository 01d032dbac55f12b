//! viewdex Core - document and value types shared by every viewdex crate.
//!
//! - `Value`: JSON-like values with a total order, usable as view keys
//! - `Object`: a sorted field map
//! - `Document`: an id plus an object body, the input of map functions
//! - `ValueShape`: the coarse kind of an emitted value
//! - `Error`: error types for view configuration and queries
//!
//! # Example
//!
//! ```rust
//! use viewdex_core::{Document, Value};
//!
//! let doc = Document::parse(r#"{"_id":"spec-1","symbolicName":"com.x"}"#).unwrap();
//! assert_eq!(doc.id(), "spec-1");
//! assert_eq!(doc.get("symbolicName"), Some(&Value::from("com.x")));
//! ```

#![no_std]

extern crate alloc;

mod document;
mod error;
mod types;
mod value;

pub use document::{DocId, Document, ID_FIELD};
pub use error::{Error, Result};
pub use types::ValueShape;
pub use value::{Object, Value};
