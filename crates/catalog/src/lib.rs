//! viewdex Catalog - the views behind a code recommender's data access.
//!
//! Model specifications are indexed by fingerprint and by symbolic name or
//! alias. Compilation units feed two views keyed by the fingerprints of the
//! types they import: the object usages found in their methods (counted)
//! and their creation timestamp (maximum).
//!
//! # Example
//!
//! ```rust
//! use viewdex_catalog::Catalog;
//! use viewdex_core::Document;
//!
//! let mut catalog = Catalog::new().unwrap();
//! let spec = Document::parse(
//!     r#"{"_id":"s1","symbolicName":"com.x","versionRange":"[1,2)","fingerprints":["fp1"]}"#,
//! )
//! .unwrap();
//! catalog.put_model_specification(&spec);
//!
//! let found = catalog.model_specification_by_fingerprint("fp1").unwrap();
//! assert_eq!(found.id(), "s1");
//! ```

#![no_std]

extern crate alloc;

mod catalog;
pub mod schema;
mod views;

pub use catalog::Catalog;
pub use schema::ObjectUsage;
pub use views::{
    LatestTimestampByFingerprint, ModelSpecificationByFingerprint, ModelSpecificationsIncludeAlias,
    ObjectUsagesByFingerprint, ViewKind,
};
