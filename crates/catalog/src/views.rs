//! The catalog's map functions.
//!
//! Every map emits nothing for documents missing a field it requires, and
//! silently drops references it cannot resolve.

use crate::schema::*;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;
use viewdex_core::{Document, Value, ValueShape};
use viewdex_view::{Emitter, MapFunction};

/// The named views of a catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    ModelSpecificationByFingerprint,
    ModelSpecificationsIncludeAlias,
    ObjectUsagesByFingerprint,
    LatestTimestampByFingerprint,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::ModelSpecificationByFingerprint,
        ViewKind::ModelSpecificationsIncludeAlias,
        ViewKind::ObjectUsagesByFingerprint,
        ViewKind::LatestTimestampByFingerprint,
    ];

    /// Returns the `design/view` name of the view.
    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::ModelSpecificationByFingerprint => "metaData/modelSpecificationByFingerprint",
            ViewKind::ModelSpecificationsIncludeAlias => "metaData/modelSpecificationsIncludeAlias",
            ViewKind::ObjectUsagesByFingerprint => "objectUsages/byFingerprint",
            ViewKind::LatestTimestampByFingerprint => "objectUsages/latestTimestampByFingerprint",
        }
    }

    /// Returns the design document the view belongs to.
    pub fn design_document(&self) -> &'static str {
        self.name().split('/').next().unwrap_or_default()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the symbolic name of a complete model specification.
fn specification_name(doc: &Document) -> Option<&str> {
    let name = doc.get_str(SYMBOLIC_NAME)?;
    doc.get_str(VERSION_RANGE)?;
    Some(name)
}

fn strings(values: &[Value]) -> impl Iterator<Item = &str> {
    values.iter().filter_map(Value::as_str)
}

/// Indexes model specifications by each of their fingerprints.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModelSpecificationByFingerprint;

impl MapFunction for ModelSpecificationByFingerprint {
    type Key = String;
    type Value = Arc<Document>;

    fn shape(&self) -> ValueShape {
        ValueShape::Document
    }

    fn map(&self, doc: &Document, emit: &mut Emitter<String, Arc<Document>>) {
        if specification_name(doc).is_none() {
            return;
        }
        let Some(fingerprints) = doc.get_array(FINGERPRINTS) else {
            return;
        };
        let shared = Arc::new(doc.clone());
        for fingerprint in strings(fingerprints) {
            emit.emit(fingerprint.to_string(), Arc::clone(&shared));
        }
    }
}

/// Indexes model specifications by symbolic name and by every alias.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModelSpecificationsIncludeAlias;

impl MapFunction for ModelSpecificationsIncludeAlias {
    type Key = String;
    type Value = Arc<Document>;

    fn shape(&self) -> ValueShape {
        ValueShape::Document
    }

    fn map(&self, doc: &Document, emit: &mut Emitter<String, Arc<Document>>) {
        let Some(name) = specification_name(doc) else {
            return;
        };
        let shared = Arc::new(doc.clone());
        emit.emit(name.to_string(), Arc::clone(&shared));
        for alias in strings(doc.get_array(ALIASES).unwrap_or(&[])) {
            emit.emit(alias.to_string(), Arc::clone(&shared));
        }
    }
}

/// Returns the imports and primary type of a complete compilation unit.
fn unit_parts(doc: &Document) -> Option<(&[Value], &Value)> {
    let imports = doc.get_array(IMPORTS)?;
    let primary = doc.get(PRIMARY_TYPE).filter(|v| v.as_object().is_some())?;
    Some((imports, primary))
}

/// Import name to fingerprint lookup of one compilation unit.
fn import_fingerprints(imports: &[Value]) -> HashMap<&str, &str> {
    imports
        .iter()
        .filter_map(|import| {
            let name = import.get(IMPORT_NAME)?.as_str()?;
            let fingerprint = import.get(IMPORT_FINGERPRINT)?.as_str()?;
            Some((name, fingerprint))
        })
        .collect()
}

/// Extracts the usages of imported types, keyed by the type's fingerprint.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectUsagesByFingerprint;

impl MapFunction for ObjectUsagesByFingerprint {
    type Key = String;
    type Value = Value;

    fn shape(&self) -> ValueShape {
        ValueShape::Record
    }

    fn map(&self, doc: &Document, emit: &mut Emitter<String, Value>) {
        let Some((imports, primary)) = unit_parts(doc) else {
            return;
        };
        let lookup = import_fingerprints(imports);

        let methods = primary.get(METHODS).and_then(Value::as_array).unwrap_or(&[]);
        for method in methods {
            let objects = method.get(OBJECTS).and_then(Value::as_array).unwrap_or(&[]);
            for object in objects {
                let Some(type_name) = object.get(OBJECT_TYPE).and_then(Value::as_str) else {
                    continue;
                };
                let Some(fingerprint) = lookup.get(type_name).filter(|fp| !fp.is_empty()) else {
                    continue;
                };

                let calls: Vec<String> = object
                    .get(RECEIVER_CALL_SITES)
                    .and_then(Value::as_array)
                    .unwrap_or(&[])
                    .iter()
                    .filter_map(|site| site.get(TARGET_METHOD)?.as_str())
                    .map(|target| target.to_string())
                    .collect();
                if calls.is_empty() {
                    continue;
                }

                let usage = ObjectUsage {
                    type_name: type_name.to_string(),
                    context_first: method
                        .get(FIRST_DECLARATION)
                        .and_then(Value::as_str)
                        .map(|s| s.to_string()),
                    context_super: method
                        .get(SUPER_DECLARATION)
                        .and_then(Value::as_str)
                        .map(|s| s.to_string()),
                    calls,
                };
                emit.emit(fingerprint.to_string(), usage.to_value());
            }
        }
    }
}

/// Emits the unit's creation timestamp under every imported fingerprint.
#[derive(Clone, Copy, Debug, Default)]
pub struct LatestTimestampByFingerprint;

impl MapFunction for LatestTimestampByFingerprint {
    type Key = String;
    type Value = Value;

    fn shape(&self) -> ValueShape {
        ValueShape::Scalar
    }

    fn map(&self, doc: &Document, emit: &mut Emitter<String, Value>) {
        let Some((imports, _)) = unit_parts(doc) else {
            return;
        };
        let timestamp = doc.get(CREATION_TIMESTAMP).cloned().unwrap_or(Value::Null);
        for import in imports {
            let Some(fingerprint) = import.get(IMPORT_FINGERPRINT).and_then(Value::as_non_empty_str)
            else {
                continue;
            };
            emit.emit(fingerprint.to_string(), timestamp.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use viewdex_view::run_map;

    fn doc(json: &str) -> Document {
        Document::from_json("d", json).unwrap()
    }

    fn keys<V>(pairs: &[(String, V)]) -> Vec<&str> {
        pairs.iter().map(|(k, _)| k.as_str()).collect()
    }

    const UNIT: &str = r#"{
        "creationTimestamp": "2021-06-01",
        "imports": [{"name": "T", "fingerprint": "fp1"}],
        "primaryType": {"methods": [{
            "firstDeclaration": "d1",
            "superDeclaration": "d2",
            "objects": [{"type": "T", "receiverCallSites": [{"targetMethod": "m1"}, {"targetMethod": "m2"}]}]
        }]}
    }"#;

    #[test]
    fn test_view_kind_names() {
        assert_eq!(
            ViewKind::ModelSpecificationByFingerprint.name(),
            "metaData/modelSpecificationByFingerprint"
        );
        assert_eq!(ViewKind::ObjectUsagesByFingerprint.design_document(), "objectUsages");
        for kind in ViewKind::ALL {
            assert_eq!(ViewKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ViewKind::from_name("metaData/libraryIdentifier"), None);
    }

    #[test]
    fn test_fingerprint_map_requires_fields() {
        let incomplete = [
            r#"{"versionRange":"[1,2)","fingerprints":["f1"]}"#,
            r#"{"symbolicName":"com.x","fingerprints":["f1"]}"#,
            r#"{"symbolicName":"com.x","versionRange":"[1,2)"}"#,
            r#"{"symbolicName":"","versionRange":"[1,2)","fingerprints":["f1"]}"#,
        ];
        for json in incomplete {
            assert!(run_map(&ModelSpecificationByFingerprint, &doc(json)).is_empty());
        }
    }

    #[test]
    fn test_fingerprint_map_emits_per_fingerprint() {
        let spec = doc(r#"{"symbolicName":"com.x","versionRange":"[1,2)","fingerprints":["f1","f2"]}"#);
        let pairs = run_map(&ModelSpecificationByFingerprint, &spec).into_pairs();
        assert_eq!(keys(&pairs), vec!["f1", "f2"]);
        assert!(pairs.iter().all(|(_, value)| **value == spec));
    }

    #[test]
    fn test_alias_map() {
        let spec = doc(r#"{"symbolicName":"s","versionRange":"[1,2)","aliases":["a1","a2"]}"#);
        let pairs = run_map(&ModelSpecificationsIncludeAlias, &spec).into_pairs();
        assert_eq!(keys(&pairs), vec!["s", "a1", "a2"]);
        assert!(pairs.iter().all(|(_, value)| **value == spec));

        let plain = doc(r#"{"symbolicName":"s","versionRange":"[1,2)"}"#);
        assert_eq!(run_map(&ModelSpecificationsIncludeAlias, &plain).len(), 1);
        assert!(run_map(&ModelSpecificationsIncludeAlias, &doc(r#"{"symbolicName":"s"}"#)).is_empty());
    }

    #[test]
    fn test_object_usage_map_end_to_end() {
        let pairs = run_map(&ObjectUsagesByFingerprint, &doc(UNIT)).into_pairs();
        let expected = ObjectUsage {
            type_name: "T".to_string(),
            context_first: Some("d1".to_string()),
            context_super: Some("d2".to_string()),
            calls: vec!["m1".to_string(), "m2".to_string()],
        };
        assert_eq!(pairs, vec![("fp1".to_string(), expected.to_value())]);
    }

    #[test]
    fn test_object_usage_map_skips_unusable_objects() {
        let unit = doc(
            r#"{
            "imports": [{"name": "T", "fingerprint": "fp1"}, {"name": "E", "fingerprint": ""}],
            "primaryType": {"methods": [{"objects": [
                {"type": "T", "receiverCallSites": []},
                {"type": "U", "receiverCallSites": [{"targetMethod": "m1"}]},
                {"type": "E", "receiverCallSites": [{"targetMethod": "m1"}]}
            ]}]}
        }"#,
        );
        assert!(run_map(&ObjectUsagesByFingerprint, &unit).is_empty());
        assert!(run_map(&ObjectUsagesByFingerprint, &doc(r#"{"imports": []}"#)).is_empty());
    }

    #[test]
    fn test_timestamp_map() {
        let unit = doc(
            r#"{
            "creationTimestamp": "2021-06-01",
            "imports": [
                {"name": "A", "fingerprint": "fp1"},
                {"name": "B", "fingerprint": "fp1"},
                {"name": "C", "fingerprint": ""}
            ],
            "primaryType": {}
        }"#,
        );
        let pairs = run_map(&LatestTimestampByFingerprint, &unit).into_pairs();
        assert_eq!(keys(&pairs), vec!["fp1", "fp1"]);
        assert!(pairs.iter().all(|(_, ts)| *ts == Value::from("2021-06-01")));
    }

    #[test]
    fn test_timestamp_map_without_timestamp_emits_null() {
        let unit = doc(r#"{"imports": [{"name": "A", "fingerprint": "fp1"}], "primaryType": {}}"#);
        let pairs = run_map(&LatestTimestampByFingerprint, &unit).into_pairs();
        assert_eq!(pairs, vec![("fp1".to_string(), Value::Null)]);
    }
}
