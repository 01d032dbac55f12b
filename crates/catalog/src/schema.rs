//! Field names of catalog documents and the object usage record.
//!
//! Model specifications carry `symbolicName`, `versionRange`, `fingerprints`
//! and optional `aliases`. Compilation units carry `imports`, a
//! `primaryType` whose `methods` list the `objects` they use, and a
//! `creationTimestamp`.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use viewdex_core::{Object, Value};

pub const SYMBOLIC_NAME: &str = "symbolicName";
pub const VERSION_RANGE: &str = "versionRange";
pub const FINGERPRINTS: &str = "fingerprints";
pub const ALIASES: &str = "aliases";

pub const IMPORTS: &str = "imports";
pub const IMPORT_NAME: &str = "name";
pub const IMPORT_FINGERPRINT: &str = "fingerprint";
pub const PRIMARY_TYPE: &str = "primaryType";
pub const METHODS: &str = "methods";
pub const FIRST_DECLARATION: &str = "firstDeclaration";
pub const SUPER_DECLARATION: &str = "superDeclaration";
pub const OBJECTS: &str = "objects";
pub const OBJECT_TYPE: &str = "type";
pub const RECEIVER_CALL_SITES: &str = "receiverCallSites";
pub const TARGET_METHOD: &str = "targetMethod";
pub const CREATION_TIMESTAMP: &str = "creationTimestamp";

const CONTEXT_FIRST: &str = "contextFirst";
const CONTEXT_SUPER: &str = "contextSuper";
const CALLS: &str = "calls";

/// How one object of an imported type is used inside one method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectUsage {
    /// Declared type name of the object
    pub type_name: String,
    /// The method's first declaration in the type hierarchy
    pub context_first: Option<String>,
    /// The declaration the method overrides
    pub context_super: Option<String>,
    /// Target methods of the calls made on the object, in call-site order
    pub calls: Vec<String>,
}

impl ObjectUsage {
    /// Converts the usage to its record form
    /// `{type, contextFirst, contextSuper, calls}`. Absent contexts are omitted.
    pub fn to_value(&self) -> Value {
        let mut record = Object::with_capacity(4);
        record.insert(OBJECT_TYPE, self.type_name.as_str());
        if let Some(first) = &self.context_first {
            record.insert(CONTEXT_FIRST, first.as_str());
        }
        if let Some(sup) = &self.context_super {
            record.insert(CONTEXT_SUPER, sup.as_str());
        }
        record.insert(
            CALLS,
            self.calls
                .iter()
                .map(|c| Value::from(c.as_str()))
                .collect::<Vec<_>>(),
        );
        Value::Object(record)
    }

    /// Reads a usage back from its record form.
    pub fn from_value(value: &Value) -> Option<Self> {
        let type_name = value.get(OBJECT_TYPE)?.as_str()?.to_string();
        let calls = value
            .get(CALLS)?
            .as_array()?
            .iter()
            .filter_map(Value::as_str)
            .map(|c| c.to_string())
            .collect();
        Some(Self {
            type_name,
            context_first: value.get(CONTEXT_FIRST).and_then(Value::as_str).map(|s| s.to_string()),
            context_super: value.get(CONTEXT_SUPER).and_then(Value::as_str).map(|s| s.to_string()),
            calls,
        })
    }
}
