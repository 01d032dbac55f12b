//! Document structure for viewdex.
//!
//! A `Document` is the unit handed to map functions: an id plus an object
//! body. Documents are immutable once indexed; an update is a new document
//! with the same id.

use crate::error::{Error, Result};
use crate::value::{Object, Value};
use alloc::string::{String, ToString};

/// Unique identifier for a document.
pub type DocId = String;

/// Field holding the document id in JSON input.
pub const ID_FIELD: &str = "_id";

/// A document with a unique id and an object body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    id: DocId,
    body: Object,
}

impl Document {
    /// Creates a new document with the given id and body.
    pub fn new(id: impl Into<DocId>, body: Object) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }

    /// Creates a document from an arbitrary value, which must be an object.
    pub fn from_value(id: impl Into<DocId>, value: Value) -> Result<Self> {
        match value {
            Value::Object(body) => Ok(Self::new(id, body)),
            other => Err(Error::invalid_document(alloc::format!(
                "document body must be an object, got {}",
                other.shape()
            ))),
        }
    }

    /// Parses a JSON object with an explicit id.
    pub fn from_json(id: impl Into<DocId>, text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text).map_err(Error::json)?;
        Self::from_value(id, Value::from(json))
    }

    /// Parses a JSON object carrying its id in the `_id` field.
    pub fn parse(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text).map_err(Error::json)?;
        let value = Value::from(json);
        let id = value
            .get(ID_FIELD)
            .and_then(Value::as_non_empty_str)
            .map(|s| s.to_string())
            .ok_or_else(|| Error::invalid_document("missing _id"))?;
        Self::from_value(id, value)
    }

    /// Returns the document id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the document body.
    #[inline]
    pub fn body(&self) -> &Object {
        &self.body
    }

    /// Gets a top-level field.
    #[inline]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }

    /// Gets a top-level field as a non-empty string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_non_empty_str)
    }

    /// Gets a top-level field as an array.
    pub fn get_array(&self, field: &str) -> Option<&[Value]> {
        self.get(field).and_then(Value::as_array)
    }

    /// Returns the body as a `Value`, e.g. to emit the whole document.
    pub fn to_value(&self) -> Value {
        Value::Object(self.body.clone())
    }

    /// Serializes the body back to JSON text.
    pub fn to_json(&self) -> String {
        serde_json::Value::from(&self.to_value()).to_string()
    }
}
