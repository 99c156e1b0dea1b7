//! Logical records and their addresses.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open field map of a record: column name to value.
pub type FieldMap = serde_json::Map<String, Value>;

/// Address of a record: collection id plus record id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub collection: String,
    pub id: String,
}

impl RecordKey {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A logical record.
///
/// Callers construct a record with a key and, for writes, a payload.
/// Transactions populate it on read or mark it absent. The payload is kept as
/// an open [`Value`]; it is only accepted for writes when it is a JSON object,
/// see [`Record::field_map`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    key: RecordKey,
    data: Value,
    exists: bool,
}

impl Record {
    /// A record carrying a payload to be written.
    pub fn new(key: RecordKey, data: Value) -> Self {
        Self {
            key,
            data,
            exists: false,
        }
    }

    /// A record with no payload, ready to be read into.
    pub fn empty(key: RecordKey) -> Self {
        Self::new(key, Value::Null)
    }

    /// A record built directly from a field map.
    pub fn from_fields(key: RecordKey, fields: FieldMap) -> Self {
        Self::new(key, Value::Object(fields))
    }

    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// `true` once a read has found the record.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// The payload as a field map, or `None` if it is not a JSON object.
    pub fn field_map(&self) -> Option<&FieldMap> {
        self.data.as_object()
    }

    /// Mark the record found and replace its payload.
    pub fn set_found(&mut self, fields: FieldMap) {
        self.data = Value::Object(fields);
        self.exists = true;
    }

    /// Mark the record absent and clear its payload.
    pub fn set_missing(&mut self) {
        self.data = Value::Null;
        self.exists = false;
    }
}
