//! Mapping a record address to its collection definition.

use filedb_types::{CollectionDef, Definition, RecordFileDef, RecordKey};
use tracing::trace;

use crate::error::{DbError, DbResult};

/// Find the collection a record belongs to.
///
/// Returns the collection together with the record id. Fails when no
/// definition is supplied, when the collection is unknown, or when the id is
/// empty.
pub fn resolve_collection<'d>(
    definition: Option<&'d Definition>,
    key: &RecordKey,
) -> DbResult<(&'d CollectionDef, String)> {
    let definition = definition.ok_or(DbError::DefinitionMissing)?;
    let collection = definition
        .collection(&key.collection)
        .ok_or_else(|| DbError::CollectionNotFound(key.collection.clone()))?;
    if key.id.is_empty() {
        return Err(DbError::InvalidRecordKey(key.clone()));
    }
    trace!(collection = %collection.id, id = %key.id, "resolved collection");
    Ok((collection, key.id.clone()))
}

/// The record file definition of a collection, required for every operation.
pub fn require_record_file(collection: &CollectionDef) -> DbResult<&RecordFileDef> {
    collection
        .record_file
        .as_ref()
        .ok_or_else(|| DbError::RecordFileMissing(collection.id.clone()))
}
