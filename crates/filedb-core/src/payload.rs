use filedb_codec::kind_of;
use filedb_types::{FieldMap, Record};

use crate::error::{DbError, DbResult};

/// The record's payload as a field map, checked before any port call.
pub(crate) fn field_map(record: &Record) -> DbResult<&FieldMap> {
    record.field_map().ok_or_else(|| DbError::InvalidPayload {
        key: record.key().clone(),
        found: kind_of(record.data()),
    })
}
