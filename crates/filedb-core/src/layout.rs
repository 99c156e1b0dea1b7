//! Where a record lives on disk and how its file is encoded.

use filedb_codec::RecordCodec;
use filedb_types::{resolve_record_path, Definition, RecordKey, RecordType, KEY_PLACEHOLDER};

use crate::error::{DbError, DbResult};
use crate::resolver::{require_record_file, resolve_collection};

/// File layout of a resolved record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Layout {
    /// One file per record.
    Single { path: String },
    /// One file for the whole collection, keyed by record id.
    Shared { path: String },
}

impl Layout {
    pub(crate) fn path(&self) -> &str {
        match self {
            Self::Single { path } | Self::Shared { path } => path,
        }
    }
}

/// Everything an operation needs to touch one record.
#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) key: RecordKey,
    pub(crate) codec: RecordCodec,
    pub(crate) layout: Layout,
}

impl Target {
    /// Resolve `key` against `definition` without touching the store.
    pub(crate) fn resolve(definition: Option<&Definition>, key: &RecordKey) -> DbResult<Self> {
        let (collection, id) = resolve_collection(definition, key)?;
        let record_file = require_record_file(collection)?;

        let path = resolve_record_path(&collection.dir_path, &record_file.name, &id);
        let layout = match record_file.record_type {
            RecordType::SingleRecord => Layout::Single { path },
            RecordType::MapOfIdRecords if record_file.is_keyed() => {
                return Err(DbError::InvalidDefinition(format!(
                    "collection {}: shared record file {:?} must not contain {KEY_PLACEHOLDER}",
                    collection.id, record_file.name
                )))
            }
            RecordType::MapOfIdRecords => Layout::Shared { path },
            RecordType::ListOfRecords => {
                return Err(DbError::UnsupportedRecordType {
                    collection: collection.id.clone(),
                    record_type: record_file.record_type,
                })
            }
        };

        let codec = RecordCodec::for_collection(collection, record_file)
            .map_err(|e| DbError::format(layout.path(), e))?;

        Ok(Self {
            key: key.clone(),
            codec,
            layout,
        })
    }

    pub(crate) fn path(&self) -> &str {
        self.layout.path()
    }
}
