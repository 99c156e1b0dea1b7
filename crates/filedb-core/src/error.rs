use filedb_codec::FormatError;
use filedb_store::StoreError;
use filedb_types::{RecordKey, RecordType};
use thiserror::Error;

/// Coarse classification of a [`DbError`], for mapping to status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The record does not exist.
    NotFound,
    /// The request or the definition is unusable.
    Validation,
    /// An insert hit an existing record.
    Conflict,
    /// A document could not be encoded or decoded.
    Format,
    /// The file store failed.
    Remote,
    /// The caller cancelled the operation.
    Cancelled,
    /// The operation is not implemented.
    Unsupported,
}

/// Errors produced by record transactions.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("no definition supplied")]
    DefinitionMissing,

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("collection {0} has no record file definition")]
    RecordFileMissing(String),

    #[error("unsupported record type {record_type} in collection {collection}")]
    UnsupportedRecordType {
        collection: String,
        record_type: RecordType,
    },

    #[error("invalid record key {0}: record id must not be empty")]
    InvalidRecordKey(RecordKey),

    #[error("invalid payload for {key}: expected a field map, found {found}")]
    InvalidPayload { key: RecordKey, found: &'static str },

    #[error("record already exists: {0}")]
    RecordAlreadyExists(RecordKey),

    #[error("record not found: {0}")]
    RecordNotFound(RecordKey),

    #[error("format error in {context}: {source}")]
    Format {
        context: String,
        #[source]
        source: FormatError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("{operation} of {path} was cancelled in flight; its outcome is unknown")]
    WriteOutcomeUnknown {
        path: String,
        operation: &'static str,
    },

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl DbError {
    pub(crate) fn format(context: impl Into<String>, source: FormatError) -> Self {
        Self::Format {
            context: context.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RecordNotFound(_) => ErrorKind::NotFound,
            Self::Store(StoreError::InvalidPath { .. }) => ErrorKind::Validation,
            Self::DefinitionMissing
            | Self::InvalidDefinition(_)
            | Self::CollectionNotFound(_)
            | Self::RecordFileMissing(_)
            | Self::UnsupportedRecordType { .. }
            | Self::InvalidRecordKey(_)
            | Self::InvalidPayload { .. } => ErrorKind::Validation,
            Self::RecordAlreadyExists(_) => ErrorKind::Conflict,
            Self::Format { .. } => ErrorKind::Format,
            Self::Store(_) | Self::WriteOutcomeUnknown { .. } => ErrorKind::Remote,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Unsupported(_) => ErrorKind::Unsupported,
        }
    }

    /// `true` if the store rejected a write because the file changed since
    /// it was read. The caller may retry the whole operation.
    pub fn is_revision_conflict(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_conflict())
    }
}

/// Result alias for transaction operations.
pub type DbResult<T> = Result<T, DbError>;
