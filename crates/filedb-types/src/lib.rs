//! Foundation types for filedb.
//!
//! filedb exposes a version-controlled file tree as a key/record database.
//! This crate holds the vocabulary every other filedb crate shares: how a
//! collection is laid out on disk, what a record looks like in memory, and
//! how a record address maps to a file path.
//!
//! # Key Types
//!
//! - [`Definition`]: Mapping from collection id to [`CollectionDef`]
//! - [`RecordFileDef`]: File-name template, serialization format, and [`RecordType`]
//! - [`ColumnDef`]: Declared column type with an optional locale tag
//! - [`Record`] / [`RecordKey`]: A logical record and its address
//! - [`RevisionTag`]: Opaque content hash used for optimistic concurrency
//!
//! Path resolution lives in [`path`]: [`resolve_record_path`] is pure and
//! total, and never touches storage.

pub mod definition;
pub mod error;
pub mod path;
pub mod record;
pub mod revision;

pub use definition::{
    CollectionDef, ColumnDef, ColumnType, Definition, RecordFileDef, RecordType,
};
pub use error::{TypeError, TypeResult};
pub use path::{clean_path, resolve_record_path, KEY_PLACEHOLDER};
pub use record::{FieldMap, Record, RecordKey};
pub use revision::RevisionTag;
