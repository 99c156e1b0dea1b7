//! Transactional record storage for filedb.
//!
//! Records live as YAML or JSON documents in a version-controlled file tree.
//! This crate layers a key/record CRUD interface over the
//! [`FileStore`](filedb_store::FileStore) port:
//!
//! - [`resolver`] maps a record address to its collection and layout
//! - [`ReadTransaction`] serves point lookups
//! - [`ReadwriteTransaction`] performs insert, set, and delete as
//!   read-modify-write sequences guarded by revision tags
//!
//! # Design Rules
//!
//! 1. Every operation reads fresh state; nothing is cached between calls.
//! 2. Writes pass the revision tag observed by the preceding read. The remote
//!    store rejects stale tags; this crate never retries.
//! 3. A shared record file is read, modified, and rewritten as a whole.
//! 4. Absence is not an error on reads. Deleting an absent record is.
//! 5. A write interrupted by cancellation is reported as having an unknown
//!    outcome, never as a success.

pub mod change;
pub mod context;
pub mod database;
pub mod error;
mod layout;
mod map_file;
mod payload;
mod port;
pub mod read;
pub mod readwrite;
pub mod resolver;
mod single_file;

#[cfg(test)]
mod fixtures;

pub use change::{change_message, ChangeVerb};
pub use context::OpContext;
pub use database::Database;
pub use error::{DbError, DbResult, ErrorKind};
pub use read::ReadTransaction;
pub use readwrite::ReadwriteTransaction;
pub use resolver::{require_record_file, resolve_collection};

pub use filedb_types::{Definition, FieldMap, Record, RecordKey};
