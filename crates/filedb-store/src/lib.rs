//! File access port for filedb.
//!
//! The record layer never talks HTTP itself. It reads and writes whole files
//! through the [`FileStore`] trait, which a remote-hosting client implements.
//! Every write carries the [`RevisionTag`](filedb_types::RevisionTag) the
//! caller last observed; the store rejects the write if the file changed in
//! between. This is the only concurrency control in the system.
//!
//! # Backends
//!
//! - [`InMemoryFileStore`]: `BTreeMap`-based store with an observable change
//!   history, used as the fake remote in tests
//! - [`LocalFileStore`]: a directory on disk with atomic writes and a
//!   JSON-lines change log
//!
//! # Error classification
//!
//! Remote clients describe raw API failures as [`RemoteFailure`] values and
//! turn them into [`StoreError`]s with [`classify`], so that not-found,
//! rate-limit, forbidden, and conflict responses stay distinguishable.

pub mod classify;
pub mod config;
pub mod error;
pub mod local;
pub mod memory;
pub mod path;
pub mod snapshot;
pub mod traits;

pub use classify::{classify, RemoteFailure};
pub use config::RemoteConfig;
pub use error::{StoreError, StoreResult};
pub use local::LocalFileStore;
pub use memory::InMemoryFileStore;
pub use path::normalize_store_path;
pub use snapshot::{ChangeEntry, ChangeKind, DirEntry, EntryKind, FileSnapshot};
pub use traits::{check_delete_revision, check_write_revision, FileStore};
