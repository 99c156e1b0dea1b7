use async_trait::async_trait;
use filedb_types::RevisionTag;

use crate::error::{StoreError, StoreResult};
use crate::snapshot::{DirEntry, FileSnapshot};

/// Access to a version-controlled file tree behind a content API.
///
/// All implementations must satisfy these invariants:
/// - Reads of absent files return `Ok(None)`, never `NotFound`.
/// - `write` with an empty expected tag creates the file and fails with
///   `AlreadyExists` if it is present.
/// - `write` and `delete` with a non-empty expected tag fail unless it
///   matches the current tag of the file.
/// - Every successful `write` and `delete` records `message` as the change
///   description in the tree's history.
/// - No retries: a rejected write is reported, never replayed.
///
/// Every call is a network round trip and may suspend.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Read a file's content.
    ///
    /// The default implementation discards the revision tag of
    /// [`Self::read_with_revision`].
    async fn read(&self, path: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self
            .read_with_revision(path)
            .await?
            .map(|snapshot| snapshot.content))
    }

    /// Read a file's content together with its current revision tag.
    async fn read_with_revision(&self, path: &str) -> StoreResult<Option<FileSnapshot>>;

    /// Create or update a file and return its new revision tag.
    async fn write(
        &self,
        path: &str,
        message: &str,
        content: &[u8],
        expected: &RevisionTag,
    ) -> StoreResult<RevisionTag>;

    /// Delete a file whose current tag is `expected`.
    async fn delete(&self, path: &str, message: &str, expected: &RevisionTag) -> StoreResult<()>;

    /// List the direct children of a directory, sorted by name.
    async fn list_dir(&self, path: &str) -> StoreResult<Vec<DirEntry>>;
}

/// Check `expected` against the `current` tag of `path` before a write.
///
/// Backends that enforce optimistic concurrency locally share this rule.
pub fn check_write_revision(
    path: &str,
    current: Option<&RevisionTag>,
    expected: &RevisionTag,
) -> StoreResult<()> {
    match (current, expected.is_empty()) {
        (None, true) => Ok(()),
        (Some(_), true) => Err(StoreError::AlreadyExists {
            path: path.to_string(),
        }),
        (None, false) => Err(StoreError::NotFound {
            path: path.to_string(),
        }),
        (Some(actual), false) => check_same(path, actual, expected),
    }
}

/// Check `expected` against the `current` tag of `path` before a delete.
pub fn check_delete_revision(
    path: &str,
    current: Option<&RevisionTag>,
    expected: &RevisionTag,
) -> StoreResult<()> {
    match current {
        None => Err(StoreError::NotFound {
            path: path.to_string(),
        }),
        Some(actual) => check_same(path, actual, expected),
    }
}

fn check_same(path: &str, actual: &RevisionTag, expected: &RevisionTag) -> StoreResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(StoreError::RevisionMismatch {
            path: path.to_string(),
            expected: expected.clone(),
            actual: actual.clone(),
        })
    }
}
