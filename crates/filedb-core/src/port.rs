//! Cancellation-aware access to the file store.
//!
//! Every store call is raced against the context's cancellation token. A
//! read that loses the race is simply cancelled. A write or delete that loses
//! may already have been applied remotely, so it is reported as having an
//! unknown outcome.

use std::future::Future;

use filedb_store::{DirEntry, FileSnapshot, FileStore, StoreResult};
use filedb_types::RevisionTag;
use tracing::debug;

use crate::context::OpContext;
use crate::error::{DbError, DbResult};

pub(crate) struct Port<'a> {
    store: &'a dyn FileStore,
    ctx: &'a OpContext,
}

impl<'a> Port<'a> {
    pub(crate) fn new(store: &'a dyn FileStore, ctx: &'a OpContext) -> Self {
        Self { store, ctx }
    }

    async fn guard_read<T>(&self, fut: impl Future<Output = StoreResult<T>>) -> DbResult<T> {
        if self.ctx.is_cancelled() {
            return Err(DbError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.ctx.cancellation().cancelled() => Err(DbError::Cancelled),
            result = fut => result.map_err(DbError::from),
        }
    }

    async fn guard_write<T>(
        &self,
        path: &str,
        operation: &'static str,
        fut: impl Future<Output = StoreResult<T>>,
    ) -> DbResult<T> {
        if self.ctx.is_cancelled() {
            return Err(DbError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.ctx.cancellation().cancelled() => Err(DbError::WriteOutcomeUnknown {
                path: path.to_string(),
                operation,
            }),
            result = fut => result.map_err(DbError::from),
        }
    }

    /// Read a file. A not-found error from the store counts as absence.
    pub(crate) async fn read(&self, path: &str) -> DbResult<Option<Vec<u8>>> {
        debug!(path, "reading file");
        match self.guard_read(self.store.read(path)).await {
            Err(DbError::Store(e)) if e.is_not_found() => Ok(None),
            other => other,
        }
    }

    pub(crate) async fn read_with_revision(&self, path: &str) -> DbResult<Option<FileSnapshot>> {
        debug!(path, "reading file with revision");
        let snapshot = match self.guard_read(self.store.read_with_revision(path)).await {
            Err(DbError::Store(e)) if e.is_not_found() => None,
            other => other?,
        };
        if let Some(snap) = &snapshot {
            debug!(path, revision = %snap.revision.short(), "observed revision");
        }
        Ok(snapshot)
    }

    pub(crate) async fn write(
        &self,
        path: &str,
        message: &str,
        content: &[u8],
        expected: &RevisionTag,
    ) -> DbResult<RevisionTag> {
        debug!(path, expected = %expected.short(), bytes = content.len(), "writing file");
        self.guard_write(path, "write", self.store.write(path, message, content, expected))
            .await
    }

    pub(crate) async fn delete(&self, path: &str, message: &str, expected: &RevisionTag) -> DbResult<()> {
        debug!(path, expected = %expected.short(), "deleting file");
        self.guard_write(path, "delete", self.store.delete(path, message, expected))
            .await
    }

    pub(crate) async fn list_dir(&self, path: &str) -> DbResult<Vec<DirEntry>> {
        debug!(path, "listing directory");
        self.guard_read(self.store.list_dir(path)).await
    }
}
