//! Read-modify-write mutations guarded by revision tags.

use std::sync::Arc;

use filedb_store::FileStore;
use filedb_types::{Definition, Record, RecordKey};
use tracing::{debug, info};

use crate::change::{change_message, ChangeVerb};
use crate::context::OpContext;
use crate::error::{DbError, DbResult};
use crate::layout::{Layout, Target};
use crate::payload;
use crate::port::Port;
use crate::read::ReadTransaction;
use crate::single_file::PutMode;
use crate::{map_file, single_file};

/// A transaction that can mutate records.
///
/// Each mutation reads the file it touches, applies the change in memory, and
/// writes the result back with the revision tag observed by that read. A
/// concurrent change in between makes the store reject the write; the error
/// is returned as-is and nothing is retried.
#[derive(Clone)]
pub struct ReadwriteTransaction {
    read: ReadTransaction,
}

impl ReadwriteTransaction {
    pub fn new(definition: Option<Arc<Definition>>, store: Arc<dyn FileStore>) -> Self {
        Self {
            read: ReadTransaction::new(definition, store),
        }
    }

    /// The read-only half of this transaction.
    pub fn reader(&self) -> &ReadTransaction {
        &self.read
    }

    pub async fn get(&self, ctx: &OpContext, record: &mut Record) -> DbResult<()> {
        self.read.get(ctx, record).await
    }

    /// Create or replace a record.
    pub async fn set(&self, ctx: &OpContext, record: &Record) -> DbResult<()> {
        self.put(ctx, record, PutMode::Set).await
    }

    /// Create a record, failing if it already exists.
    pub async fn insert(&self, ctx: &OpContext, record: &Record) -> DbResult<()> {
        self.put(ctx, record, PutMode::Insert).await
    }

    async fn put(&self, ctx: &OpContext, record: &Record, mode: PutMode) -> DbResult<()> {
        let fields = payload::field_map(record)?;
        let target = Target::resolve(self.read.definition(), record.key())?;
        let port = Port::new(self.read.store(), ctx);

        let verb = match mode {
            PutMode::Set => ChangeVerb::Set,
            PutMode::Insert => ChangeVerb::Insert,
        };
        let message = change_message(verb, &target.key, ctx.author());
        debug!(key = %target.key, path = target.path(), %verb, "put");

        let revision = match target.layout {
            Layout::Single { .. } => single_file::put(&port, &target, fields, mode, &message).await?,
            Layout::Shared { .. } => map_file::put(&port, &target, fields, mode, &message).await?,
        };
        info!(key = %target.key, path = target.path(), revision = %revision.short(), %verb, "record committed");
        Ok(())
    }

    /// Delete a record. Deleting an absent record is an error.
    pub async fn delete(&self, ctx: &OpContext, key: &RecordKey) -> DbResult<()> {
        let target = Target::resolve(self.read.definition(), key)?;
        let port = Port::new(self.read.store(), ctx);
        let message = change_message(ChangeVerb::Delete, key, ctx.author());
        debug!(%key, path = target.path(), "delete");

        match target.layout {
            Layout::Single { .. } => single_file::delete(&port, &target, &message).await?,
            Layout::Shared { .. } => map_file::delete(&port, &target, &message).await?,
        }
        info!(%key, path = target.path(), "record deleted");
        Ok(())
    }

    /// Bulk writes are not implemented.
    pub async fn set_multi(&self, _ctx: &OpContext, _records: &[Record]) -> DbResult<()> {
        Err(DbError::Unsupported("set_multi"))
    }

    /// Bulk deletes are not implemented.
    pub async fn delete_multi(&self, _ctx: &OpContext, _keys: &[RecordKey]) -> DbResult<()> {
        Err(DbError::Unsupported("delete_multi"))
    }

    /// Field-level updates are not implemented; use [`Self::set`].
    pub async fn update(&self, _ctx: &OpContext, _key: &RecordKey, _fields: &crate::FieldMap) -> DbResult<()> {
        Err(DbError::Unsupported("update"))
    }
}
