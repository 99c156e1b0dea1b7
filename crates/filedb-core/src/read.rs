//! Point reads.

use std::sync::Arc;

use filedb_store::{DirEntry, FileStore};
use filedb_types::{Definition, Record, RecordKey};
use tracing::debug;

use crate::context::OpContext;
use crate::error::{DbError, DbResult};
use crate::layout::{Layout, Target};
use crate::port::Port;
use crate::{map_file, single_file};

/// A read-only view of the record tree.
///
/// Holds no state besides the definition and the port; every call reads the
/// store afresh. Cheap to clone.
#[derive(Clone)]
pub struct ReadTransaction {
    definition: Option<Arc<Definition>>,
    store: Arc<dyn FileStore>,
}

impl ReadTransaction {
    pub fn new(definition: Option<Arc<Definition>>, store: Arc<dyn FileStore>) -> Self {
        Self { definition, store }
    }

    pub fn definition(&self) -> Option<&Definition> {
        self.definition.as_deref()
    }

    pub(crate) fn store(&self) -> &dyn FileStore {
        self.store.as_ref()
    }

    /// Load `record` by its key.
    ///
    /// An absent record is not an error: the record is marked missing and its
    /// payload cleared. On error the record is left untouched.
    pub async fn get(&self, ctx: &OpContext, record: &mut Record) -> DbResult<()> {
        let target = Target::resolve(self.definition(), record.key())?;
        let port = Port::new(self.store(), ctx);
        debug!(key = %record.key(), path = target.path(), "get");

        let mut loaded = Record::empty(record.key().clone());
        match target.layout {
            Layout::Single { .. } => single_file::get(&port, &target, &mut loaded).await?,
            Layout::Shared { .. } => map_file::get(&port, &target, &mut loaded).await?,
        }
        *record = loaded;
        Ok(())
    }

    /// Existence checks are not implemented; use [`Self::get`].
    pub async fn exists(&self, _ctx: &OpContext, _key: &RecordKey) -> DbResult<bool> {
        Err(DbError::Unsupported("exists"))
    }

    /// Bulk reads are not implemented.
    pub async fn get_multi(&self, _ctx: &OpContext, _records: &mut [Record]) -> DbResult<()> {
        Err(DbError::Unsupported("get_multi"))
    }

    /// Query execution is not implemented.
    pub async fn query(&self, _ctx: &OpContext, _collection: &str, _query: &str) -> DbResult<Vec<Record>> {
        Err(DbError::Unsupported("query"))
    }

    /// Raw listing of a collection's directory.
    pub async fn list_files(&self, ctx: &OpContext, collection: &str) -> DbResult<Vec<DirEntry>> {
        let definition = self.definition().ok_or(DbError::DefinitionMissing)?;
        let collection = definition
            .collection(collection)
            .ok_or_else(|| DbError::CollectionNotFound(collection.to_string()))?;
        Port::new(self.store(), ctx).list_dir(&collection.dir_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::ErrorKind;
    use filedb_store::{InMemoryFileStore, StoreError};
    use serde_json::json;

    fn store() -> Arc<InMemoryFileStore> {
        Arc::new(
            InMemoryFileStore::new()
                .with_file("tags/active.yaml", "title: Active\n")
                .with_file("data/statuses.json", r#"{"open": {"n": 1}, "done": {"n": 2}}"#)
                .with_file("labels/red.yaml", "title:\n  en: Red\n  ru: Krasnyy\ncolor: '#f00'\n"),
        )
    }

    #[tokio::test]
    async fn get_single_record() {
        let store = store();
        let tx = fixtures::database(&store).read_transaction();
        let ctx = OpContext::new();

        let mut rec = Record::empty(RecordKey::new("tags", "active"));
        tx.get(&ctx, &mut rec).await.unwrap();
        assert!(rec.exists());
        assert_eq!(rec.data(), &json!({"title": "Active"}));

        let mut missing = Record::empty(RecordKey::new("tags", "missing"));
        tx.get(&ctx, &mut missing).await.unwrap();
        assert!(!missing.exists());
    }

    #[tokio::test]
    async fn get_from_shared_file() {
        let store = store();
        let tx = fixtures::database(&store).read_transaction();
        let ctx = OpContext::new();

        let mut rec = Record::empty(RecordKey::new("statuses", "done"));
        tx.get(&ctx, &mut rec).await.unwrap();
        assert_eq!(rec.data(), &json!({"n": 2}));

        let mut absent = Record::empty(RecordKey::new("statuses", "blocked"));
        tx.get(&ctx, &mut absent).await.unwrap();
        assert!(!absent.exists());
    }

    #[tokio::test]
    async fn get_projects_locale() {
        let store = store();
        let tx = fixtures::database(&store).read_transaction();
        let mut rec = Record::empty(RecordKey::new("labels", "red"));
        tx.get(&OpContext::new(), &mut rec).await.unwrap();
        assert_eq!(rec.data(), &json!({"title": "Red", "color": "#f00"}));
    }

    #[tokio::test]
    async fn get_clears_stale_payload() {
        let store = store();
        let tx = fixtures::database(&store).read_transaction();
        let mut rec = Record::new(RecordKey::new("tags", "missing"), json!({"title": "old"}));
        tx.get(&OpContext::new(), &mut rec).await.unwrap();
        assert!(!rec.exists());
        assert!(rec.data().is_null());
    }

    #[tokio::test]
    async fn malformed_file_is_a_format_error() {
        let store = Arc::new(InMemoryFileStore::new().with_file("tags/bad.yaml", "- a\n- b\n"));
        let tx = fixtures::database(&store).read_transaction();
        let mut rec = Record::new(RecordKey::new("tags", "bad"), json!({"keep": true}));
        let err = tx.get(&OpContext::new(), &mut rec).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(rec.data(), &json!({"keep": true}));
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let store = store();
        store.fail_next(StoreError::Forbidden {
            path: "tags/active.yaml".into(),
            message: "bad credentials".into(),
        });
        let tx = fixtures::database(&store).read_transaction();
        let mut rec = Record::empty(RecordKey::new("tags", "active"));
        let err = tx.get(&OpContext::new(), &mut rec).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Remote);
        assert!(!rec.exists());
    }

    #[tokio::test]
    async fn validation_happens_before_io() {
        let store = store();
        let tx = fixtures::database(&store).read_transaction();
        let ctx = OpContext::new();

        let mut rec = Record::empty(RecordKey::new("nope", "a"));
        let err = tx.get(&ctx, &mut rec).await.unwrap_err();
        assert!(matches!(err, DbError::CollectionNotFound(_)));

        let mut rec = Record::empty(RecordKey::new("events", "a"));
        let err = tx.get(&ctx, &mut rec).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn missing_definition() {
        let store = store();
        let tx = crate::Database::without_definition(store.clone()).read_transaction();
        let mut rec = Record::empty(RecordKey::new("tags", "active"));
        let err = tx.get(&OpContext::new(), &mut rec).await.unwrap_err();
        assert!(matches!(err, DbError::DefinitionMissing));
    }

    #[tokio::test]
    async fn cancelled_read() {
        let store = store();
        let tx = fixtures::database(&store).read_transaction();
        let ctx = OpContext::new();
        ctx.cancel();
        let mut rec = Record::empty(RecordKey::new("tags", "active"));
        let err = tx.get(&ctx, &mut rec).await.unwrap_err();
        assert!(matches!(err, DbError::Cancelled));
        assert!(!rec.exists());
    }

    #[tokio::test]
    async fn unsupported_operations() {
        let store = store();
        let tx = fixtures::database(&store).read_transaction();
        let ctx = OpContext::new();
        let key = RecordKey::new("tags", "active");

        let err = tx.exists(&ctx, &key).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        let err = tx.get_multi(&ctx, &mut [Record::empty(key)]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        let err = tx.query(&ctx, "tags", "title = 'x'").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[tokio::test]
    async fn list_collection_directory() {
        let store = store();
        let tx = fixtures::database(&store).read_transaction();
        let entries = tx.list_files(&OpContext::new(), "tags").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "tags/active.yaml");

        let err = tx.list_files(&OpContext::new(), "nope").await.unwrap_err();
        assert!(matches!(err, DbError::CollectionNotFound(_)));
    }
}
