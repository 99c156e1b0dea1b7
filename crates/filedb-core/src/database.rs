use std::future::Future;
use std::sync::Arc;

use filedb_store::FileStore;
use filedb_types::Definition;
use tracing::debug;

use crate::context::OpContext;
use crate::error::{DbError, DbResult};
use crate::read::ReadTransaction;
use crate::readwrite::ReadwriteTransaction;

/// Entry point: a definition bound to a file store.
///
/// Transactions are stateless views over the same definition and store, so
/// creating one is cheap.
#[derive(Clone)]
pub struct Database {
    definition: Option<Arc<Definition>>,
    store: Arc<dyn FileStore>,
}

impl Database {
    pub fn new(definition: Definition, store: Arc<dyn FileStore>) -> Self {
        Self {
            definition: Some(Arc::new(definition)),
            store,
        }
    }

    /// A database with no definition. Every record operation fails with
    /// [`DbError::DefinitionMissing`].
    pub fn without_definition(store: Arc<dyn FileStore>) -> Self {
        Self {
            definition: None,
            store,
        }
    }

    pub fn definition(&self) -> Option<&Definition> {
        self.definition.as_deref()
    }

    pub fn read_transaction(&self) -> ReadTransaction {
        ReadTransaction::new(self.definition.clone(), self.store.clone())
    }

    pub fn readwrite_transaction(&self) -> ReadwriteTransaction {
        ReadwriteTransaction::new(self.definition.clone(), self.store.clone())
    }

    /// Run `f` against a fresh readwrite transaction.
    ///
    /// The closure is invoked exactly once. A revision conflict inside it is
    /// returned to the caller, who decides whether to run it again.
    pub async fn run_readwrite<F, Fut, T>(&self, ctx: &OpContext, f: F) -> DbResult<T>
    where
        F: FnOnce(ReadwriteTransaction, OpContext) -> Fut,
        Fut: Future<Output = DbResult<T>>,
    {
        if ctx.is_cancelled() {
            return Err(DbError::Cancelled);
        }
        debug!("starting readwrite transaction");
        f(self.readwrite_transaction(), ctx.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use filedb_store::InMemoryFileStore;
    use filedb_types::{Record, RecordKey};
    use serde_json::json;

    #[tokio::test]
    async fn run_readwrite_commits() {
        let store = Arc::new(InMemoryFileStore::new());
        let db = fixtures::database(&store);

        let id = db
            .run_readwrite(&OpContext::new(), |tx, ctx| async move {
                let key = RecordKey::new("tags", "active");
                tx.insert(&ctx, &Record::new(key.clone(), json!({"title": "Active"})))
                    .await?;
                Ok(key.id)
            })
            .await
            .unwrap();
        assert_eq!(id, "active");
        assert_eq!(store.file_text("tags/active.yaml").unwrap(), "title: Active\n");
    }

    #[tokio::test]
    async fn run_readwrite_refuses_cancelled_context() {
        let store = Arc::new(InMemoryFileStore::new());
        let db = fixtures::database(&store);
        let ctx = OpContext::new();
        ctx.cancel();

        let err = db
            .run_readwrite(&ctx, |_, _| async { Ok(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Cancelled));
    }

    #[test]
    fn transactions_share_definition() {
        let store = Arc::new(InMemoryFileStore::new());
        let db = fixtures::database(&store);
        assert!(db.read_transaction().definition().is_some());
        assert!(db.readwrite_transaction().reader().definition().is_some());
        assert!(Database::without_definition(store).definition().is_none());
    }
}
