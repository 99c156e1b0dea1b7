//! In-memory file store for tests and embedding.
//!
//! [`InMemoryFileStore`] keeps every file in a `BTreeMap` behind a `RwLock`
//! and enforces the same revision-tag rules as a remote content API, so it
//! can stand in for the remote store in tests. Every successful mutation is
//! appended to an observable history.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use filedb_types::RevisionTag;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::path::normalize_store_path;
use crate::snapshot::{ChangeEntry, ChangeKind, DirEntry, EntryKind, FileSnapshot};
use crate::traits::{check_delete_revision, check_write_revision, FileStore};

/// An in-memory implementation of [`FileStore`].
#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
    history: RwLock<Vec<ChangeEntry>>,
    faults: Mutex<VecDeque<StoreError>>,
}

fn poisoned<E>(_: E) -> StoreError {
    StoreError::Internal("lock poisoned".into())
}

impl InMemoryFileStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without recording history.
    pub fn with_file(self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        if let Ok(path) = normalize_store_path(path) {
            if let Ok(mut files) = self.files.write() {
                files.insert(path, content.into());
            }
        }
        self
    }

    /// Current content of a file, bypassing the port.
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        let path = normalize_store_path(path).ok()?;
        self.files.read().ok()?.get(&path).cloned()
    }

    /// Current content of a file as UTF-8 text.
    pub fn file_text(&self, path: &str) -> Option<String> {
        self.file(path).and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// Number of files in the store.
    pub fn len(&self) -> usize {
        self.files.read().map(|f| f.len()).unwrap_or(0)
    }

    /// Returns `true` if the store holds no files.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All recorded changes, oldest first.
    pub fn history(&self) -> Vec<ChangeEntry> {
        self.history.read().map(|h| h.clone()).unwrap_or_default()
    }

    /// Make the next port call fail with `error`. Faults queue up in order.
    pub fn fail_next(&self, error: StoreError) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.push_back(error);
        }
    }

    fn take_fault(&self) -> StoreResult<()> {
        let mut faults = self.faults.lock().map_err(poisoned)?;
        match faults.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn record(&self, entry: ChangeEntry) -> StoreResult<()> {
        self.history.write().map_err(poisoned)?.push(entry);
        Ok(())
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn read_with_revision(&self, path: &str) -> StoreResult<Option<FileSnapshot>> {
        self.take_fault()?;
        let path = normalize_store_path(path)?;
        let files = self.files.read().map_err(poisoned)?;
        Ok(files.get(&path).cloned().map(FileSnapshot::of_content))
    }

    async fn write(
        &self,
        path: &str,
        message: &str,
        content: &[u8],
        expected: &RevisionTag,
    ) -> StoreResult<RevisionTag> {
        self.take_fault()?;
        let path = normalize_store_path(path)?;
        let revision = RevisionTag::of_content(content);
        {
            let mut files = self.files.write().map_err(poisoned)?;
            let current = files.get(&path).map(|c| RevisionTag::of_content(c));
            check_write_revision(&path, current.as_ref(), expected)?;
            files.insert(path.clone(), content.to_vec());
        }
        debug!(path = %path, revision = %revision.short(), "file written");
        self.record(ChangeEntry::new(path, message, ChangeKind::Write, revision.clone()))?;
        Ok(revision)
    }

    async fn delete(&self, path: &str, message: &str, expected: &RevisionTag) -> StoreResult<()> {
        self.take_fault()?;
        let path = normalize_store_path(path)?;
        {
            let mut files = self.files.write().map_err(poisoned)?;
            let current = files.get(&path).map(|c| RevisionTag::of_content(c));
            check_delete_revision(&path, current.as_ref(), expected)?;
            files.remove(&path);
        }
        debug!(path = %path, "file deleted");
        self.record(ChangeEntry::new(path, message, ChangeKind::Delete, expected.clone()))
    }

    async fn list_dir(&self, path: &str) -> StoreResult<Vec<DirEntry>> {
        self.take_fault()?;
        let dir = normalize_store_path(path)?;
        let prefix = if dir == "." { String::new() } else { format!("{dir}/") };

        let files = self.files.read().map_err(poisoned)?;
        let mut entries = BTreeSet::new();
        for key in files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            let (name, kind) = match rest.split_once('/') {
                Some((dir_name, _)) => (dir_name, EntryKind::Dir),
                None => (rest, EntryKind::File),
            };
            entries.insert(DirEntry {
                name: name.to_string(),
                path: format!("{prefix}{name}"),
                kind,
            });
        }

        if entries.is_empty() && !prefix.is_empty() {
            return Err(StoreError::NotFound { path: dir });
        }
        Ok(entries.into_iter().collect())
    }
}
