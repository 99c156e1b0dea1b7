//! File store backed by a local directory.
//!
//! Useful for working against a checked-out copy of a repository. Writes go
//! through a temporary file that is atomically persisted over the target.
//! Change descriptions are appended to `.filedb/history.log` as JSON lines.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use filedb_types::RevisionTag;
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{StoreError, StoreResult};
use crate::path::normalize_store_path;
use crate::snapshot::{ChangeEntry, ChangeKind, DirEntry, EntryKind, FileSnapshot};
use crate::traits::{check_delete_revision, check_write_revision, FileStore};

/// Directory, relative to the root, holding store metadata.
pub const META_DIR: &str = ".filedb";

/// Change log inside [`META_DIR`].
pub const HISTORY_FILE: &str = "history.log";

/// A [`FileStore`] over a directory on disk.
#[derive(Clone, Debug)]
pub struct LocalFileStore {
    root: PathBuf,
    // Serializes check-then-write sequences within this process.
    write_lock: Arc<Mutex<()>>,
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl LocalFileStore {
    /// Open a store rooted at an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        let meta = fs::metadata(&root).map_err(|e| io_error(&root, e))?;
        if !meta.is_dir() {
            return Err(StoreError::InvalidPath {
                path: root.display().to_string(),
                reason: "store root is not a directory".into(),
            });
        }
        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All recorded changes, oldest first.
    pub fn history(&self) -> StoreResult<Vec<ChangeEntry>> {
        let log = self.root.join(META_DIR).join(HISTORY_FILE);
        let text = match fs::read_to_string(&log) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&log, e)),
        };
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .map_err(|e| StoreError::Internal(format!("corrupt history entry: {e}")))
            })
            .collect()
    }

    fn resolve(&self, path: &str) -> StoreResult<(String, PathBuf)> {
        let rel = normalize_store_path(path)?;
        if rel == META_DIR || rel.starts_with(&format!("{META_DIR}/")) {
            return Err(StoreError::InvalidPath {
                path: path.to_string(),
                reason: format!("{META_DIR} is reserved"),
            });
        }
        let abs = if rel == "." {
            self.root.clone()
        } else {
            self.root.join(&rel)
        };
        Ok((rel, abs))
    }

    async fn blocking<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(LocalFileStore) -> StoreResult<T> + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || f(this))
            .await
            .map_err(|e| StoreError::Internal(format!("blocking task failed: {e}")))?
    }

    fn read_current(abs: &Path) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(abs) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(abs, e)),
        }
    }

    fn append_history(&self, entry: &ChangeEntry) -> StoreResult<()> {
        let meta = self.root.join(META_DIR);
        fs::create_dir_all(&meta).map_err(|e| io_error(&meta, e))?;
        let log = meta.join(HISTORY_FILE);
        let line = serde_json::to_string(entry)
            .map_err(|e| StoreError::Internal(format!("history encoding failed: {e}")))?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log)
            .map_err(|e| io_error(&log, e))?;
        writeln!(file, "{line}").map_err(|e| io_error(&log, e))
    }

    fn write_blocking(
        &self,
        rel: &str,
        abs: &Path,
        message: &str,
        content: &[u8],
        expected: &RevisionTag,
    ) -> StoreResult<RevisionTag> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Internal("lock poisoned".into()))?;

        let current = Self::read_current(abs)?.map(|c| RevisionTag::of_content(&c));
        check_write_revision(rel, current.as_ref(), expected)?;

        let parent = abs.parent().unwrap_or(self.root.as_path());
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| io_error(parent, e))?;
        tmp.write_all(content).map_err(|e| io_error(abs, e))?;
        tmp.persist(abs).map_err(|e| io_error(abs, e.error))?;

        let revision = RevisionTag::of_content(content);
        self.append_history(&ChangeEntry::new(rel, message, ChangeKind::Write, revision.clone()))?;
        Ok(revision)
    }

    fn delete_blocking(&self, rel: &str, abs: &Path, message: &str, expected: &RevisionTag) -> StoreResult<()> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Internal("lock poisoned".into()))?;

        let current = Self::read_current(abs)?.map(|c| RevisionTag::of_content(&c));
        check_delete_revision(rel, current.as_ref(), expected)?;
        fs::remove_file(abs).map_err(|e| io_error(abs, e))?;

        self.append_history(&ChangeEntry::new(rel, message, ChangeKind::Delete, expected.clone()))
    }

    fn list_blocking(&self, rel: &str, abs: &Path) -> StoreResult<Vec<DirEntry>> {
        if !abs.is_dir() {
            return Err(StoreError::NotFound { path: rel.to_string() });
        }
        let prefix = if rel == "." { String::new() } else { format!("{rel}/") };
        let mut entries = Vec::new();
        for entry in WalkDir::new(abs).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| StoreError::Internal(format!("directory walk failed: {e}")))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if prefix.is_empty() && name == META_DIR {
                continue;
            }
            let kind = if entry.file_type().is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(DirEntry {
                path: format!("{prefix}{name}"),
                name,
                kind,
            });
        }
        Ok(entries)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn read_with_revision(&self, path: &str) -> StoreResult<Option<FileSnapshot>> {
        let (_, abs) = self.resolve(path)?;
        let content = self.blocking(move |_| Self::read_current(&abs)).await?;
        Ok(content.map(FileSnapshot::of_content))
    }

    async fn write(
        &self,
        path: &str,
        message: &str,
        content: &[u8],
        expected: &RevisionTag,
    ) -> StoreResult<RevisionTag> {
        let (rel, abs) = self.resolve(path)?;
        let message = message.to_string();
        let content = content.to_vec();
        let expected = expected.clone();
        let revision = self
            .blocking(move |store| store.write_blocking(&rel, &abs, &message, &content, &expected))
            .await?;
        debug!(path, revision = %revision.short(), "file written");
        Ok(revision)
    }

    async fn delete(&self, path: &str, message: &str, expected: &RevisionTag) -> StoreResult<()> {
        let (rel, abs) = self.resolve(path)?;
        let message = message.to_string();
        let expected = expected.clone();
        self.blocking(move |store| store.delete_blocking(&rel, &abs, &message, &expected))
            .await?;
        debug!(path, "file deleted");
        Ok(())
    }

    async fn list_dir(&self, path: &str) -> StoreResult<Vec<DirEntry>> {
        let (rel, abs) = self.resolve(path)?;
        self.blocking(move |store| store.list_blocking(&rel, &abs)).await
    }
}
