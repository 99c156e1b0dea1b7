//! Records stored one per file.

use filedb_types::{FieldMap, Record, RevisionTag};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::layout::Target;
use crate::port::Port;

/// How a put treats an existing record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PutMode {
    /// Create or replace.
    Set,
    /// Create only; fail if the record exists.
    Insert,
}

pub(crate) async fn get(port: &Port<'_>, target: &Target, record: &mut Record) -> DbResult<()> {
    let path = target.path();
    let Some(content) = port.read(path).await? else {
        debug!(path, "record file absent");
        record.set_missing();
        return Ok(());
    };
    let raw = target
        .codec
        .decode_fields(&content)
        .map_err(|e| DbError::format(path, e))?;
    record.set_found(target.codec.project_read(&raw));
    Ok(())
}

pub(crate) async fn put(
    port: &Port<'_>,
    target: &Target,
    fields: &FieldMap,
    mode: PutMode,
    message: &str,
) -> DbResult<RevisionTag> {
    let path = target.path();
    let snapshot = port.read_with_revision(path).await?;

    if mode == PutMode::Insert && snapshot.is_some() {
        return Err(DbError::RecordAlreadyExists(target.key.clone()));
    }

    // Other locale variants on disk survive only if we merge against them.
    let existing = match &snapshot {
        Some(snap) if target.codec.merges_on_write() => Some(
            target
                .codec
                .decode_fields(&snap.content)
                .map_err(|e| DbError::format(path, e))?,
        ),
        _ => None,
    };

    let on_disk = target.codec.project_write(fields, existing.as_ref());
    let content = target
        .codec
        .encode_fields(&on_disk)
        .map_err(|e| DbError::format(path, e))?;

    let expected = snapshot.map(|s| s.revision).unwrap_or_else(RevisionTag::none);
    port.write(path, message, &content, &expected).await
}

pub(crate) async fn delete(port: &Port<'_>, target: &Target, message: &str) -> DbResult<()> {
    let path = target.path();
    let Some(snapshot) = port.read_with_revision(path).await? else {
        return Err(DbError::RecordNotFound(target.key.clone()));
    };
    port.delete(path, message, &snapshot.revision).await
}
