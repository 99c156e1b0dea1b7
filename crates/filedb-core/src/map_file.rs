//! Records stored together in one file keyed by record id.
//!
//! Every mutation reads the whole file, changes one entry, and rewrites the
//! whole file under the revision tag it read.

use filedb_codec::RecordMap;
use filedb_store::FileSnapshot;
use filedb_types::{FieldMap, Record, RevisionTag};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::layout::Target;
use crate::port::Port;
use crate::single_file::PutMode;

fn decode(target: &Target, snapshot: Option<&FileSnapshot>) -> DbResult<RecordMap> {
    match snapshot {
        Some(snap) => target
            .codec
            .decode_record_map(&snap.content)
            .map_err(|e| DbError::format(target.path(), e)),
        None => Ok(RecordMap::new()),
    }
}

async fn rewrite(
    port: &Port<'_>,
    target: &Target,
    records: &RecordMap,
    expected: &RevisionTag,
    message: &str,
) -> DbResult<RevisionTag> {
    let path = target.path();
    let content = target
        .codec
        .encode_record_map(records)
        .map_err(|e| DbError::format(path, e))?;
    debug!(path, records = records.len(), "rewriting shared record file");
    port.write(path, message, &content, expected).await
}

pub(crate) async fn get(port: &Port<'_>, target: &Target, record: &mut Record) -> DbResult<()> {
    let path = target.path();
    let Some(content) = port.read(path).await? else {
        debug!(path, "shared record file absent");
        record.set_missing();
        return Ok(());
    };
    let records = target
        .codec
        .decode_record_map(&content)
        .map_err(|e| DbError::format(path, e))?;
    match records.get(&target.key.id) {
        Some(raw) => record.set_found(target.codec.project_read(raw)),
        None => record.set_missing(),
    }
    Ok(())
}

pub(crate) async fn put(
    port: &Port<'_>,
    target: &Target,
    fields: &FieldMap,
    mode: PutMode,
    message: &str,
) -> DbResult<RevisionTag> {
    let snapshot = port.read_with_revision(target.path()).await?;
    let mut records = decode(target, snapshot.as_ref())?;

    let id = &target.key.id;
    if mode == PutMode::Insert && records.contains_key(id) {
        return Err(DbError::RecordAlreadyExists(target.key.clone()));
    }

    let on_disk = target.codec.project_write(fields, records.get(id));
    records.insert(id.clone(), on_disk);

    let expected = snapshot.map(|s| s.revision).unwrap_or_else(RevisionTag::none);
    rewrite(port, target, &records, &expected, message).await
}

pub(crate) async fn delete(port: &Port<'_>, target: &Target, message: &str) -> DbResult<()> {
    let Some(snapshot) = port.read_with_revision(target.path()).await? else {
        return Err(DbError::RecordNotFound(target.key.clone()));
    };
    let mut records = decode(target, Some(&snapshot))?;
    if records.remove(&target.key.id).is_none() {
        return Err(DbError::RecordNotFound(target.key.clone()));
    }
    // The file stays even when no records remain.
    rewrite(port, target, &records, &snapshot.revision, message).await?;
    Ok(())
}
