//! Shared definitions for unit tests.

use std::sync::Arc;

use filedb_store::InMemoryFileStore;
use filedb_types::{
    CollectionDef, ColumnDef, ColumnType, Definition, RecordFileDef, RecordType,
};

use crate::database::Database;

/// Collections used across the test suite:
///
/// - `tags`: one YAML file per record under `tags/`
/// - `statuses`: one JSON map at `data/statuses.json`
/// - `labels`: one YAML file per record with `title` localized to `en`
/// - `phrases`: one YAML map at `phrases.yaml` with `text` localized to `en`
/// - `events`: list layout, unsupported
/// - `notes`: unknown `xml` format
/// - `bare`: no record file
pub(crate) fn definition() -> Definition {
    Definition::new()
        .with_collection(
            CollectionDef::new("tags", "tags").with_record_file(RecordFileDef::new(
                "{key}.yaml",
                "yaml",
                RecordType::SingleRecord,
            )),
        )
        .with_collection(
            CollectionDef::new("statuses", "data").with_record_file(RecordFileDef::new(
                "statuses.json",
                "json",
                RecordType::MapOfIdRecords,
            )),
        )
        .with_collection(
            CollectionDef::new("labels", "labels")
                .with_record_file(RecordFileDef::new("{key}.yaml", "yaml", RecordType::SingleRecord))
                .with_column("title", ColumnDef::localized(ColumnType::String, "en"))
                .with_column("color", ColumnDef::new(ColumnType::String)),
        )
        .with_collection(
            CollectionDef::new("phrases", "")
                .with_record_file(RecordFileDef::new("phrases.yaml", "yaml", RecordType::MapOfIdRecords))
                .with_column("text", ColumnDef::localized(ColumnType::String, "en")),
        )
        .with_collection(
            CollectionDef::new("events", "events").with_record_file(RecordFileDef::new(
                "events.yaml",
                "yaml",
                RecordType::ListOfRecords,
            )),
        )
        .with_collection(
            CollectionDef::new("notes", "notes").with_record_file(RecordFileDef::new(
                "{key}.xml",
                "xml",
                RecordType::SingleRecord,
            )),
        )
        .with_collection(CollectionDef::new("bare", "bare"))
}

/// A database over `store` using [`definition`].
pub(crate) fn database(store: &Arc<InMemoryFileStore>) -> Database {
    Database::new(definition(), store.clone())
}
