use std::collections::BTreeMap;

use filedb_types::{CollectionDef, FieldMap, RecordFileDef};
use serde_json::Value;
use tracing::trace;

use crate::error::{FormatError, FormatResult};
use crate::format::{kind_of, RecordFormat};
use crate::locale::LocaleProjection;

/// Contents of a shared record file: record id to on-disk field map.
pub type RecordMap = BTreeMap<String, FieldMap>;

/// Codec for the record files of one collection.
///
/// Decoding methods return on-disk field maps; apply [`Self::project_read`]
/// to obtain the caller-facing view. Encoding methods expect on-disk field
/// maps produced by [`Self::project_write`].
#[derive(Clone, Debug)]
pub struct RecordCodec {
    format: RecordFormat,
    projection: LocaleProjection,
}

impl RecordCodec {
    pub fn new(format: RecordFormat, projection: LocaleProjection) -> Self {
        Self { format, projection }
    }

    /// Build the codec for a collection's record file.
    ///
    /// Fails if the declared format name is unsupported.
    pub fn for_collection(collection: &CollectionDef, record_file: &RecordFileDef) -> FormatResult<Self> {
        let format = RecordFormat::from_name(&record_file.format)?;
        Ok(Self::new(format, LocaleProjection::for_collection(collection)))
    }

    pub fn format(&self) -> RecordFormat {
        self.format
    }

    /// `true` if writes must be merged against the on-disk field map, i.e.
    /// the collection has localized columns.
    pub fn merges_on_write(&self) -> bool {
        !self.projection.is_identity()
    }

    /// Decode a single-record document into its on-disk field map.
    pub fn decode_fields(&self, bytes: &[u8]) -> FormatResult<FieldMap> {
        let value = self.format.decode(bytes)?;
        expect_mapping(value, "document root")
    }

    /// Decode a shared record file into its record map.
    ///
    /// Every entry must itself be a mapping.
    pub fn decode_record_map(&self, bytes: &[u8]) -> FormatResult<RecordMap> {
        let root = expect_mapping(self.format.decode(bytes)?, "document root")?;
        let mut records = RecordMap::new();
        for (id, value) in root {
            let fields = expect_mapping(value, &format!("record {id:?}"))?;
            records.insert(id, fields);
        }
        trace!(count = records.len(), format = %self.format, "decoded record map");
        Ok(records)
    }

    /// Encode an on-disk field map as a single-record document.
    pub fn encode_fields(&self, fields: &FieldMap) -> FormatResult<Vec<u8>> {
        self.format.encode(&Value::Object(fields.clone()))
    }

    /// Encode a full record map as a shared record file.
    pub fn encode_record_map(&self, records: &RecordMap) -> FormatResult<Vec<u8>> {
        let root: FieldMap = records
            .iter()
            .map(|(id, fields)| (id.clone(), Value::Object(fields.clone())))
            .collect();
        self.format.encode(&Value::Object(root))
    }

    /// Caller-facing view of an on-disk field map.
    pub fn project_read(&self, raw: &FieldMap) -> FieldMap {
        self.projection.project_read(raw)
    }

    /// On-disk field map for `incoming`, merged against what was on disk.
    pub fn project_write(&self, incoming: &FieldMap, existing: Option<&FieldMap>) -> FieldMap {
        self.projection.project_write(incoming, existing)
    }
}

/// A `null` document counts as an empty mapping.
fn expect_mapping(value: Value, context: &str) -> FormatResult<FieldMap> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(FieldMap::new()),
        other => Err(FormatError::NotAMapping {
            context: context.to_string(),
            found: kind_of(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedb_types::{ColumnDef, ColumnType, RecordType};
    use serde_json::json;

    fn fields(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    fn json_codec() -> RecordCodec {
        RecordCodec::new(RecordFormat::Json, LocaleProjection::default())
    }

    #[test]
    fn for_collection_rejects_unknown_format() {
        let coll = CollectionDef::new("tags", "tags");
        let rf = RecordFileDef::new("{key}.xml", "xml", RecordType::SingleRecord);
        let err = RecordCodec::for_collection(&coll, &rf).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedFormat(_)));
    }

    #[test]
    fn for_collection_picks_up_locales() {
        let coll = CollectionDef::new("tags", "tags")
            .with_column("title", ColumnDef::localized(ColumnType::String, "en"));
        let rf = RecordFileDef::new("{key}.yaml", "yaml", RecordType::SingleRecord);
        let codec = RecordCodec::for_collection(&coll, &rf).unwrap();
        assert_eq!(codec.format(), RecordFormat::Yaml);

        let raw = codec.decode_fields(b"title:\n  en: Active\n").unwrap();
        assert_eq!(codec.project_read(&raw), fields(json!({"title": "Active"})));
    }

    #[test]
    fn decode_fields_requires_mapping() {
        let err = json_codec().decode_fields(b"[1, 2]").unwrap_err();
        assert!(matches!(err, FormatError::NotAMapping { found: "sequence", .. }));
    }

    #[test]
    fn decode_record_map_requires_mapping_entries() {
        let codec = json_codec();
        let ok = codec
            .decode_record_map(br#"{"active": {"title": "Active"}, "done": {}}"#)
            .unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok["active"], fields(json!({"title": "Active"})));

        let err = codec.decode_record_map(br#"{"active": "yes"}"#).unwrap_err();
        match err {
            FormatError::NotAMapping { context, found } => {
                assert!(context.contains("active"));
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decode_record_map_rejects_non_mapping_root() {
        let err = json_codec().decode_record_map(b"\"text\"").unwrap_err();
        assert!(matches!(err, FormatError::NotAMapping { .. }));
    }

    #[test]
    fn empty_record_map_encodes_as_empty_object() {
        let out = json_codec().encode_record_map(&RecordMap::new()).unwrap();
        assert_eq!(out, b"{}\n");
        assert!(json_codec().decode_record_map(&out).unwrap().is_empty());
    }

    #[test]
    fn record_map_encoding_preserves_entries() {
        let codec = RecordCodec::new(RecordFormat::Yaml, LocaleProjection::default());
        let mut map = RecordMap::new();
        map.insert("a".into(), fields(json!({"n": 1})));
        map.insert("b".into(), fields(json!({"n": 2, "tags": ["x"]})));
        let bytes = codec.encode_record_map(&map).unwrap();
        assert_eq!(codec.decode_record_map(&bytes).unwrap(), map);
    }
}
