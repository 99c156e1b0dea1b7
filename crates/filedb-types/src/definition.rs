//! Collection definitions: how records of each collection are laid out on disk.
//!
//! A [`Definition`] is loaded once per session from YAML or TOML and is
//! immutable afterwards. Collection ids are taken from the map keys of the
//! `collections` table; an explicit `id` field, when present, must agree.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::path::{resolve_record_path, KEY_PLACEHOLDER};

/// Physical layout of a collection's records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// One file per record; the file-name template carries `{key}`.
    #[serde(rename = "map[string]any", alias = "single_record")]
    SingleRecord,
    /// One file holding a list of records. Definable, but not served by
    /// transactions.
    #[serde(rename = "[]map[string]any", alias = "list_of_records")]
    ListOfRecords,
    /// One shared file mapping record id to the record's field map.
    #[serde(rename = "map[id]map[string]any", alias = "map_of_id_records")]
    MapOfIdRecords,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleRecord => write!(f, "map[string]any"),
            Self::ListOfRecords => write!(f, "[]map[string]any"),
            Self::MapOfIdRecords => write!(f, "map[id]map[string]any"),
        }
    }
}

/// How a collection's record files are named and serialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFileDef {
    /// File-name template, e.g. `{key}.yaml` or `tags.json`.
    pub name: String,
    /// Serialization format name (`yaml` or `json`). Validated by the codec.
    pub format: String,
    /// Physical layout.
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

impl RecordFileDef {
    pub fn new(name: impl Into<String>, format: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
            record_type,
        }
    }

    /// Returns `true` if the template contains the `{key}` placeholder.
    pub fn is_keyed(&self) -> bool {
        self.name.contains(KEY_PLACEHOLDER)
    }
}

/// Declared column type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Int,
    Float,
    Bool,
    Date,
    #[default]
    Any,
}

/// A single column of a collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    /// When set, the on-disk value is nested under `column -> locale`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl ColumnDef {
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            locale: None,
        }
    }

    pub fn localized(column_type: ColumnType, locale: impl Into<String>) -> Self {
        Self {
            column_type,
            locale: Some(locale.into()),
        }
    }
}

/// Storage configuration of one collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDef {
    #[serde(default)]
    pub id: String,
    /// Directory of the collection inside the file tree.
    #[serde(default)]
    pub dir_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_file: Option<RecordFileDef>,
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnDef>,
}

impl CollectionDef {
    pub fn new(id: impl Into<String>, dir_path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dir_path: dir_path.into(),
            record_file: None,
            columns: BTreeMap::new(),
        }
    }

    pub fn with_record_file(mut self, record_file: RecordFileDef) -> Self {
        self.record_file = Some(record_file);
        self
    }

    pub fn with_column(mut self, name: impl Into<String>, column: ColumnDef) -> Self {
        self.columns.insert(name.into(), column);
        self
    }

    /// Resolve the file path holding `key`, if the record file is defined.
    pub fn record_path(&self, key: &str) -> Option<String> {
        self.record_file
            .as_ref()
            .map(|rf| resolve_record_path(&self.dir_path, &rf.name, key))
    }

    /// Columns that carry a locale tag, as `(column, locale)` pairs.
    pub fn localized_columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .filter_map(|(name, col)| col.locale.as_deref().map(|loc| (name.as_str(), loc)))
    }
}

/// Mapping from collection id to its definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionDef>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collection, keyed by its id.
    pub fn with_collection(mut self, collection: CollectionDef) -> Self {
        self.collections.insert(collection.id.clone(), collection);
        self
    }

    pub fn collection(&self, id: &str) -> Option<&CollectionDef> {
        self.collections.get(id)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Parse a definition from a YAML document.
    pub fn from_yaml_str(s: &str) -> TypeResult<Self> {
        let def: Self =
            serde_yaml::from_str(s).map_err(|e| TypeError::InvalidDefinition(e.to_string()))?;
        def.normalized()
    }

    /// Parse a definition from a TOML document.
    pub fn from_toml_str(s: &str) -> TypeResult<Self> {
        let def: Self =
            toml::from_str(s).map_err(|e| TypeError::InvalidDefinition(e.to_string()))?;
        def.normalized()
    }

    /// Load a definition file, choosing the parser by extension.
    pub fn load(path: &Path) -> TypeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TypeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            Some("toml") => Self::from_toml_str(&text),
            other => Err(TypeError::UnsupportedDefinitionFile(
                other.unwrap_or("").to_string(),
            )),
        }
    }

    /// Fill collection ids from map keys and reject inconsistent layouts.
    fn normalized(mut self) -> TypeResult<Self> {
        for (key, collection) in self.collections.iter_mut() {
            if collection.id.is_empty() {
                collection.id = key.clone();
            } else if collection.id != *key {
                return Err(TypeError::InvalidDefinition(format!(
                    "collection {key:?} declares mismatched id {:?}",
                    collection.id
                )));
            }
            if let Some(rf) = &collection.record_file {
                if rf.record_type == RecordType::MapOfIdRecords && rf.is_keyed() {
                    return Err(TypeError::InvalidDefinition(format!(
                        "collection {key:?}: shared record file {:?} must not contain {KEY_PLACEHOLDER}",
                        rf.name
                    )));
                }
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
collections:
  tags:
    dir_path: tags
    record_file:
      name: "{key}.yaml"
      format: yaml
      type: "map[string]any"
    columns:
      title:
        type: string
        locale: en
      color:
        type: string
  countries:
    dir_path: geo
    record_file:
      name: countries.json
      format: json
      type: "map[id]map[string]any"
"#;

    #[test]
    fn parse_yaml_definition() {
        let def = Definition::from_yaml_str(YAML).unwrap();
        assert_eq!(def.len(), 2);

        let tags = def.collection("tags").unwrap();
        assert_eq!(tags.id, "tags");
        let rf = tags.record_file.as_ref().unwrap();
        assert_eq!(rf.record_type, RecordType::SingleRecord);
        assert!(rf.is_keyed());
        assert_eq!(tags.columns["title"].locale.as_deref(), Some("en"));
        assert_eq!(tags.columns["color"].locale, None);

        let countries = def.collection("countries").unwrap();
        assert_eq!(
            countries.record_file.as_ref().unwrap().record_type,
            RecordType::MapOfIdRecords
        );
    }

    #[test]
    fn parse_toml_definition() {
        let toml = r#"
[collections.tags]
dir_path = "tags"

[collections.tags.record_file]
name = "{key}.json"
format = "json"
type = "single_record"
"#;
        let def = Definition::from_toml_str(toml).unwrap();
        let tags = def.collection("tags").unwrap();
        assert_eq!(tags.id, "tags");
        assert_eq!(
            tags.record_file.as_ref().unwrap().record_type,
            RecordType::SingleRecord
        );
    }

    #[test]
    fn reject_mismatched_id() {
        let yaml = "collections:\n  tags:\n    id: labels\n    dir_path: tags\n";
        let err = Definition::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, TypeError::InvalidDefinition(_)));
    }

    #[test]
    fn reject_keyed_shared_file() {
        let yaml = r#"
collections:
  tags:
    dir_path: tags
    record_file: { name: "{key}.json", format: json, type: "map[id]map[string]any" }
"#;
        assert!(Definition::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn reject_unknown_record_type() {
        let yaml = r#"
collections:
  tags:
    dir_path: tags
    record_file: { name: "{key}.json", format: json, type: "tree" }
"#;
        assert!(Definition::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn record_path_requires_record_file() {
        let bare = CollectionDef::new("tags", "tags");
        assert!(bare.record_path("x").is_none());

        let with_file = bare.with_record_file(RecordFileDef::new(
            "{key}.yaml",
            "yaml",
            RecordType::SingleRecord,
        ));
        assert_eq!(with_file.record_path("x").as_deref(), Some("tags/x.yaml"));
    }

    #[test]
    fn localized_columns_lists_only_tagged() {
        let def = CollectionDef::new("tags", "tags")
            .with_column("title", ColumnDef::localized(ColumnType::String, "en"))
            .with_column("rank", ColumnDef::new(ColumnType::Int));
        let cols: Vec<_> = def.localized_columns().collect();
        assert_eq!(cols, vec![("title", "en")]);
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("definition.ini");
        std::fs::write(&path, "collections = {}").unwrap();
        let err = Definition::load(&path).unwrap_err();
        assert!(matches!(err, TypeError::UnsupportedDefinitionFile(_)));
    }

    #[test]
    fn record_type_display() {
        assert_eq!(RecordType::SingleRecord.to_string(), "map[string]any");
        assert_eq!(RecordType::MapOfIdRecords.to_string(), "map[id]map[string]any");
    }
}
