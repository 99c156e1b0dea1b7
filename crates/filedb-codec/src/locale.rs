//! Locale projection between flat record fields and nested on-disk values.
//!
//! A column declared with locale `en` is stored as
//!
//! ```yaml
//! title:
//!   en: Active
//!   ru: Aktivnyy
//! ```
//!
//! and surfaces on the record as `title: Active`. Columns without a locale
//! tag pass through unchanged in both directions.

use filedb_types::{CollectionDef, FieldMap};
use serde_json::Value;

/// The localized columns of one collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocaleProjection {
    columns: Vec<(String, String)>,
}

impl LocaleProjection {
    /// A projection over explicit `(column, locale)` pairs.
    pub fn new<I, C, L>(columns: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|(c, l)| (c.into(), l.into()))
                .collect(),
        }
    }

    /// The projection declared by a collection's columns.
    pub fn for_collection(collection: &CollectionDef) -> Self {
        Self::new(collection.localized_columns())
    }

    /// `true` if no column is localized.
    pub fn is_identity(&self) -> bool {
        self.columns.is_empty()
    }

    /// Flatten localized columns of an on-disk field map.
    ///
    /// A nested mapping missing the declared locale leaves the column absent
    /// from the result. A column whose on-disk value is not a mapping passes
    /// through as-is.
    pub fn project_read(&self, raw: &FieldMap) -> FieldMap {
        let mut out = raw.clone();
        for (column, locale) in &self.columns {
            if let Some(Value::Object(variants)) = raw.get(column) {
                match variants.get(locale) {
                    Some(value) => {
                        out.insert(column.clone(), value.clone());
                    }
                    None => {
                        out.remove(column);
                    }
                }
            }
        }
        out
    }

    /// Nest flat localized fields back under their locale.
    ///
    /// `existing` is the on-disk field map previously read for the same
    /// record, if any. Locale variants present there are kept; only the
    /// declared locale is replaced. When the incoming record omits a localized
    /// column, just its declared locale is dropped.
    pub fn project_write(&self, incoming: &FieldMap, existing: Option<&FieldMap>) -> FieldMap {
        let mut out = incoming.clone();
        for (column, locale) in &self.columns {
            let mut variants = existing
                .and_then(|e| e.get(column))
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();

            match incoming.get(column) {
                Some(value) => {
                    variants.insert(locale.clone(), value.clone());
                }
                None => {
                    variants.remove(locale);
                }
            }

            if variants.is_empty() {
                out.remove(column);
            } else {
                out.insert(column.clone(), Value::Object(variants));
            }
        }
        out
    }
}
