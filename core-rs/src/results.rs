//! Mapping endpoint rows to part records
//!
//! Rows are field → value mappings keyed by the exact projected names; a
//! missing key is an optional field that did not match. One field (the
//! query's identity field) is promoted to the record identity.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// Insertion-ordered string map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldMap(IndexMap<String, String>);

/// One endpoint result row
pub type Row = FieldMap;

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace in place; returns the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Remove `key`, keeping the order of the remaining fields
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A part returned by a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    identity: Option<String>,
    attributes: FieldMap,
}

impl ResultRecord {
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.attributes.get(field)
    }

    pub fn attributes(&self) -> &FieldMap {
        &self.attributes
    }
}

/// One record per row, in row order.
///
/// A row without `identity_field` still yields a record, with no identity.
///
/// # Example
///
/// ```
/// use sbolq_core::results::{map_rows, Row};
///
/// let row: Row = [("displayId", "B0010"), ("uri", "http://x/B0010")].into_iter().collect();
/// let records = map_rows(vec![row], Some("uri"));
/// assert_eq!(records[0].identity(), Some("http://x/B0010"));
/// assert_eq!(records[0].get("displayId"), Some("B0010"));
/// ```
pub fn map_rows(rows: Vec<Row>, identity_field: Option<&str>) -> Vec<ResultRecord> {
    let mut missing = 0usize;
    let records: Vec<ResultRecord> = rows
        .into_iter()
        .map(|mut row| {
            let identity = identity_field.and_then(|field| row.remove(field));
            if identity.is_none() && identity_field.is_some() {
                missing += 1;
            }
            ResultRecord {
                identity,
                attributes: row,
            }
        })
        .collect();

    if missing > 0 {
        warn!(
            missing,
            field = identity_field.unwrap_or_default(),
            "rows without identity field kept with generic attributes only"
        );
    }
    records
}
