//! A single record of tabular input data.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A mapping from column name to cell value.
///
/// A column that is missing for a particular row is simply absent; callers
/// see `None` from [`DataRow::get`]. Rows are never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRow(IndexMap<String, String>);

impl DataRow {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DataRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_is_none() {
        let row = DataRow::new().with("word", "hello");
        assert_eq!(row.get("word"), Some("hello"));
        assert_eq!(row.get("meaning"), None);
    }

    #[test]
    fn test_columns_keep_insertion_order() {
        let row: DataRow = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_row_deserializes_from_object() {
        let row: DataRow = serde_json::from_str(r#"{"word":"hello","reading":"he-llo"}"#).unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("reading"), Some("he-llo"));
    }
}
