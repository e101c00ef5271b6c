use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Columns every extract must carry. Anything else in the header is kept on the raw
/// record but never read downstream.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "time",
    "latitude",
    "longitude",
    "depth",
    "mag",
    "place",
];

/// One untyped row of an extract, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Returns the value exactly as it appeared in the extract, or `None` when the row
    /// had no cell for this column.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractMetadata {
    pub path: Option<PathBuf>,
    pub file_hash: String,
    pub columns: Vec<String>,
}

/// A fully materialized batch of raw records in extract order.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub metadata: Option<ExtractMetadata>,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
