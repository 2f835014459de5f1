use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::column::FieldPath;
use crate::domain::GridError;

// A null in the source reads as the field's default, the same way a missing field does.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn tags_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Option::<Vec<Option<String>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(tags.into_iter().map(Option::unwrap_or_default).collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Name {
    #[serde(deserialize_with = "null_as_default")]
    pub first: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last: String,
}

/// Monetary value as found in the source, either preformatted text or a plain number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Balance {
    Text(String),
    Amount(f64),
}

impl Default for Balance {
    fn default() -> Self {
        Balance::Text(String::new())
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Balance::Text(s) => write!(f, "{s}"),
            Balance::Amount(a) => write!(f, "{a}"),
        }
    }
}

impl From<&str> for Balance {
    fn from(s: &str) -> Self {
        Balance::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordData {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub balance: Balance,
    #[serde(deserialize_with = "null_as_default")]
    pub picture: String,
    #[serde(deserialize_with = "null_as_default")]
    pub age: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub name: Name,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "tags_or_empty")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub favorite_fruit: String,
}

/// One row. The typed view and the structured value are built together at load and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    data: RecordData,
    value: Value,
}

impl Record {
    pub fn data(&self) -> &RecordData {
        &self.data
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn resolve(&self, path: &FieldPath) -> String {
        path.resolve(&self.value)
    }
}

#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn from_values(values: Vec<Value>) -> Result<Self, GridError> {
        let records = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let data = RecordData::deserialize(&value)
                    .map_err(|source| GridError::InvalidRecord { index, source })?;
                Ok(Record { data, value })
            })
            .collect::<Result<Vec<_>, GridError>>()?;
        debug!("Record store holds {} records", records.len());
        Ok(RecordStore { records })
    }

    pub fn from_records(records: Vec<RecordData>) -> Result<Self, GridError> {
        let records = records
            .into_iter()
            .map(|data| {
                let value = serde_json::to_value(&data)?;
                Ok(Record { data, value })
            })
            .collect::<Result<Vec<_>, GridError>>()?;
        Ok(RecordStore { records })
    }

    pub fn from_json_str(json: &str) -> Result<Self, GridError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Array(values) => Self::from_values(values),
            _ => Err(GridError::NotAnArray),
        }
    }

    /// Reads a json array of records from disk.
    pub fn load(path: &Path) -> Result<Self, GridError> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => GridError::FileNotFound,
            ErrorKind::PermissionDenied => GridError::PermissionDenied,
            _ => GridError::IoError(e),
        })?;
        if !metadata.is_file() {
            return Err(GridError::LoadingFailed("Not a file!".into()));
        }
        Self::detect_file_type(path)?;

        let start_time = Instant::now();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => GridError::PermissionDenied,
            _ => GridError::IoError(e),
        })?;
        let store = Self::from_json_str(&content)?;
        info!(
            "Loading {} records ({} bytes) took {}ms ...",
            store.len(),
            metadata.len(),
            start_time.elapsed().as_millis()
        );
        Ok(store)
    }

    fn detect_file_type(path: &Path) -> Result<(), GridError> {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_uppercase())
            .as_deref()
        {
            Some("JSON") => Ok(()),
            _ => Err(GridError::UnknownFileType),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Record> {
        self.records.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Maps view indices back to records. Unknown indices are skipped.
    pub fn records<'a>(&'a self, rows: &'a [usize]) -> impl Iterator<Item = &'a Record> + 'a {
        rows.iter().filter_map(|&idx| self.records.get(idx))
    }

    pub fn resolve(&self, idx: usize, path: &FieldPath) -> String {
        self.records
            .get(idx)
            .map(|r| r.resolve(path))
            .unwrap_or_default()
    }
}
