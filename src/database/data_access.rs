//! # Data Access Seam
//!
//! The single capability the enquiry core needs from a data store: run one
//! parameterized statement and hand back the rows it produced together with the
//! column metadata.

use crate::error::DataStoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Column carrying a record's internal identifier
pub const ID_COLUMN: &str = "id";

/// Column carrying a record's JSON payload
pub const RESULT_COLUMN: &str = "result";

/// Name and database type of one result column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub type_name: String,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// One raw result row, column name to decoded value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryRow(Map<String, Value>);

impl QueryRow {
    pub fn new(columns: Map<String, Value>) -> Self {
        Self(columns)
    }

    /// Row in the `id` / `result` shape every catalogue statement returns
    pub fn keyed(id: impl Into<String>, result: Value) -> Self {
        let mut columns = Map::new();
        columns.insert(ID_COLUMN.to_string(), Value::String(id.into()));
        columns.insert(RESULT_COLUMN.to_string(), result);
        Self(columns)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.0.insert(column.into(), value);
    }

    pub fn columns(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_columns(self) -> Map<String, Value> {
        self.0
    }
}

/// Rows plus column metadata returned by a single statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    pub rows: Vec<QueryRow>,
    pub fields: Vec<FieldInfo>,
}

impl RowSet {
    pub fn new(rows: Vec<QueryRow>, fields: Vec<FieldInfo>) -> Self {
        Self { rows, fields }
    }

    /// Row set in the `id` / `result` shape
    pub fn keyed(rows: Vec<QueryRow>) -> Self {
        Self {
            rows,
            fields: vec![
                FieldInfo::new(ID_COLUMN, "TEXT"),
                FieldInfo::new(RESULT_COLUMN, "JSON"),
            ],
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Execute parameterized statements against a data store.
///
/// Implementations acquire and release whatever connection they need per call;
/// the core issues many calls concurrently and shares one instance between them.
#[async_trait]
pub trait DataAccess: Send + Sync + Debug {
    /// Run `query` with positional text `params` and return every row
    async fn fetch(&self, query: &str, params: &[String]) -> Result<RowSet, DataStoreError>;
}
