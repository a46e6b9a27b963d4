//! Validation of raw `id` / `result` rows into typed records.
//!
//! Every entry point and every hydration step goes through [`RootRecord::from_row`]
//! or [`child_payload`]; nothing else inspects raw row shapes.

use crate::database::data_access::{QueryRow, ID_COLUMN, RESULT_COLUMN};
use serde_json::{Map, Value};

/// Opaque JSON object carried by a record
pub type Payload = Map<String, Value>;

/// A record keyed by its internal identifier, ready for hydration.
#[derive(Debug, Clone, PartialEq)]
pub struct RootRecord {
    pub id: String,
    pub payload: Payload,
}

impl RootRecord {
    pub fn new(id: impl Into<String>, payload: Payload) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }

    /// `None` when the row lacks a usable identifier or an object payload
    pub fn from_row(row: QueryRow) -> Option<Self> {
        let mut columns = row.into_columns();

        let id = match columns.remove(ID_COLUMN)? {
            Value::String(id) if !id.is_empty() => id,
            Value::Number(id) => id.to_string(),
            _ => return None,
        };

        let payload = into_object(columns.remove(RESULT_COLUMN)?)?;

        Some(Self { id, payload })
    }

    /// The first row of a single-root statement
    pub fn first_of(rows: Vec<QueryRow>) -> Option<Self> {
        rows.into_iter().next().and_then(Self::from_row)
    }
}

/// Payload of a child row, `None` when the row has no object payload
pub fn child_payload(row: QueryRow) -> Option<Payload> {
    into_object(row.into_columns().remove(RESULT_COLUMN)?)
}

fn into_object(value: Value) -> Option<Payload> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
