//! # PostgreSQL Data Access
//!
//! [`DataAccess`] over a SQLx PostgreSQL pool. Every fetch checks a connection out
//! of the pool for the lifetime of one statement and returns it afterwards, so the
//! many concurrent fetches of one hydration never share a connection.
//!
//! Parameters are bound as text; statements cast where they compare against
//! non-text columns. Result columns are decoded into JSON values by their
//! PostgreSQL type name.

use crate::config::DatabaseConfig;
use crate::database::data_access::{DataAccess, FieldInfo, QueryRow, RowSet};
use crate::error::{DataStoreError, EnquiryError, EnquiryResult};
use async_trait::async_trait;
use serde_json::{Map, Number, Value};
use sqlx::postgres::{PgColumn, PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Row, TypeInfo};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Clone)]
pub struct PgDataAccess {
    pool: PgPool,
}

impl std::fmt::Debug for PgDataAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgDataAccess")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

impl PgDataAccess {
    /// Build a pool from validated configuration and connect it
    pub async fn connect(config: &DatabaseConfig) -> EnquiryResult<Self> {
        config.validate()?;
        let options = config.connect_options()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| EnquiryError::data_access("connect", &DataStoreError::from(e)))?;

        info!(
            host = %config.host,
            database = %config.database,
            max_connections = config.max_connections,
            "Database pool established"
        );

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<bool, DataStoreError> {
        let row = sqlx::query("SELECT 1 AS health")
            .fetch_one(&self.pool)
            .await?;

        let health: i32 = row.try_get("health")?;
        Ok(health == 1)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DataAccess for PgDataAccess {
    async fn fetch(&self, query: &str, params: &[String]) -> Result<RowSet, DataStoreError> {
        let mut statement = sqlx::query(query);
        for param in params {
            statement = statement.bind(param.as_str());
        }

        let pg_rows = statement.fetch_all(&self.pool).await?;

        let fields = pg_rows
            .first()
            .map(|row| row.columns().iter().map(describe_column).collect())
            .unwrap_or_default();

        let rows = pg_rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(row_count = rows.len(), "Statement returned");

        Ok(RowSet::new(rows, fields))
    }
}

fn describe_column(column: &PgColumn) -> FieldInfo {
    FieldInfo::new(column.name(), column.type_info().name())
}

fn decode_row(row: &PgRow) -> Result<QueryRow, DataStoreError> {
    let mut columns = Map::new();
    for column in row.columns() {
        columns.insert(column.name().to_string(), decode_column(row, column)?);
    }
    Ok(QueryRow::new(columns))
}

fn decode_column(row: &PgRow, column: &PgColumn) -> Result<Value, DataStoreError> {
    let index = column.ordinal();
    let type_name = column.type_info().name();

    let value = match type_name {
        "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => row
            .try_get::<Option<String>, _>(index)?
            .map(Value::String),
        "INT2" => row.try_get::<Option<i16>, _>(index)?.map(Value::from),
        "INT4" => row.try_get::<Option<i32>, _>(index)?.map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)?
            .and_then(|v| Number::from_f64(f64::from(v)))
            .map(Value::Number),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(index)?
            .and_then(Number::from_f64)
            .map(Value::Number),
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::Bool),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index)?,
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(index)?
            .map(|v| Value::String(v.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)?
            .map(|v| Value::String(v.to_rfc3339())),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)?
            .map(|v| Value::String(v.to_string())),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)?
            .map(|v| Value::String(v.to_string())),
        other => {
            return Err(DataStoreError::UnsupportedColumn {
                column: column.name().to_string(),
                type_name: other.to_string(),
            })
        }
    };

    Ok(value.unwrap_or(Value::Null))
}
