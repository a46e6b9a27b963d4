//! Error types for the enquiry core.
//!
//! [`EnquiryError`] is the only error a caller of the resolver ever sees. Data-access
//! adapters report [`DataStoreError`], which the record fetcher wraps together with
//! the name of the query that failed.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnquiryError {
    /// Root record, or the whole result set of a bulk lookup, is absent
    #[error("{0}")]
    NotFound(String),
    /// Caller supplied no usable identifier for the requested lookup
    #[error("Parameters error: {0}")]
    Parameters(String),
    /// A query against the data store failed
    #[error("Database error: {reason}")]
    DataAccess { query: String, reason: String },
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl EnquiryError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn parameters(message: impl Into<String>) -> Self {
        Self::Parameters(message.into())
    }

    pub fn data_access(query: impl Into<String>, source: &DataStoreError) -> Self {
        Self::DataAccess {
            query: query.into(),
            reason: source.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_parameters(&self) -> bool {
        matches!(self, Self::Parameters(_))
    }

    pub fn is_data_access(&self) -> bool {
        matches!(self, Self::DataAccess { .. })
    }

    /// HTTP status an outer web layer should answer with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Parameters(_) => 400,
            Self::NotFound(_) => 404,
            Self::DataAccess { .. } | Self::Configuration(_) => 500,
        }
    }
}

impl From<config::ConfigError> for EnquiryError {
    fn from(error: config::ConfigError) -> Self {
        EnquiryError::Configuration(error.to_string())
    }
}

/// Failure raised by a [`DataAccess`](crate::database::DataAccess) implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataStoreError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("unsupported column type {type_name} for column {column}")]
    UnsupportedColumn { column: String, type_name: String },
}

impl From<sqlx::Error> for DataStoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DataStoreError::Connection(err.to_string())
            }
            other => DataStoreError::Query(other.to_string()),
        }
    }
}

pub type EnquiryResult<T> = Result<T, EnquiryError>;
