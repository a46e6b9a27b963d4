//! # Database Operations
//!
//! Everything between the resolver and the relational store.
//!
//! ## Key Components
//!
//! - [`data_access`] - The [`DataAccess`] seam plus raw row types
//! - [`queries`] - Catalogue of every statement the enquiry core issues
//! - [`fetcher`] - [`RecordFetcher`], which runs one statement with logging and error context
//! - [`postgres`] - [`PgDataAccess`], the SQLx PostgreSQL implementation
//! - [`in_memory`] - [`InMemoryDataAccess`], a scripted implementation for tests and demos
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vehicle_enquiry::config::EnquiryConfig;
//! use vehicle_enquiry::database::{PgDataAccess, Query, RecordFetcher};
//! use vehicle_enquiry::observer::TracingObserver;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EnquiryConfig::load()?;
//! let store = PgDataAccess::connect(&config.database).await?;
//!
//! let fetcher = RecordFetcher::new(Arc::new(store), Arc::new(TracingObserver));
//! let rows = fetcher.fetch_by(Query::VehicleDetailsByVrm, "AB12CDE").await?;
//! println!("{} vehicle rows", rows.len());
//! # Ok(())
//! # }
//! ```

pub mod data_access;
pub mod fetcher;
pub mod in_memory;
pub mod postgres;
pub mod queries;

pub use data_access::{DataAccess, FieldInfo, QueryRow, RowSet, ID_COLUMN, RESULT_COLUMN};
pub use fetcher::RecordFetcher;
pub use in_memory::{InMemoryDataAccess, RecordedCall};
pub use postgres::PgDataAccess;
pub use queries::Query;
