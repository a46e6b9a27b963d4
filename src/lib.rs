#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Vehicle Enquiry
//!
//! Read-only enquiry core for vehicles and their test history.
//!
//! ## Overview
//!
//! A caller supplies a [`models::LookupEvent`] carrying any of a VIN, a vehicle
//! registration mark, a trailer ID or a test number. The crate picks the identifier
//! to search by, fetches the root record, then hydrates it with its dependent child
//! collections before handing back one aggregate:
//!
//! - a vehicle with its technical records, each carrying brakes, axles, axle
//!   spacings and plates
//! - a list of test results, each carrying custom defects and standard defects
//!
//! Child collections are fetched concurrently: four per technical record, two per
//! test result, and all records of a list at once. Results keep the order of the
//! root query.
//!
//! ## Module Organization
//!
//! - [`services`] - entry points ([`services::EnquiryService`]) and the [`services::Hydrator`]
//! - [`database`] - the [`database::DataAccess`] seam, the SQL catalogue, the
//!   PostgreSQL and in-memory adapters and the [`database::RecordFetcher`]
//! - [`models`] - lookups, validated root records and the aggregates
//! - [`observer`] - structured reporting of lookup events
//! - [`config`] - layered configuration and stored connection details
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - [`EnquiryError`] and [`DataStoreError`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vehicle_enquiry::config::EnquiryConfig;
//! use vehicle_enquiry::database::PgDataAccess;
//! use vehicle_enquiry::models::LookupEvent;
//! use vehicle_enquiry::services::EnquiryService;
//!
//! # async fn example() -> Result<(), vehicle_enquiry::EnquiryError> {
//! vehicle_enquiry::logging::init_structured_logging();
//!
//! let config = EnquiryConfig::load()?;
//! let data_access = PgDataAccess::connect(&config.database).await?;
//! let service = EnquiryService::new(Arc::new(data_access));
//!
//! let vehicle = service
//!     .get_vehicle_details(&LookupEvent::by_vin("1HGCM82633A004352"))
//!     .await?;
//! println!("{}", serde_json::to_string(&vehicle).unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test                              # Unit and in-memory integration tests
//! DATABASE_URL=postgresql://... cargo test -- --ignored   # PostgreSQL round trips
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod observer;
pub mod services;

pub use config::{DatabaseConfig, EnquiryConfig, StoredConnectionDetails};
pub use database::{DataAccess, InMemoryDataAccess, PgDataAccess, Query, QueryRow, RowSet};
pub use error::{DataStoreError, EnquiryError, EnquiryResult};
pub use models::{Lookup, LookupEvent, TechnicalRecord, TestResult, VehicleDetails};
pub use observer::{EnquiryObserver, NoopObserver, TracingObserver};
pub use services::EnquiryService;
