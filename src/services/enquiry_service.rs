//! # Enquiry Service
//!
//! Top-level resolution of vehicles and test results.
//!
//! Every call runs `select -> fetch root -> not found? -> hydrate -> return`:
//!
//! | Entry point                  | Root statement                | Not found message       |
//! |------------------------------|-------------------------------|-------------------------|
//! | `get_vehicle_by_vrm`         | vehicle details by VRM        | `Vehicle was not found` |
//! | `get_vehicle_by_vin`         | vehicle details by VIN        | `Vehicle was not found` |
//! | `get_vehicle_by_trailer_id`  | vehicle details by trailer ID | `Vehicle was not found` |
//! | `get_test_results_by_vrm`    | test results by VRM           | `No tests found`        |
//! | `get_test_results_by_vin`    | test results by VIN           | `No tests found`        |
//! | `get_test_results_by_test_id`| test result by test number    | `Test not found`        |
//!
//! The hard-wired entry points read only their own identifier from the event; a
//! missing identifier is queried as an empty string and ends in not-found.
//! [`EnquiryService::get_vehicle_details`] and [`EnquiryService::get_results_details`]
//! select the identifier from the event first and reject events without one.
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use vehicle_enquiry::database::{InMemoryDataAccess, Query, QueryRow};
//! use vehicle_enquiry::models::LookupEvent;
//! use vehicle_enquiry::services::EnquiryService;
//!
//! # tokio_test::block_on(async {
//! let store = InMemoryDataAccess::new().with_rows(
//!     Query::TestResultByTestNumber,
//!     "T-100",
//!     vec![QueryRow::keyed("TR1", json!({"testNumber": "T-100"}))],
//! );
//! let service = EnquiryService::new(Arc::new(store));
//!
//! let results = service
//!     .get_results_details(&LookupEvent::by_test_number("T-100"))
//!     .await
//!     .unwrap();
//! assert_eq!(results.len(), 1);
//! assert!(results[0].custom_defect.is_empty());
//! # });
//! ```

use crate::database::{DataAccess, Query, RecordFetcher};
use crate::error::{EnquiryError, EnquiryResult};
use crate::models::{IdentifierKind, Lookup, LookupEvent, RootRecord, TestResult, VehicleDetails};
use crate::observer::{EnquiryObserver, TracingObserver};
use crate::services::hydrator::Hydrator;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub const VEHICLE_NOT_FOUND: &str = "Vehicle was not found";
pub const NO_TESTS_FOUND: &str = "No tests found";
pub const TEST_NOT_FOUND: &str = "Test not found";

#[derive(Debug, Clone)]
pub struct EnquiryService {
    fetcher: RecordFetcher,
    hydrator: Hydrator,
}

impl EnquiryService {
    /// Service reporting through [`TracingObserver`]
    pub fn new(data_access: Arc<dyn DataAccess>) -> Self {
        Self::with_observer(data_access, Arc::new(TracingObserver))
    }

    pub fn with_observer(
        data_access: Arc<dyn DataAccess>,
        observer: Arc<dyn EnquiryObserver>,
    ) -> Self {
        let fetcher = RecordFetcher::new(data_access, observer);
        let hydrator = Hydrator::new(fetcher.clone());
        Self { fetcher, hydrator }
    }

    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4()))]
    pub async fn get_vehicle_by_vrm(&self, event: &LookupEvent) -> EnquiryResult<VehicleDetails> {
        self.resolve_vehicle(&hard_wired(event, IdentifierKind::Vrm))
            .await
    }

    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4()))]
    pub async fn get_vehicle_by_vin(&self, event: &LookupEvent) -> EnquiryResult<VehicleDetails> {
        self.resolve_vehicle(&hard_wired(event, IdentifierKind::Vin))
            .await
    }

    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4()))]
    pub async fn get_vehicle_by_trailer_id(
        &self,
        event: &LookupEvent,
    ) -> EnquiryResult<VehicleDetails> {
        self.resolve_vehicle(&hard_wired(event, IdentifierKind::TrailerId))
            .await
    }

    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4()))]
    pub async fn get_test_results_by_vrm(
        &self,
        event: &LookupEvent,
    ) -> EnquiryResult<Vec<TestResult>> {
        self.resolve_test_results(&hard_wired(event, IdentifierKind::Vrm))
            .await
    }

    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4()))]
    pub async fn get_test_results_by_vin(
        &self,
        event: &LookupEvent,
    ) -> EnquiryResult<Vec<TestResult>> {
        self.resolve_test_results(&hard_wired(event, IdentifierKind::Vin))
            .await
    }

    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4()))]
    pub async fn get_test_results_by_test_id(
        &self,
        event: &LookupEvent,
    ) -> EnquiryResult<Vec<TestResult>> {
        self.resolve_test_results(&hard_wired(event, IdentifierKind::TestNumber))
            .await
    }

    /// Pick the vehicle identifier from the event (VIN > VRM > trailer ID) and resolve it
    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4()))]
    pub async fn get_vehicle_details(&self, event: &LookupEvent) -> EnquiryResult<VehicleDetails> {
        let selection = Lookup::for_vehicle(event)?;
        self.fetcher.observer().lookup_selected(
            "get_vehicle_details",
            &selection.lookup,
            &selection.ignored,
        );
        self.resolve_vehicle(&selection.lookup).await
    }

    /// Pick the results identifier from the event (VIN > VRM > test number) and resolve it.
    /// With none populated the test-number query runs with an empty value and ends in not-found.
    #[instrument(skip_all, fields(correlation_id = %Uuid::new_v4()))]
    pub async fn get_results_details(&self, event: &LookupEvent) -> EnquiryResult<Vec<TestResult>> {
        let selection = Lookup::for_results(event);
        self.fetcher.observer().lookup_selected(
            "get_results_details",
            &selection.lookup,
            &selection.ignored,
        );
        self.resolve_test_results(&selection.lookup).await
    }

    pub async fn resolve_vehicle(&self, lookup: &Lookup) -> EnquiryResult<VehicleDetails> {
        let query = match lookup {
            Lookup::ByVrm(_) => Query::VehicleDetailsByVrm,
            Lookup::ByVin(_) => Query::VehicleDetailsByVin,
            Lookup::ByTrailerId(_) => Query::VehicleDetailsByTrailerId,
            Lookup::ByTestNumber(_) => {
                return Err(EnquiryError::parameters(
                    "a test number cannot identify a vehicle",
                ))
            }
        };

        let rows = self.fetcher.fetch_by(query, lookup.value()).await?;

        let Some(vehicle) = RootRecord::first_of(rows.rows) else {
            return Err(self.not_found(query, VEHICLE_NOT_FOUND));
        };

        let technicalrecords = self.hydrator.technical_records(&vehicle.id).await?;

        Ok(VehicleDetails::new(vehicle.payload, technicalrecords))
    }

    pub async fn resolve_test_results(&self, lookup: &Lookup) -> EnquiryResult<Vec<TestResult>> {
        let query = match lookup {
            Lookup::ByVrm(_) => Query::TestResultsByVrm,
            Lookup::ByVin(_) => Query::TestResultsByVin,
            Lookup::ByTestNumber(_) => Query::TestResultByTestNumber,
            Lookup::ByTrailerId(_) => {
                return Err(EnquiryError::parameters(
                    "test results cannot be looked up by trailer ID",
                ))
            }
        };

        let rows = self.fetcher.fetch_by(query, lookup.value()).await?;

        if query == Query::TestResultByTestNumber {
            let Some(test_result) = RootRecord::first_of(rows.rows) else {
                return Err(self.not_found(query, TEST_NOT_FOUND));
            };
            return Ok(vec![self.hydrator.hydrate_test_result(test_result).await?]);
        }

        if rows.is_empty() {
            return Err(self.not_found(query, NO_TESTS_FOUND));
        }

        let test_results = self.hydrator.keyed_records(query, rows.rows);
        if test_results.is_empty() {
            return Err(self.not_found(query, NO_TESTS_FOUND));
        }

        self.hydrator.hydrate_test_results(test_results).await
    }

    fn not_found(&self, query: Query, message: &str) -> EnquiryError {
        self.fetcher.observer().not_found(query.name(), message);
        EnquiryError::not_found(message)
    }
}

fn hard_wired(event: &LookupEvent, kind: IdentifierKind) -> Lookup {
    Lookup::new(kind, event.identifier(kind).unwrap_or_default())
}
