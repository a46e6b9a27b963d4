//! # Hydrator
//!
//! Attaches dependent child collections to root records.
//!
//! - A technical record gets its brakes, axles, axle spacings and plates, fetched
//!   concurrently and keyed by the technical record's own identifier.
//! - A test result gets its custom defects and standard defects, fetched
//!   concurrently.
//! - Lists of records hydrate concurrently and come back in input order.
//!
//! Any failed child fetch fails the whole hydration; no degraded aggregate is
//! produced. Collections are always present, empty when nothing was found.

use crate::database::{Query, QueryRow, RecordFetcher};
use crate::error::EnquiryResult;
use crate::models::{child_payload, Payload, RootRecord, TechnicalRecord, TestResult};
use futures::future::try_join_all;

#[derive(Debug, Clone)]
pub struct Hydrator {
    fetcher: RecordFetcher,
}

impl Hydrator {
    pub fn new(fetcher: RecordFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch a vehicle's technical records and hydrate each of them
    pub async fn technical_records(&self, vehicle_id: &str) -> EnquiryResult<Vec<TechnicalRecord>> {
        let rows = self
            .fetcher
            .fetch_by(Query::TechnicalRecords, vehicle_id)
            .await?;

        let records = self.keyed_records(Query::TechnicalRecords, rows.rows);

        try_join_all(
            records
                .into_iter()
                .map(|record| self.hydrate_technical_record(record)),
        )
        .await
    }

    pub async fn hydrate_technical_record(
        &self,
        record: RootRecord,
    ) -> EnquiryResult<TechnicalRecord> {
        let id = record.id.as_str();

        let (psv_brakes, axles, axlespacing, plates) = tokio::try_join!(
            self.children(Query::PsvBrakes, id),
            self.children(Query::Axles, id),
            self.children(Query::AxleSpacing, id),
            self.children(Query::Plates, id)
        )?;

        Ok(TechnicalRecord::new(
            record.payload,
            psv_brakes,
            axles,
            axlespacing,
            plates,
        ))
    }

    pub async fn hydrate_test_result(&self, record: RootRecord) -> EnquiryResult<TestResult> {
        let id = record.id.as_str();

        let (custom_defect, defects) = tokio::try_join!(
            self.children(Query::CustomDefects, id),
            self.children(Query::TestDefects, id)
        )?;

        Ok(TestResult::new(record.payload, custom_defect, defects))
    }

    /// Hydrate every test result concurrently, preserving input order
    pub async fn hydrate_test_results(
        &self,
        records: Vec<RootRecord>,
    ) -> EnquiryResult<Vec<TestResult>> {
        try_join_all(
            records
                .into_iter()
                .map(|record| self.hydrate_test_result(record)),
        )
        .await
    }

    /// Validate rows into root records, reporting and dropping unusable ones
    pub fn keyed_records(&self, query: Query, rows: Vec<QueryRow>) -> Vec<RootRecord> {
        rows.into_iter()
            .filter_map(|row| {
                let record = RootRecord::from_row(row);
                if record.is_none() {
                    self.fetcher
                        .observer()
                        .row_skipped(query, "row has no identifier or payload");
                }
                record
            })
            .collect()
    }

    async fn children(&self, query: Query, parent_id: &str) -> EnquiryResult<Vec<Payload>> {
        let rows = self.fetcher.fetch_by(query, parent_id).await?;

        Ok(rows
            .rows
            .into_iter()
            .filter_map(|row| {
                let payload = child_payload(row);
                if payload.is_none() {
                    self.fetcher
                        .observer()
                        .row_skipped(query, "child row has no payload");
                }
                payload
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryDataAccess;
    use crate::error::{DataStoreError, EnquiryError};
    use crate::observer::NoopObserver;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn hydrator(store: &Arc<InMemoryDataAccess>) -> Hydrator {
        Hydrator::new(RecordFetcher::new(store.clone(), Arc::new(NoopObserver)))
    }

    fn record(id: &str) -> RootRecord {
        RootRecord::new(id, json!({"id": id}).as_object().cloned().unwrap())
    }

    #[tokio::test]
    async fn children_are_keyed_by_technical_record_not_vehicle() {
        let store = Arc::new(InMemoryDataAccess::new());
        store.respond(
            Query::TechnicalRecords,
            "V1",
            vec![
                QueryRow::keyed("T1", json!({"statusCode": "current"})),
                QueryRow::keyed("T2", json!({"statusCode": "archived"})),
            ],
        );
        store.respond(
            Query::Axles,
            "T1",
            vec![QueryRow::keyed("a1", json!({"axleNumber": 1}))],
        );
        store.respond(
            Query::Axles,
            "T2",
            vec![
                QueryRow::keyed("a2", json!({"axleNumber": 1})),
                QueryRow::keyed("a3", json!({"axleNumber": 2})),
            ],
        );

        let records = hydrator(&store).technical_records("V1").await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].axles.len(), 1);
        assert_eq!(records[1].axles.len(), 2);
        assert!(store.params_for(Query::Axles).iter().all(|p| p[0] != "V1"));
        assert_eq!(store.params_for(Query::PsvBrakes).len(), 2);
    }

    #[tokio::test]
    async fn child_fetches_of_one_record_run_concurrently() {
        let store = Arc::new(InMemoryDataAccess::new());
        for query in [Query::PsvBrakes, Query::Axles, Query::AxleSpacing, Query::Plates] {
            store.delay(query, "T1", Duration::from_millis(25));
        }

        let record = hydrator(&store)
            .hydrate_technical_record(record("T1"))
            .await
            .unwrap();

        assert_eq!(store.peak_concurrency(), 4);
        assert!(record.psv_brakes.is_empty());
        assert!(record.plates.is_empty());
    }

    #[tokio::test]
    async fn test_results_keep_input_order_when_completion_order_differs() {
        let store = Arc::new(InMemoryDataAccess::new());
        store.delay(Query::CustomDefects, "1", Duration::from_millis(40));
        store.delay(Query::CustomDefects, "2", Duration::from_millis(20));

        let results = hydrator(&store)
            .hydrate_test_results(vec![record("1"), record("2"), record("3")])
            .await
            .unwrap();

        let ids: Vec<_> = results
            .iter()
            .map(|r| r.attributes.get("id").cloned().unwrap())
            .collect();
        assert_eq!(ids, vec![json!("1"), json!("2"), json!("3")]);
    }

    #[tokio::test]
    async fn one_failing_child_fails_the_record() {
        let store = Arc::new(InMemoryDataAccess::new());
        store.respond(
            Query::CustomDefects,
            "1",
            vec![QueryRow::keyed("c1", json!({"defectName": "Mirror"}))],
        );
        store.fail(
            Query::TestDefects,
            DataStoreError::Connection("server closed the connection".into()),
        );

        let error = hydrator(&store)
            .hydrate_test_result(record("1"))
            .await
            .unwrap_err();

        assert!(matches!(error, EnquiryError::DataAccess { ref query, .. } if query == "test_defects"));
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped() {
        let store = Arc::new(InMemoryDataAccess::new());
        let mut no_payload = QueryRow::default();
        no_payload.insert("id", json!("b2"));
        store.respond(
            Query::PsvBrakes,
            "T1",
            vec![QueryRow::keyed("b1", json!({"brakeCode": "178202"})), no_payload],
        );

        let record = hydrator(&store)
            .hydrate_technical_record(record("T1"))
            .await
            .unwrap();

        assert_eq!(record.psv_brakes.len(), 1);
    }
}
