//! Builders that script an [`InMemoryDataAccess`] with whole vehicle and test
//! result graphs.

use serde_json::{json, Value};
use std::sync::Arc;
use vehicle_enquiry::database::{InMemoryDataAccess, Query, QueryRow};

/// Collects rows per (statement, parent identifier) and scripts them in one go,
/// keeping insertion order within each group.
#[derive(Debug, Default)]
pub struct StoreBuilder {
    groups: Vec<((Query, String), Vec<QueryRow>)>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, query: Query, parent: &str, id: &str, payload: Value) -> Self {
        let row = QueryRow::keyed(id, payload);
        let group_key = (query, parent.to_string());
        match self.groups.iter_mut().find(|(key, _)| *key == group_key) {
            Some((_, rows)) => rows.push(row),
            None => self.groups.push((group_key, vec![row])),
        }
        self
    }

    pub fn vehicle(self, query: Query, identifier: &str, id: &str) -> Self {
        self.row(
            query,
            identifier,
            id,
            json!({"systemNumber": format!("SN-{id}"), "vin": identifier}),
        )
    }

    pub fn technical_record(self, vehicle_id: &str, id: &str, status: &str) -> Self {
        self.row(
            Query::TechnicalRecords,
            vehicle_id,
            id,
            json!({"statusCode": status, "vehicleType": "psv"}),
        )
    }

    pub fn brake(self, technical_record_id: &str, id: &str) -> Self {
        self.row(
            Query::PsvBrakes,
            technical_record_id,
            id,
            json!({"brakeCode": "178202", "dtpNumber": "1234"}),
        )
    }

    pub fn axle(self, technical_record_id: &str, id: &str, axle_number: i64) -> Self {
        self.row(
            Query::Axles,
            technical_record_id,
            id,
            json!({"axleNumber": axle_number, "tyreSize": "295/80-22.5"}),
        )
    }

    pub fn test_result(self, query: Query, identifier: &str, id: &str, test_number: &str) -> Self {
        self.row(
            query,
            identifier,
            id,
            json!({"testNumber": test_number, "testStatus": "submitted"}),
        )
    }

    pub fn test_defect(self, test_result_id: &str, id: &str, deficiency_ref: &str) -> Self {
        self.row(
            Query::TestDefects,
            test_result_id,
            id,
            json!({"deficiencyRef": deficiency_ref, "deficiencyCategory": "major", "prs": false}),
        )
    }

    pub fn custom_defect(self, test_result_id: &str, id: &str, name: &str) -> Self {
        self.row(
            Query::CustomDefects,
            test_result_id,
            id,
            json!({"referenceNumber": id, "defectName": name}),
        )
    }

    pub fn build(self) -> Arc<InMemoryDataAccess> {
        let store = InMemoryDataAccess::new();
        for ((query, parent), rows) in self.groups {
            store.respond(query, &parent, rows);
        }
        Arc::new(store)
    }
}

/// VIN `1HGCM82633A004352` resolving to vehicle `V1` with two technical records,
/// each carrying one brake row and no axles.
pub fn vehicle_with_two_technical_records() -> Arc<InMemoryDataAccess> {
    StoreBuilder::new()
        .vehicle(Query::VehicleDetailsByVin, "1HGCM82633A004352", "V1")
        .technical_record("V1", "T1", "current")
        .technical_record("V1", "T2", "archived")
        .brake("T1", "B1")
        .brake("T2", "B2")
        .build()
}
