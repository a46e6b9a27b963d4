//! # Query Catalogue
//!
//! Every statement the enquiry core issues. Each one takes a single text parameter
//! and returns rows in the `id` (text) / `result` (JSON object) shape, ordered so
//! that repeated runs over unchanged data produce identical row sequences.
//!
//! The statements target the schema in `migrations/0001_enquiry_schema.sql`.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! vehicle_details_query {
    ($predicate:literal) => {
        concat!(
            r#"
            SELECT v.id::text AS id,
                   json_build_object(
                       'systemNumber', v.system_number,
                       'vin', v.vin,
                       'vrm_trm', v.vrm_trm,
                       'trailerId', v.trailer_id,
                       'createdTimestamp', v.created_at
                   ) AS result
            FROM vehicle v
            WHERE "#,
            $predicate,
            r#"
            ORDER BY v.created_at DESC, v.id DESC
            LIMIT 1
            "#
        )
    };
}

macro_rules! test_results_query {
    ($predicate:literal, $limit:literal) => {
        concat!(
            r#"
            SELECT tr.id::text AS id,
                   json_build_object(
                       'systemNumber', v.system_number,
                       'vin', v.vin,
                       'vrm', v.vrm_trm,
                       'trailerId', v.trailer_id,
                       'testNumber', tr.test_number,
                       'testStatus', tr.test_status,
                       'testResult', tr.test_result,
                       'testTypeName', tr.test_type_name,
                       'certificateNumber', tr.certificate_number,
                       'odometerReading', tr.odometer_reading,
                       'odometerReadingUnits', tr.odometer_reading_units,
                       'testTypeStartTimestamp', tr.test_start_timestamp,
                       'testTypeEndTimestamp', tr.test_end_timestamp
                   ) AS result
            FROM test_result tr
            JOIN vehicle v ON v.id = tr.vehicle_id
            WHERE "#,
            $predicate,
            r#"
            ORDER BY tr.test_start_timestamp DESC, tr.id DESC
            "#,
            $limit
        )
    };
}

pub const VEHICLE_DETAILS_VRM_QUERY: &str = vehicle_details_query!("v.vrm_trm = $1");

pub const VEHICLE_DETAILS_VIN_QUERY: &str = vehicle_details_query!("v.vin = $1");

pub const VEHICLE_DETAILS_TRAILER_ID_QUERY: &str = vehicle_details_query!("v.trailer_id = $1");

pub const TECHNICAL_RECORD_QUERY: &str = r#"
    SELECT t.id::text AS id,
           json_build_object(
               'recordCompleteness', t.record_completeness,
               'statusCode', t.status_code,
               'vehicleType', t.vehicle_type,
               'manufactureYear', t.manufacture_year,
               'noOfAxles', t.no_of_axles,
               'grossGbWeight', t.gross_gb_weight,
               'createdAt', t.created_at
           ) AS result
    FROM technical_record t
    WHERE t.vehicle_id = $1::bigint
    ORDER BY t.created_at DESC, t.id
"#;

pub const BRAKE_QUERY: &str = r#"
    SELECT b.id::text AS id,
           json_build_object(
               'brakeCode', b.brake_code,
               'dataTrBrakeOne', b.data_tr_brake_one,
               'dataTrBrakeTwo', b.data_tr_brake_two,
               'retarderBrakeOne', b.retarder_brake_one,
               'retarderBrakeTwo', b.retarder_brake_two,
               'dtpNumber', b.dtp_number,
               'loadSensingValve', b.load_sensing_valve,
               'antilockBrakingSystem', b.antilock_braking_system
           ) AS result
    FROM psv_brakes b
    WHERE b.technical_record_id = $1::bigint
    ORDER BY b.id
"#;

pub const AXLE_QUERY: &str = r#"
    SELECT a.id::text AS id,
           json_build_object(
               'axleNumber', a.axle_number,
               'parkingBrakeMrk', a.parking_brake_mrk,
               'kerbWeight', a.kerb_weight,
               'gbWeight', a.gb_weight,
               'designWeight', a.design_weight,
               'tyreSize', a.tyre_size,
               'tyreCode', a.tyre_code
           ) AS result
    FROM axles a
    WHERE a.technical_record_id = $1::bigint
    ORDER BY a.axle_number, a.id
"#;

pub const AXLE_SPACING_QUERY: &str = r#"
    SELECT s.id::text AS id,
           json_build_object(
               'axles', s.axles,
               'value', s.value
           ) AS result
    FROM axle_spacing s
    WHERE s.technical_record_id = $1::bigint
    ORDER BY s.id
"#;

pub const PLATING_QUERY: &str = r#"
    SELECT p.id::text AS id,
           json_build_object(
               'plateSerialNumber', p.plate_serial_number,
               'plateIssueDate', p.plate_issue_date,
               'plateReasonForIssue', p.plate_reason_for_issue,
               'plateIssuer', p.plate_issuer
           ) AS result
    FROM plate p
    WHERE p.technical_record_id = $1::bigint
    ORDER BY p.plate_issue_date, p.id
"#;

pub const TEST_RESULTS_BY_VRM: &str = test_results_query!("v.vrm_trm = $1", "");

pub const TEST_RESULTS_BY_VIN: &str = test_results_query!("v.vin = $1", "");

pub const TEST_RESULTS_BY_TEST_NUMBER: &str =
    test_results_query!("tr.test_number = $1", "LIMIT 1");

pub const CUSTOM_DEFECT_QUERY: &str = r#"
    SELECT c.id::text AS id,
           json_build_object(
               'referenceNumber', c.reference_number,
               'defectName', c.defect_name,
               'defectNotes', c.defect_notes
           ) AS result
    FROM custom_defect c
    WHERE c.test_result_id = $1::bigint
    ORDER BY c.id
"#;

pub const TEST_DEFECT_QUERY: &str = r#"
    SELECT d.id::text AS id,
           json_build_object(
               'imNumber', d.im_number,
               'imDescription', d.im_description,
               'itemNumber', d.item_number,
               'itemDescription', d.item_description,
               'deficiencyRef', d.deficiency_ref,
               'deficiencyCategory', d.deficiency_category,
               'prs', d.prs,
               'notes', d.notes
           ) AS result
    FROM test_defect d
    WHERE d.test_result_id = $1::bigint
    ORDER BY d.id
"#;

/// Statement identity, used for logging and error context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    VehicleDetailsByVrm,
    VehicleDetailsByVin,
    VehicleDetailsByTrailerId,
    TechnicalRecords,
    PsvBrakes,
    Axles,
    AxleSpacing,
    Plates,
    TestResultsByVrm,
    TestResultsByVin,
    TestResultByTestNumber,
    CustomDefects,
    TestDefects,
}

impl Query {
    pub const ALL: [Query; 13] = [
        Query::VehicleDetailsByVrm,
        Query::VehicleDetailsByVin,
        Query::VehicleDetailsByTrailerId,
        Query::TechnicalRecords,
        Query::PsvBrakes,
        Query::Axles,
        Query::AxleSpacing,
        Query::Plates,
        Query::TestResultsByVrm,
        Query::TestResultsByVin,
        Query::TestResultByTestNumber,
        Query::CustomDefects,
        Query::TestDefects,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Query::VehicleDetailsByVrm => "vehicle_details_by_vrm",
            Query::VehicleDetailsByVin => "vehicle_details_by_vin",
            Query::VehicleDetailsByTrailerId => "vehicle_details_by_trailer_id",
            Query::TechnicalRecords => "technical_records",
            Query::PsvBrakes => "psv_brakes",
            Query::Axles => "axles",
            Query::AxleSpacing => "axle_spacing",
            Query::Plates => "plates",
            Query::TestResultsByVrm => "test_results_by_vrm",
            Query::TestResultsByVin => "test_results_by_vin",
            Query::TestResultByTestNumber => "test_result_by_test_number",
            Query::CustomDefects => "custom_defects",
            Query::TestDefects => "test_defects",
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            Query::VehicleDetailsByVrm => VEHICLE_DETAILS_VRM_QUERY,
            Query::VehicleDetailsByVin => VEHICLE_DETAILS_VIN_QUERY,
            Query::VehicleDetailsByTrailerId => VEHICLE_DETAILS_TRAILER_ID_QUERY,
            Query::TechnicalRecords => TECHNICAL_RECORD_QUERY,
            Query::PsvBrakes => BRAKE_QUERY,
            Query::Axles => AXLE_QUERY,
            Query::AxleSpacing => AXLE_SPACING_QUERY,
            Query::Plates => PLATING_QUERY,
            Query::TestResultsByVrm => TEST_RESULTS_BY_VRM,
            Query::TestResultsByVin => TEST_RESULTS_BY_VIN,
            Query::TestResultByTestNumber => TEST_RESULTS_BY_TEST_NUMBER,
            Query::CustomDefects => CUSTOM_DEFECT_QUERY,
            Query::TestDefects => TEST_DEFECT_QUERY,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
