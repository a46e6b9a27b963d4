//! Vehicle aggregate: vehicle details with their hydrated technical records.

use crate::models::record::Payload;
use serde::{Deserialize, Serialize};

pub type PsvBrakes = Payload;
pub type Axle = Payload;
pub type AxleSpacing = Payload;
pub type Plate = Payload;

/// Technical record with all four child collections attached.
///
/// Serializes as the technical-record payload plus `psvBrakes`, `axles`,
/// `axlespacing` and `plates` arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalRecord {
    #[serde(flatten)]
    pub attributes: Payload,
    #[serde(rename = "psvBrakes")]
    pub psv_brakes: Vec<PsvBrakes>,
    pub axles: Vec<Axle>,
    pub axlespacing: Vec<AxleSpacing>,
    pub plates: Vec<Plate>,
}

impl TechnicalRecord {
    pub const ATTACHED_FIELDS: [&'static str; 4] = ["psvBrakes", "axles", "axlespacing", "plates"];

    pub fn new(
        mut attributes: Payload,
        psv_brakes: Vec<PsvBrakes>,
        axles: Vec<Axle>,
        axlespacing: Vec<AxleSpacing>,
        plates: Vec<Plate>,
    ) -> Self {
        for field in Self::ATTACHED_FIELDS {
            attributes.remove(field);
        }
        Self {
            attributes,
            psv_brakes,
            axles,
            axlespacing,
            plates,
        }
    }
}

/// Vehicle details with every technical record attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDetails {
    #[serde(flatten)]
    pub attributes: Payload,
    pub technicalrecords: Vec<TechnicalRecord>,
}

impl VehicleDetails {
    pub const ATTACHED_FIELDS: [&'static str; 1] = ["technicalrecords"];

    pub fn new(mut attributes: Payload, technicalrecords: Vec<TechnicalRecord>) -> Self {
        for field in Self::ATTACHED_FIELDS {
            attributes.remove(field);
        }
        Self {
            attributes,
            technicalrecords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_collections_serialize_as_empty_arrays() {
        let record = TechnicalRecord::new(
            payload(json!({"statusCode": "current"})),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "statusCode": "current",
                "psvBrakes": [],
                "axles": [],
                "axlespacing": [],
                "plates": []
            })
        );
    }

    #[test]
    fn attached_collections_replace_colliding_payload_keys() {
        let vehicle = VehicleDetails::new(
            payload(json!({"vin": "X", "technicalrecords": "stale"})),
            Vec::new(),
        );

        assert!(!vehicle.attributes.contains_key("technicalrecords"));
        assert_eq!(
            serde_json::to_value(&vehicle).unwrap(),
            json!({"vin": "X", "technicalrecords": []})
        );
    }
}
