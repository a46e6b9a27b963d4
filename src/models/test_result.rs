//! Test-result aggregate: a test result with its defects attached.

use crate::models::record::Payload;
use serde::{Deserialize, Serialize};

pub type CustomDefect = Payload;
pub type TestDefect = Payload;

/// Serializes as the test-result payload plus `customDefect` and `defects` arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    #[serde(flatten)]
    pub attributes: Payload,
    #[serde(rename = "customDefect")]
    pub custom_defect: Vec<CustomDefect>,
    pub defects: Vec<TestDefect>,
}

impl TestResult {
    pub const ATTACHED_FIELDS: [&'static str; 2] = ["customDefect", "defects"];

    pub fn new(
        mut attributes: Payload,
        custom_defect: Vec<CustomDefect>,
        defects: Vec<TestDefect>,
    ) -> Self {
        for field in Self::ATTACHED_FIELDS {
            attributes.remove(field);
        }
        Self {
            attributes,
            custom_defect,
            defects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_defects_next_to_payload() {
        let attributes = json!({"testNumber": "T-100", "defects": "stale"})
            .as_object()
            .cloned()
            .unwrap();
        let defect = json!({"deficiencyRef": "1.1.a"}).as_object().cloned().unwrap();

        let result = TestResult::new(attributes, Vec::new(), vec![defect]);

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "testNumber": "T-100",
                "customDefect": [],
                "defects": [{"deficiencyRef": "1.1.a"}]
            })
        );
    }

    #[test]
    fn deserializes_its_own_output() {
        let value = json!({
            "testNumber": "T-100",
            "customDefect": [{"defectName": "Mirror"}],
            "defects": []
        });

        let result: TestResult = serde_json::from_value(value).unwrap();
        assert_eq!(result.custom_defect.len(), 1);
        assert!(result.defects.is_empty());
        assert_eq!(result.attributes.len(), 1);
    }
}
