//! # Lookup Selection
//!
//! Turns a caller-supplied [`LookupEvent`] into an explicit [`Lookup`] exactly once,
//! at the boundary, so the resolver can match on it exhaustively.
//!
//! Results lookups prefer VIN, then registration mark, then test number. Vehicle
//! lookups prefer VIN, then registration mark, then trailer ID. Blank identifiers
//! count as absent.
//!
//! A results event with no usable identifier still selects the test-number lookup,
//! with an empty value and `fallback` set; it resolves to not-found. A vehicle
//! event with no usable identifier is a parameters error.

use crate::error::{EnquiryError, EnquiryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which identifier a lookup is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Vin,
    Vrm,
    TrailerId,
    TestNumber,
}

impl IdentifierKind {
    pub const ALL: [IdentifierKind; 4] = [
        IdentifierKind::Vin,
        IdentifierKind::Vrm,
        IdentifierKind::TrailerId,
        IdentifierKind::TestNumber,
    ];

    /// Field name used on the wire
    pub fn field_name(self) -> &'static str {
        match self {
            IdentifierKind::Vin => "vinNumber",
            IdentifierKind::Vrm => "vehicleRegMark",
            IdentifierKind::TrailerId => "trailerId",
            IdentifierKind::TestNumber => "testNumber",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Priority used when dispatching test-result lookups
pub const RESULTS_PRIORITY: [IdentifierKind; 3] = [
    IdentifierKind::Vin,
    IdentifierKind::Vrm,
    IdentifierKind::TestNumber,
];

/// Priority used when dispatching vehicle lookups
pub const VEHICLE_PRIORITY: [IdentifierKind; 3] = [
    IdentifierKind::Vin,
    IdentifierKind::Vrm,
    IdentifierKind::TrailerId,
];

/// Optional identifiers supplied for one request.
///
/// The legacy query-string casing (`VehicleRegMark`, `testnumber`) is accepted
/// when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupEvent {
    #[serde(default, alias = "VehicleRegMark", skip_serializing_if = "Option::is_none")]
    pub vehicle_reg_mark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer_id: Option<String>,
    #[serde(default, alias = "testnumber", skip_serializing_if = "Option::is_none")]
    pub test_number: Option<String>,
}

impl LookupEvent {
    pub fn by_vin(vin: impl Into<String>) -> Self {
        Self {
            vin_number: Some(vin.into()),
            ..Self::default()
        }
    }

    pub fn by_vrm(vrm: impl Into<String>) -> Self {
        Self {
            vehicle_reg_mark: Some(vrm.into()),
            ..Self::default()
        }
    }

    pub fn by_trailer_id(trailer_id: impl Into<String>) -> Self {
        Self {
            trailer_id: Some(trailer_id.into()),
            ..Self::default()
        }
    }

    pub fn by_test_number(test_number: impl Into<String>) -> Self {
        Self {
            test_number: Some(test_number.into()),
            ..Self::default()
        }
    }

    pub fn with(mut self, kind: IdentifierKind, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match kind {
            IdentifierKind::Vin => self.vin_number = value,
            IdentifierKind::Vrm => self.vehicle_reg_mark = value,
            IdentifierKind::TrailerId => self.trailer_id = value,
            IdentifierKind::TestNumber => self.test_number = value,
        }
        self
    }

    /// Trimmed identifier of the given kind, `None` when absent or blank
    pub fn identifier(&self, kind: IdentifierKind) -> Option<&str> {
        let raw = match kind {
            IdentifierKind::Vin => self.vin_number.as_deref(),
            IdentifierKind::Vrm => self.vehicle_reg_mark.as_deref(),
            IdentifierKind::TrailerId => self.trailer_id.as_deref(),
            IdentifierKind::TestNumber => self.test_number.as_deref(),
        };
        raw.map(str::trim).filter(|value| !value.is_empty())
    }

    /// Populated identifier kinds, in declaration order
    pub fn populated(&self) -> Vec<IdentifierKind> {
        IdentifierKind::ALL
            .into_iter()
            .filter(|kind| self.identifier(*kind).is_some())
            .collect()
    }
}

/// A lookup keyed on exactly one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Lookup {
    ByVin(String),
    ByVrm(String),
    ByTrailerId(String),
    ByTestNumber(String),
}

impl Lookup {
    pub fn new(kind: IdentifierKind, value: impl Into<String>) -> Self {
        let value = value.into();
        match kind {
            IdentifierKind::Vin => Lookup::ByVin(value),
            IdentifierKind::Vrm => Lookup::ByVrm(value),
            IdentifierKind::TrailerId => Lookup::ByTrailerId(value),
            IdentifierKind::TestNumber => Lookup::ByTestNumber(value),
        }
    }

    pub fn kind(&self) -> IdentifierKind {
        match self {
            Lookup::ByVin(_) => IdentifierKind::Vin,
            Lookup::ByVrm(_) => IdentifierKind::Vrm,
            Lookup::ByTrailerId(_) => IdentifierKind::TrailerId,
            Lookup::ByTestNumber(_) => IdentifierKind::TestNumber,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Lookup::ByVin(value)
            | Lookup::ByVrm(value)
            | Lookup::ByTrailerId(value)
            | Lookup::ByTestNumber(value) => value,
        }
    }

    /// Select the lookup for a test-results request (VIN > VRM > test number)
    pub fn for_results(event: &LookupEvent) -> Selection {
        Selection::from_priority(event, &RESULTS_PRIORITY).unwrap_or_else(|| Selection {
            lookup: Lookup::ByTestNumber(String::new()),
            ignored: Vec::new(),
            fallback: true,
        })
    }

    /// Select the lookup for a vehicle request (VIN > VRM > trailer ID)
    pub fn for_vehicle(event: &LookupEvent) -> EnquiryResult<Selection> {
        Selection::from_priority(event, &VEHICLE_PRIORITY).ok_or_else(|| {
            let expected: Vec<&str> = VEHICLE_PRIORITY
                .iter()
                .map(|kind| kind.field_name())
                .collect();
            EnquiryError::parameters(format!("one of {} must be supplied", expected.join(", ")))
        })
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind(), self.value())
    }
}

/// Outcome of selecting a lookup: the winner and every populated identifier it beat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub lookup: Lookup,
    pub ignored: Vec<IdentifierKind>,
    /// No identifier was usable; `lookup` is the lowest-priority kind with an empty value
    pub fallback: bool,
}

impl Selection {
    fn from_priority(event: &LookupEvent, priority: &[IdentifierKind]) -> Option<Self> {
        let mut candidates = priority
            .iter()
            .filter_map(|kind| event.identifier(*kind).map(|value| (*kind, value)));

        let (kind, value) = candidates.next()?;
        let ignored = candidates.map(|(kind, _)| kind).collect();

        Some(Self {
            lookup: Lookup::new(kind, value),
            ignored,
            fallback: false,
        })
    }
}
