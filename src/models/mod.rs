//! # Models
//!
//! Lookup inputs and the aggregates the resolver hands back.
//!
//! - [`lookup`] - [`LookupEvent`] and the [`Lookup`] tagged union selected from it
//! - [`record`] - validation of raw rows into [`RootRecord`]s and child payloads
//! - [`vehicle`] - [`VehicleDetails`] and [`TechnicalRecord`]
//! - [`test_result`] - [`TestResult`]

pub mod lookup;
pub mod record;
pub mod test_result;
pub mod vehicle;

pub use lookup::{IdentifierKind, Lookup, LookupEvent, Selection};
pub use record::{child_payload, Payload, RootRecord};
pub use test_result::{CustomDefect, TestDefect, TestResult};
pub use vehicle::{Axle, AxleSpacing, Plate, PsvBrakes, TechnicalRecord, VehicleDetails};
