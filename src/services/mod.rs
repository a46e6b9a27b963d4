//! # Services
//!
//! - [`enquiry_service`] - the six lookup entry points plus the two dispatching ones
//! - [`hydrator`] - concurrent attachment of child collections to root records

pub mod enquiry_service;
pub mod hydrator;

pub use enquiry_service::{EnquiryService, NO_TESTS_FOUND, TEST_NOT_FOUND, VEHICLE_NOT_FOUND};
pub use hydrator::Hydrator;
