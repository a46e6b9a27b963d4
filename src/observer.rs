//! # Lookup Observer
//!
//! Structured notifications emitted while a lookup is resolved. The resolver and
//! its collaborators never log through process-wide state directly; they report to
//! an injected [`EnquiryObserver`]. [`TracingObserver`] forwards every notification
//! to `tracing`, [`NoopObserver`] discards them.

use crate::database::queries::Query;
use crate::models::lookup::{IdentifierKind, Lookup};
use chrono::Utc;
use std::fmt::Debug;
use std::time::Duration;

/// Every method has an empty default so implementations pick what they need.
pub trait EnquiryObserver: Send + Sync + Debug {
    /// A dispatching entry point picked `lookup`, beating the `ignored` identifiers
    fn lookup_selected(&self, _operation: &str, _lookup: &Lookup, _ignored: &[IdentifierKind]) {}

    fn query_started(&self, _query: Query, _params: &[String]) {}

    fn query_completed(&self, _query: Query, _row_count: usize, _elapsed: Duration) {}

    fn query_failed(&self, _query: Query, _error: &str) {}

    /// A row could not be used and was left out of the aggregate
    fn row_skipped(&self, _query: Query, _reason: &str) {}

    fn not_found(&self, _operation: &str, _message: &str) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl EnquiryObserver for NoopObserver {}

/// Emits each notification as a `tracing` event under the `enquiry` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EnquiryObserver for TracingObserver {
    fn lookup_selected(&self, operation: &str, lookup: &Lookup, ignored: &[IdentifierKind]) {
        if lookup.value().is_empty() {
            tracing::warn!(
                target: "enquiry",
                operation = %operation,
                identifier = %lookup.kind(),
                "No identifier supplied; querying with an empty value"
            );
        } else if ignored.is_empty() {
            tracing::info!(
                target: "enquiry",
                operation = %operation,
                identifier = %lookup.kind(),
                "Lookup selected"
            );
        } else {
            let ignored: Vec<&str> = ignored.iter().map(|kind| kind.field_name()).collect();
            tracing::warn!(
                target: "enquiry",
                operation = %operation,
                identifier = %lookup.kind(),
                ignored = ?ignored,
                "Lookup selected; lower-priority identifiers ignored"
            );
        }
    }

    fn query_started(&self, query: Query, params: &[String]) {
        tracing::debug!(
            target: "enquiry",
            query = %query,
            params = %params.join(", "),
            "Executing query"
        );
    }

    fn query_completed(&self, query: Query, row_count: usize, elapsed: Duration) {
        tracing::debug!(
            target: "enquiry",
            query = %query,
            row_count = row_count,
            duration_ms = elapsed.as_millis() as u64,
            "Query completed"
        );
    }

    fn query_failed(&self, query: Query, error: &str) {
        tracing::error!(
            target: "enquiry",
            query = %query,
            error = %error,
            timestamp = %Utc::now().to_rfc3339(),
            "Query failed"
        );
    }

    fn row_skipped(&self, query: Query, reason: &str) {
        tracing::warn!(target: "enquiry", query = %query, reason = %reason, "Row skipped");
    }

    fn not_found(&self, operation: &str, message: &str) {
        tracing::info!(
            target: "enquiry",
            operation = %operation,
            message = %message,
            "Lookup found nothing"
        );
    }
}
