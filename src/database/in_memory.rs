//! # In-Memory Data Access
//!
//! Scripted [`DataAccess`] implementation for testing and local development.
//!
//! ## Features
//!
//! - **Scripted rows**: responses keyed by statement text and parameters; anything
//!   unscripted returns an empty row set
//! - **Failure injection**: make every call of a statement fail
//! - **Latency simulation**: delay selected calls to reshuffle completion order
//! - **Call log**: every call is recorded, along with the peak number of calls that
//!   were in flight at the same time

use crate::database::data_access::{DataAccess, QueryRow, RowSet};
use crate::database::queries::Query;
use crate::error::DataStoreError;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type CallKey = (String, Vec<String>);

/// A call observed by [`InMemoryDataAccess`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub query: String,
    pub params: Vec<String>,
}

#[derive(Debug, Default)]
pub struct InMemoryDataAccess {
    responses: RwLock<HashMap<CallKey, RowSet>>,
    failures: RwLock<HashMap<String, DataStoreError>>,
    delays: RwLock<HashMap<CallKey, Duration>>,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl InMemoryDataAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the rows a catalogue statement returns for one identifier
    pub fn respond(&self, query: Query, param: &str, rows: Vec<QueryRow>) {
        self.insert_rows(query.sql(), &[param], RowSet::keyed(rows));
    }

    /// Builder form of [`respond`](Self::respond)
    pub fn with_rows(self, query: Query, param: &str, rows: Vec<QueryRow>) -> Self {
        self.respond(query, param, rows);
        self
    }

    pub fn insert_rows(&self, sql: &str, params: &[&str], rows: RowSet) {
        self.responses.write().insert(key(sql, params), rows);
    }

    /// Make every call of `query` fail with `error`
    pub fn fail(&self, query: Query, error: DataStoreError) {
        self.failures.write().insert(query.sql().to_string(), error);
    }

    pub fn clear_failure(&self, query: Query) {
        self.failures.write().remove(query.sql());
    }

    /// Delay the response of `query` for one identifier
    pub fn delay(&self, query: Query, param: &str, delay: Duration) {
        self.delays.write().insert(key(query.sql(), &[param]), delay);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Parameters of every recorded call of `query`, in call order
    pub fn params_for(&self, query: Query) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.query == query.sql())
            .map(|call| call.params.clone())
            .collect()
    }

    /// Highest number of fetches that were running at the same moment
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
        self.in_flight.store(0, Ordering::SeqCst);
        self.peak_in_flight.store(0, Ordering::SeqCst);
    }
}

/// Counts one fetch as running until dropped, including when the fetch future is
/// cancelled mid-delay by a failing sibling.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let running = counter.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(running, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        // Saturating: `reset_calls` may have zeroed the counter while this call ran
        let _ = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |running| {
                Some(running.saturating_sub(1))
            });
    }
}

fn key(sql: &str, params: &[&str]) -> CallKey {
    (
        sql.to_string(),
        params.iter().map(|param| (*param).to_string()).collect(),
    )
}

#[async_trait]
impl DataAccess for InMemoryDataAccess {
    async fn fetch(&self, query: &str, params: &[String]) -> Result<RowSet, DataStoreError> {
        self.calls.lock().push(RecordedCall {
            query: query.to_string(),
            params: params.to_vec(),
        });

        let call_key = (query.to_string(), params.to_vec());
        let delay = self.delays.read().get(&call_key).copied();

        let in_flight = InFlight::enter(&self.in_flight, &self.peak_in_flight);

        // Yield even without a scripted delay so sibling fetches overlap
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        drop(in_flight);

        if let Some(error) = self.failures.read().get(query).cloned() {
            return Err(error);
        }

        Ok(self
            .responses
            .read()
            .get(&call_key)
            .cloned()
            .unwrap_or_default())
    }
}
