//! Record fetcher: one catalogue statement in, the raw row set out.
//!
//! Failures are wrapped into [`EnquiryError::DataAccess`] naming the statement that
//! failed. Nothing is retried.

use crate::database::data_access::{DataAccess, RowSet};
use crate::database::queries::Query;
use crate::error::{EnquiryError, EnquiryResult};
use crate::observer::EnquiryObserver;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RecordFetcher {
    data_access: Arc<dyn DataAccess>,
    observer: Arc<dyn EnquiryObserver>,
}

impl RecordFetcher {
    pub fn new(data_access: Arc<dyn DataAccess>, observer: Arc<dyn EnquiryObserver>) -> Self {
        Self {
            data_access,
            observer,
        }
    }

    pub fn observer(&self) -> &Arc<dyn EnquiryObserver> {
        &self.observer
    }

    pub async fn fetch(&self, query: Query, params: &[String]) -> EnquiryResult<RowSet> {
        self.observer.query_started(query, params);
        let started = Instant::now();

        match self.data_access.fetch(query.sql(), params).await {
            Ok(rows) => {
                self.observer
                    .query_completed(query, rows.len(), started.elapsed());
                Ok(rows)
            }
            Err(source) => {
                let error = EnquiryError::data_access(query.name(), &source);
                self.observer.query_failed(query, &error.to_string());
                Err(error)
            }
        }
    }

    /// Fetch with a single identifier parameter
    pub async fn fetch_by(&self, query: Query, identifier: &str) -> EnquiryResult<RowSet> {
        self.fetch(query, &[identifier.to_string()]).await
    }
}
