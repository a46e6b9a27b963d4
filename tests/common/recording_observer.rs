use parking_lot::Mutex;
use std::time::Duration;
use vehicle_enquiry::database::Query;
use vehicle_enquiry::models::{IdentifierKind, Lookup};
use vehicle_enquiry::observer::EnquiryObserver;

#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    Selected {
        operation: String,
        lookup: Lookup,
        ignored: Vec<IdentifierKind>,
    },
    Started(Query),
    Completed(Query, usize),
    Failed(Query),
    Skipped(Query),
    NotFound(String),
}

/// Observer that keeps every notification for later assertions
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&ObservedEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|event| predicate(event)).count()
    }

    fn push(&self, event: ObservedEvent) {
        self.events.lock().push(event);
    }
}

impl EnquiryObserver for RecordingObserver {
    fn lookup_selected(&self, operation: &str, lookup: &Lookup, ignored: &[IdentifierKind]) {
        self.push(ObservedEvent::Selected {
            operation: operation.to_string(),
            lookup: lookup.clone(),
            ignored: ignored.to_vec(),
        });
    }

    fn query_started(&self, query: Query, _params: &[String]) {
        self.push(ObservedEvent::Started(query));
    }

    fn query_completed(&self, query: Query, row_count: usize, _elapsed: Duration) {
        self.push(ObservedEvent::Completed(query, row_count));
    }

    fn query_failed(&self, query: Query, _error: &str) {
        self.push(ObservedEvent::Failed(query));
    }

    fn row_skipped(&self, query: Query, _reason: &str) {
        self.push(ObservedEvent::Skipped(query));
    }

    fn not_found(&self, _operation: &str, message: &str) {
        self.push(ObservedEvent::NotFound(message.to_string()));
    }
}
