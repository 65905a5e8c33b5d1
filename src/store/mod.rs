//! In-memory request/error log
//!
//! The only shared mutable state in the system: a bounded, newest-first
//! record of recent API calls and failures, read by the debug output and
//! updated by the instrumented client's hooks.

mod types;

pub use types::{ErrorRecord, RequestRecord, RequestStatus, RequestUpdate};

use std::collections::VecDeque;
use std::sync::RwLock;

use tokio::sync::broadcast;

/// Maximum number of entries kept per sequence.
pub const LOG_CAPACITY: usize = 50;

/// Notification emitted on every store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    RequestAppended(String),
    RequestUpdated(String),
    RequestsCleared,
    ErrorAppended(String),
    ErrorsCleared,
}

/// Bounded log of the most recent requests and errors, newest first.
///
/// Oldest entries are evicted when a sequence exceeds [`LOG_CAPACITY`].
/// Subscribers are notified synchronously within each mutation; a receiver
/// that lags or hangs up never blocks or fails the mutation itself.
pub struct RequestLog {
    requests: RwLock<VecDeque<RequestRecord>>,
    errors: RwLock<VecDeque<ErrorRecord>>,
    capacity: usize,
    events: broadcast::Sender<StoreEvent>,
}

impl RequestLog {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            requests: RwLock::new(VecDeque::with_capacity(capacity)),
            errors: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
            events,
        }
    }

    /// Subscribe to mutation notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Prepends a request record, evicting the oldest entry at capacity.
    pub fn append_request(&self, record: RequestRecord) {
        let id = record.id.clone();
        {
            let mut requests = self.requests.write().unwrap();
            requests.push_front(record);
            requests.truncate(self.capacity);
        }
        let _ = self.events.send(StoreEvent::RequestAppended(id));
    }

    /// Merges `update` into the record matching `id`.
    ///
    /// Unknown ids are ignored: the record may have been evicted from the
    /// bounded buffer while its call was still in flight.
    pub fn update_request(&self, id: &str, update: RequestUpdate) {
        let found = {
            let mut requests = self.requests.write().unwrap();
            match requests.iter_mut().find(|r| r.id == id) {
                Some(record) => {
                    record.apply(update);
                    true
                }
                None => false,
            }
        };
        if found {
            let _ = self.events.send(StoreEvent::RequestUpdated(id.to_string()));
        }
    }

    pub fn clear_requests(&self) {
        self.requests.write().unwrap().clear();
        let _ = self.events.send(StoreEvent::RequestsCleared);
    }

    /// Prepends an error record, evicting the oldest entry at capacity.
    pub fn append_error(&self, record: ErrorRecord) {
        let id = record.id.clone();
        {
            let mut errors = self.errors.write().unwrap();
            errors.push_front(record);
            errors.truncate(self.capacity);
        }
        let _ = self.events.send(StoreEvent::ErrorAppended(id));
    }

    pub fn clear_errors(&self) {
        self.errors.write().unwrap().clear();
        let _ = self.events.send(StoreEvent::ErrorsCleared);
    }

    /// Snapshot of the request sequence, newest first.
    pub fn requests(&self) -> Vec<RequestRecord> {
        self.requests.read().unwrap().iter().cloned().collect()
    }

    /// Snapshot of the error sequence, newest first.
    pub fn errors(&self) -> Vec<ErrorRecord> {
        self.errors.read().unwrap().iter().cloned().collect()
    }
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn pending_record(id: &str) -> RequestRecord {
        RequestRecord::pending(
            id.to_string(),
            "GET".to_string(),
            format!("http://relay/?url=https://api.datadoghq.com/{}", id),
            BTreeMap::new(),
            None,
            1_700_000_000_000,
        )
    }

    #[test]
    fn test_new_log_is_empty() {
        let log = RequestLog::new();
        assert!(log.requests().is_empty());
        assert!(log.errors().is_empty());
    }

    #[test]
    fn test_append_request_newest_first() {
        let log = RequestLog::new();
        log.append_request(pending_record("first"));
        log.append_request(pending_record("second"));

        let requests = log.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].id, "second");
        assert_eq!(requests[1].id, "first");
    }

    #[test]
    fn test_request_eviction_fifo() {
        let log = RequestLog::new();
        for i in 0..55 {
            log.append_request(pending_record(&format!("req-{}", i)));
        }

        let requests = log.requests();
        assert_eq!(requests.len(), LOG_CAPACITY);
        // Newest first: the head is the last pushed, the tail is the oldest
        // surviving entry (0-4 were evicted).
        assert_eq!(requests[0].id, "req-54");
        assert_eq!(requests[49].id, "req-5");
    }

    #[test]
    fn test_error_eviction_fifo() {
        let log = RequestLog::new();
        for i in 0..55 {
            log.append_error(ErrorRecord {
                id: format!("err-{}", i),
                timestamp: i,
                message: "boom".to_string(),
                details: None,
                status: None,
            });
        }

        let errors = log.errors();
        assert_eq!(errors.len(), LOG_CAPACITY);
        assert_eq!(errors[0].id, "err-54");
        assert_eq!(errors[49].id, "err-5");
    }

    #[test]
    fn test_update_request_in_place() {
        let log = RequestLog::new();
        log.append_request(pending_record("a"));
        log.append_request(pending_record("b"));

        log.update_request("a", RequestUpdate::success(200, None, None, 1_700_000_000_100, 100));

        let requests = log.requests();
        assert_eq!(requests.len(), 2);
        let updated = requests.iter().find(|r| r.id == "a").unwrap();
        assert_eq!(updated.status, RequestStatus::Http(200));
        assert_eq!(updated.duration_ms, Some(100));
        assert_eq!(updated.ended_at, Some(1_700_000_000_100));
        assert!(!updated.error);
        // The other record is untouched.
        let other = requests.iter().find(|r| r.id == "b").unwrap();
        assert_eq!(other.status, RequestStatus::Pending);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let log = RequestLog::new();
        log.append_request(pending_record("a"));

        log.update_request("missing", RequestUpdate::success(200, None, None, 0, 0));

        assert_eq!(log.requests()[0].status, RequestStatus::Pending);
    }

    #[test]
    fn test_update_evicted_id_is_noop() {
        let log = RequestLog::with_capacity(2);
        log.append_request(pending_record("old"));
        log.append_request(pending_record("mid"));
        log.append_request(pending_record("new"));

        // "old" was evicted by the third append; its late completion must
        // neither error nor resurrect the record.
        log.update_request("old", RequestUpdate::success(200, None, None, 0, 0));

        let requests = log.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.id != "old"));
    }

    #[test]
    fn test_clear_requests_and_errors() {
        let log = RequestLog::new();
        log.append_request(pending_record("a"));
        log.append_error(ErrorRecord {
            id: "e".to_string(),
            timestamp: 0,
            message: "boom".to_string(),
            details: None,
            status: Some(500),
        });

        log.clear_requests();
        assert!(log.requests().is_empty());
        assert_eq!(log.errors().len(), 1);

        log.clear_errors();
        assert!(log.errors().is_empty());
    }

    #[test]
    fn test_subscriber_notified_on_each_mutation() {
        let log = RequestLog::new();
        let mut rx = log.subscribe();

        log.append_request(pending_record("a"));
        log.update_request("a", RequestUpdate::success(200, None, None, 0, 0));
        log.clear_requests();

        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::RequestAppended("a".to_string())
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::RequestUpdated("a".to_string())
        );
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::RequestsCleared);
    }

    #[test]
    fn test_noop_update_does_not_notify() {
        let log = RequestLog::new();
        let mut rx = log.subscribe();

        log.update_request("ghost", RequestUpdate::success(200, None, None, 0, 0));

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_mutations_without_subscribers_succeed() {
        let log = RequestLog::new();
        log.append_request(pending_record("a"));
        assert_eq!(log.requests().len(), 1);
    }
}
