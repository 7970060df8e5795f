//! Mock Property Lookup for testing.
//!
//! # Features
//!
//! - Queued responses (consumed in order)
//! - Error injection
//! - Simulated latency, including per-response delays for race tests
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let lookup = MockPropertyLookup::new()
//!     .with_found(json!({"zoning": "R-1"}), "Zoned R-1.")
//!     .with_delay(Duration::from_millis(100));
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::dialogue::{LookupRequest, PropertyRecord};
use crate::ports::{LookupError, LookupResponse, PropertyLookup};

#[derive(Debug, Clone)]
pub struct MockPropertyLookup {
    responses: Arc<Mutex<VecDeque<MockLookupResponse>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<LookupRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub struct MockLookupResponse {
    pub result: Result<LookupResponse, LookupError>,
    /// Overrides the mock-wide delay for this response.
    pub delay: Option<Duration>,
}

impl Default for MockPropertyLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPropertyLookup {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a response carrying a property record.
    pub fn with_found(self, record: Value, msg: impl Into<String>) -> Self {
        self.with_response(LookupResponse::found(PropertyRecord::new(record), msg))
    }

    /// Queues a domain error (`data: null`).
    pub fn with_rejection(self, msg: impl Into<String>) -> Self {
        self.with_response(LookupResponse::rejected(msg))
    }

    pub fn with_response(self, response: LookupResponse) -> Self {
        self.push(Ok(response), None)
    }

    pub fn with_error(self, error: LookupError) -> Self {
        self.push(Err(error), None)
    }

    /// Queues a response that takes `delay` to arrive.
    pub fn with_delayed_response(self, response: LookupResponse, delay: Duration) -> Self {
        self.push(Ok(response), Some(delay))
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<LookupRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, result: Result<LookupResponse, LookupError>, delay: Option<Duration>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockLookupResponse { result, delay });
        self
    }

    /// Gets the next response, or a rejection when the queue is empty.
    fn next_response(&self) -> MockLookupResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockLookupResponse {
                result: Ok(LookupResponse::rejected("No match found")),
                delay: None,
            })
    }
}

#[async_trait]
impl PropertyLookup for MockPropertyLookup {
    async fn lookup(&self, request: LookupRequest) -> Result<LookupResponse, LookupError> {
        self.calls.lock().unwrap().push(request);

        let response = self.next_response();
        let delay = response.delay.unwrap_or(self.delay);
        if !delay.is_zero() {
            sleep(delay).await;
        }
        response.result
    }
}
