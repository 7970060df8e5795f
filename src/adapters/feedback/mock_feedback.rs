//! Mock Feedback Sink for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::dialogue::FeedbackSubmission;
use crate::ports::{FeedbackError, FeedbackSink};

/// Records submissions; fails with queued errors first, then succeeds.
#[derive(Debug, Clone, Default)]
pub struct MockFeedbackSink {
    errors: Arc<Mutex<VecDeque<FeedbackError>>>,
    submissions: Arc<Mutex<Vec<FeedbackSubmission>>>,
}

impl MockFeedbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(self, error: FeedbackError) -> Self {
        self.errors.lock().unwrap().push_back(error);
        self
    }

    pub fn submissions(&self) -> Vec<FeedbackSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedbackSink for MockFeedbackSink {
    async fn submit(&self, submission: FeedbackSubmission) -> Result<(), FeedbackError> {
        self.submissions.lock().unwrap().push(submission);
        match self.errors.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
