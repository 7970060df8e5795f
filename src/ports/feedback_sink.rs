//! Feedback Sink Port - Where conversation ratings are sent.
//!
//! Submission is fire-and-forget from the user's point of view: failures
//! are logged and never shown.

use async_trait::async_trait;

use crate::domain::dialogue::FeedbackSubmission;

#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn submit(&self, submission: FeedbackSubmission) -> Result<(), FeedbackError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackError {
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("network error: {0}")]
    Network(String),

    #[error("feedback service returned {status}")]
    Status { status: u16 },
}
