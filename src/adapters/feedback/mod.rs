//! Feedback sink adapters.

mod http_feedback;
mod mock_feedback;

pub use http_feedback::{HttpFeedbackConfig, HttpFeedbackSink};
pub use mock_feedback::MockFeedbackSink;
