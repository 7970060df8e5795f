//! Adapters - Implementations of port interfaces.
//!
//! - `lookup` - Property lookup over HTTP, plus a mock
//! - `feedback` - Feedback submission over HTTP, plus a mock
//! - `presenter` - Terminal and recording presenters

pub mod feedback;
pub mod lookup;
pub mod presenter;

pub use feedback::{HttpFeedbackConfig, HttpFeedbackSink, MockFeedbackSink};
pub use lookup::{HttpLookupConfig, HttpPropertyLookup, MockLookupResponse, MockPropertyLookup};
pub use presenter::{PresenterEvent, RecordingPresenter, TerminalPresenter};
