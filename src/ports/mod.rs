//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the dialogue domain and the outside world. Adapters implement these ports.
//!
//! - `PropertyLookup` - The zoning data service
//! - `FeedbackSink` - Where conversation ratings go
//! - `DialoguePresenter` - The host UI

mod feedback_sink;
mod presenter;
mod property_lookup;

pub use feedback_sink::{FeedbackError, FeedbackSink};
pub use presenter::DialoguePresenter;
pub use property_lookup::{settle, LookupError, LookupResponse, PropertyLookup};
