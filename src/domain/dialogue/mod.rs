//! Dialogue domain: intents, routing, session state and the controller.
//!
//! # Module Organization
//!
//! - `intent` - Intent codes exchanged with the lookup service
//! - `catalog` - Explicit intent catalog (prompts and paraphrase patterns)
//! - `router` - Free-text to intent routing and address heuristics
//! - `message` - Chat messages and their rendering tags
//! - `property` - Lookup requests, results and the loaded property
//! - `session` - Session state aggregate
//! - `phase` - Phase derived from session flags
//! - `effect` - Effects the controller asks the runtime to perform
//! - `controller` - The dialogue state machine
//! - `snapshot` - Read-only view handed to presenters
//! - `templates` - Assistant message texts

mod catalog;
mod controller;
mod effect;
mod intent;
mod message;
mod phase;
mod property;
pub mod router;
mod session;
mod snapshot;
pub mod templates;

pub use catalog::{CatalogError, IntentCatalog, IntentDefinition, IntentEntry, STANDARD_INTENTS};
pub use controller::{DialogueController, DialogueTimings};
pub use effect::{Continuation, Effect, LookupTicket, Scheduled};
pub use intent::IntentCode;
pub use message::{Message, MessageTag, Sender};
pub use phase::DialoguePhase;
pub use property::{
    DayNight, FeedbackSubmission, LookupRequest, LookupSettlement, PropertyContext, PropertyRecord,
    PropertyReport,
};
pub use router::IntentRouter;
pub use session::SessionState;
pub use snapshot::{MenuOption, SessionSnapshot};
