//! Effects requested by the dialogue controller.
//!
//! The controller never performs I/O or waits. It returns effects and the
//! session runtime carries them out, feeding results back as events.

use serde::Serialize;
use std::time::Duration;

use super::property::{FeedbackSubmission, LookupRequest};

/// Identifies one dispatched lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LookupTicket {
    /// Session epoch at dispatch time.
    pub epoch: u64,
    /// Monotonic per-controller sequence number.
    pub sequence: u64,
}

/// Delayed UI reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Continuation {
    /// Greet the user after the name step.
    Greet,
    /// Offer the follow-up menu after a lookup settles.
    OfferFollowUp,
    /// Thank the user for the rating.
    ThankForFeedback,
    /// Reset the conversation after the thank-you.
    ResetAfterFeedback,
}

/// A continuation bound to the epoch it was scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Scheduled {
    pub epoch: u64,
    pub continuation: Continuation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call the property lookup service.
    Lookup {
        ticket: LookupTicket,
        request: LookupRequest,
    },
    /// Fire-and-forget feedback submission.
    SubmitFeedback(FeedbackSubmission),
    /// Run `scheduled` after `delay`, unless the session is torn down first.
    Schedule { delay: Duration, scheduled: Scheduled },
    /// The typing indicator changed.
    TypingChanged(bool),
    /// The conversation was reset to its welcome state.
    ConversationReset,
    /// Ask the host to close the widget.
    CloseWidget,
}
