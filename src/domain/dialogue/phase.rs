//! Logical dialogue phase.
//!
//! The phase is never stored. It is derived from the session flags by
//! [`DialoguePhase::derive`], so it cannot drift out of sync with them.
//! The enum form and the flag form are equivalent views of the same state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

use super::message::MessageTag;
use super::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialoguePhase {
    /// Only the welcome message is present.
    AwaitingName,
    /// Name captured or declined; menu shown.
    AwaitingIntentOrFreeText,
    /// An intent needs an address and none was given yet.
    AwaitingAddress,
    /// Address submitted, lookup outstanding.
    AwaitingLookupResult,
    /// A lookup settled and its answer is on screen.
    PresentingResultAndMenu,
    /// User ended the conversation; star rating shown.
    AwaitingFeedback,
    /// Feedback submitted, automatic reset pending.
    Closed,
}

impl DialoguePhase {
    /// Derives the phase from the session flags.
    pub fn derive(state: &SessionState) -> Self {
        if state.is_closed() {
            return Self::Closed;
        }
        if state.pending_feedback() {
            return Self::AwaitingFeedback;
        }
        if state.address_confirmed() {
            return Self::AwaitingLookupResult;
        }
        if state.user_message_count() == 0 {
            return Self::AwaitingName;
        }
        let asked_for_address = state
            .last_assistant_message()
            .is_some_and(|m| m.has_tag(MessageTag::IsAddressPrompt));
        if asked_for_address {
            return Self::AwaitingAddress;
        }
        if state.resolved_lookups() > 0 {
            return Self::PresentingResultAndMenu;
        }
        Self::AwaitingIntentOrFreeText
    }

    /// Returns true if typed text is processed in this phase.
    pub fn accepts_text(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

impl StateMachine for DialoguePhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DialoguePhase::*;
        // A reset may happen from anywhere.
        if *target == AwaitingName {
            return true;
        }
        matches!(
            (self, target),
            (AwaitingName, AwaitingIntentOrFreeText)
                | (AwaitingName, AwaitingAddress)
                | (AwaitingName, AwaitingFeedback)
                | (AwaitingIntentOrFreeText, AwaitingAddress)
                | (AwaitingIntentOrFreeText, AwaitingLookupResult)
                | (AwaitingIntentOrFreeText, AwaitingFeedback)
                | (AwaitingAddress, AwaitingIntentOrFreeText)
                | (AwaitingAddress, AwaitingLookupResult)
                | (AwaitingAddress, PresentingResultAndMenu)
                | (AwaitingAddress, AwaitingFeedback)
                | (AwaitingLookupResult, PresentingResultAndMenu)
                | (AwaitingLookupResult, AwaitingFeedback)
                | (PresentingResultAndMenu, AwaitingAddress)
                | (PresentingResultAndMenu, AwaitingLookupResult)
                | (PresentingResultAndMenu, AwaitingFeedback)
                | (AwaitingFeedback, AwaitingAddress)
                | (AwaitingFeedback, AwaitingLookupResult)
                | (AwaitingFeedback, PresentingResultAndMenu)
                | (AwaitingFeedback, AwaitingIntentOrFreeText)
                | (AwaitingFeedback, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DialoguePhase::*;
        match self {
            AwaitingName => vec![AwaitingIntentOrFreeText, AwaitingAddress, AwaitingFeedback, AwaitingName],
            AwaitingIntentOrFreeText => vec![
                AwaitingAddress,
                AwaitingLookupResult,
                AwaitingFeedback,
                AwaitingName,
            ],
            AwaitingAddress => vec![
                AwaitingIntentOrFreeText,
                AwaitingLookupResult,
                PresentingResultAndMenu,
                AwaitingFeedback,
                AwaitingName,
            ],
            AwaitingLookupResult => vec![PresentingResultAndMenu, AwaitingFeedback, AwaitingName],
            PresentingResultAndMenu => vec![
                AwaitingAddress,
                AwaitingLookupResult,
                AwaitingFeedback,
                AwaitingName,
            ],
            AwaitingFeedback => vec![
                AwaitingAddress,
                AwaitingLookupResult,
                PresentingResultAndMenu,
                AwaitingIntentOrFreeText,
                Closed,
                AwaitingName,
            ],
            Closed => vec![AwaitingName],
        }
    }
}
