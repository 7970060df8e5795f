//! Session state aggregate.
//!
//! The single mutable record of one conversation. Only the dialogue
//! controller writes to it; presenters read snapshots.
//!
//! # Invariants
//!
//! - `current_intent` and `previous_intent` are always valid codes
//! - `address_confirmed` is true only while a lookup is outstanding; the
//!   controller clears it the first time a result is consumed
//! - `selected_intents` only grows until `reset`
//! - `reset` restores the welcome state and bumps `epoch`

use serde::Serialize;
use std::collections::BTreeSet;

use crate::domain::foundation::FeedbackRating;

use super::intent::IntentCode;
use super::message::{Message, MessageTag};
use super::property::PropertyContext;
use super::templates;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    user_name: Option<String>,
    messages: Vec<Message>,
    current_intent: IntentCode,
    previous_intent: IntentCode,
    address_confirmed: bool,
    selected_intents: BTreeSet<IntentCode>,
    is_typing: bool,
    pending_feedback: bool,
    feedback_rating: Option<FeedbackRating>,
    show_document_link: bool,
    show_follow_up_menu: bool,
    show_zoning_menu: bool,
    document_message_indices: Vec<usize>,

    /// Last address the user supplied.
    address: Option<String>,
    /// Property from the most recent successful lookup.
    property: Option<PropertyContext>,
    /// Latched once the follow-up menu was offered for the current response.
    follow_up_message_added: bool,
    /// Lookups settled (found, rejected or failed) since the last reset.
    resolved_lookups: u32,
    /// Feedback submitted; waiting for the automatic reset.
    closed: bool,
    /// Incremented on every reset; stale async results carry an older value.
    epoch: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Creates a fresh session holding only the welcome message.
    pub fn new() -> Self {
        Self::with_epoch(0)
    }

    fn with_epoch(epoch: u64) -> Self {
        Self {
            user_name: None,
            messages: vec![Message::assistant(templates::WELCOME)],
            current_intent: IntentCode::default(),
            previous_intent: IntentCode::default(),
            address_confirmed: false,
            selected_intents: BTreeSet::new(),
            is_typing: false,
            pending_feedback: false,
            feedback_rating: None,
            show_document_link: false,
            show_follow_up_menu: false,
            show_zoning_menu: false,
            document_message_indices: Vec::new(),
            address: None,
            property: None,
            follow_up_message_added: false,
            resolved_lookups: 0,
            closed: false,
            epoch,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn current_intent(&self) -> IntentCode {
        self.current_intent
    }

    pub fn previous_intent(&self) -> IntentCode {
        self.previous_intent
    }

    pub fn address_confirmed(&self) -> bool {
        self.address_confirmed
    }

    pub fn selected_intents(&self) -> &BTreeSet<IntentCode> {
        &self.selected_intents
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn pending_feedback(&self) -> bool {
        self.pending_feedback
    }

    pub fn feedback_rating(&self) -> Option<FeedbackRating> {
        self.feedback_rating
    }

    pub fn show_document_link(&self) -> bool {
        self.show_document_link
    }

    pub fn show_follow_up_menu(&self) -> bool {
        self.show_follow_up_menu
    }

    pub fn show_zoning_menu(&self) -> bool {
        self.show_zoning_menu
    }

    pub fn document_message_indices(&self) -> &[usize] {
        &self.document_message_indices
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn property(&self) -> Option<&PropertyContext> {
        self.property.as_ref()
    }

    pub fn has_property(&self) -> bool {
        self.property.is_some()
    }

    pub fn follow_up_message_added(&self) -> bool {
        self.follow_up_message_added
    }

    pub fn resolved_lookups(&self) -> u32 {
        self.resolved_lookups
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn user_message_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_from_user()).count()
    }

    /// Most recent message sent by the assistant.
    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| !m.is_from_user())
    }

    /// Returns true if the latest assistant message has exactly this text.
    pub fn last_assistant_said(&self, text: &str) -> bool {
        self.last_assistant_message().is_some_and(|m| m.text() == text)
    }

    /// Returns true if the assistant ever asked for an address.
    pub fn has_address_prompt(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.has_tag(MessageTag::IsAddressPrompt))
    }

    /// Query intents offered in the option menu, in catalog order.
    ///
    /// The initial menu hides intents already chosen (all five come back
    /// once every one has been chosen). The follow-up menu offers every
    /// query plus change-address (once a property is loaded) and "No".
    pub fn menu_options(&self) -> Vec<IntentCode> {
        if self.show_zoning_menu {
            let remaining: Vec<IntentCode> = IntentCode::QUERIES
                .into_iter()
                .filter(|code| !self.selected_intents.contains(code))
                .collect();
            if remaining.is_empty() {
                IntentCode::QUERIES.to_vec()
            } else {
                remaining
            }
        } else if self.show_follow_up_menu {
            let mut options = IntentCode::QUERIES.to_vec();
            if self.has_property() {
                options.push(IntentCode::ChangeAddress);
            }
            options.push(IntentCode::EndConversation);
            options
        } else {
            Vec::new()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation (controller only)
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a message and returns its index.
    pub(crate) fn push_message(&mut self, message: Message) -> usize {
        if message.is_from_user() {
            self.follow_up_message_added = false;
        }
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// Replaces the trailing placeholder with `message`, or appends it if
    /// the log does not end with a placeholder. Returns the message index.
    pub(crate) fn replace_last_placeholder(&mut self, message: Message) -> usize {
        let ends_with_placeholder = self
            .messages
            .last()
            .is_some_and(|m| !m.is_from_user() && m.text() == templates::PLACEHOLDER);

        if ends_with_placeholder {
            let index = self.messages.len() - 1;
            self.messages[index] = message;
            index
        } else {
            self.push_message(message)
        }
    }

    pub(crate) fn set_user_name(&mut self, name: Option<String>) {
        self.user_name = name;
    }

    pub(crate) fn set_current_intent(&mut self, intent: IntentCode) {
        self.current_intent = intent;
    }

    pub(crate) fn set_previous_intent(&mut self, intent: IntentCode) {
        self.previous_intent = intent;
    }

    pub(crate) fn set_address_confirmed(&mut self, confirmed: bool) {
        self.address_confirmed = confirmed;
    }

    pub(crate) fn record_selected(&mut self, intent: IntentCode) {
        self.selected_intents.insert(intent);
    }

    /// Returns true if the value changed.
    pub(crate) fn set_typing(&mut self, typing: bool) -> bool {
        let changed = self.is_typing != typing;
        self.is_typing = typing;
        changed
    }

    pub(crate) fn set_pending_feedback(&mut self, pending: bool) {
        self.pending_feedback = pending;
    }

    pub(crate) fn record_feedback(&mut self, rating: FeedbackRating) {
        self.feedback_rating = Some(rating);
        self.pending_feedback = false;
        self.closed = true;
    }

    pub(crate) fn set_follow_up_menu(&mut self, visible: bool) {
        self.show_follow_up_menu = visible;
    }

    pub(crate) fn set_zoning_menu(&mut self, visible: bool) {
        self.show_zoning_menu = visible;
    }

    pub(crate) fn mark_follow_up_added(&mut self) {
        self.follow_up_message_added = true;
    }

    pub(crate) fn attach_document(&mut self, index: usize) {
        if !self.document_message_indices.contains(&index) {
            self.document_message_indices.push(index);
        }
        self.show_document_link = true;
    }

    pub(crate) fn set_address(&mut self, address: impl Into<String>) {
        self.address = Some(address.into());
    }

    pub(crate) fn set_property(&mut self, property: PropertyContext) {
        self.property = Some(property);
    }

    pub(crate) fn mark_lookup_resolved(&mut self) {
        self.resolved_lookups += 1;
    }

    /// Restores the welcome state. Calling it repeatedly only advances `epoch`.
    pub(crate) fn reset(&mut self) {
        *self = Self::with_epoch(self.epoch + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::property::PropertyRecord;

    fn property(address: &str) -> PropertyContext {
        PropertyContext {
            address: address.to_string(),
            record: PropertyRecord::default(),
            report_link: None,
            day_night: None,
        }
    }

    mod defaults {
        use super::*;

        #[test]
        fn new_session_holds_only_the_welcome_message() {
            let state = SessionState::new();
            assert_eq!(state.messages().len(), 1);
            assert_eq!(state.messages()[0].text(), templates::WELCOME);
            assert_eq!(state.current_intent(), IntentCode::PropertyDetails);
            assert_eq!(state.previous_intent(), IntentCode::PropertyDetails);
            assert!(state.selected_intents().is_empty());
            assert_eq!(state.user_message_count(), 0);
        }

        #[test]
        fn no_menu_before_greeting() {
            assert!(SessionState::new().menu_options().is_empty());
        }
    }

    mod placeholder {
        use super::*;

        #[test]
        fn replaces_trailing_placeholder_in_place() {
            let mut state = SessionState::new();
            state.push_message(Message::assistant(templates::PLACEHOLDER));
            let index = state.replace_last_placeholder(Message::assistant("R-1"));
            assert_eq!(index, 1);
            assert_eq!(state.messages().len(), 2);
            assert_eq!(state.messages()[1].text(), "R-1");
        }

        #[test]
        fn appends_when_user_spoke_after_placeholder() {
            let mut state = SessionState::new();
            state.push_message(Message::assistant(templates::PLACEHOLDER));
            state.push_message(Message::user("hurry up"));
            let index = state.replace_last_placeholder(Message::assistant("R-1"));
            assert_eq!(index, 3);
            assert_eq!(state.messages()[1].text(), templates::PLACEHOLDER);
        }
    }

    mod follow_up_latch {
        use super::*;

        #[test]
        fn user_message_releases_latch() {
            let mut state = SessionState::new();
            state.mark_follow_up_added();
            state.push_message(Message::assistant("still latched"));
            assert!(state.follow_up_message_added());
            state.push_message(Message::user("hello"));
            assert!(!state.follow_up_message_added());
        }
    }

    mod menus {
        use super::*;

        #[test]
        fn initial_menu_hides_selected_intents() {
            let mut state = SessionState::new();
            state.set_zoning_menu(true);
            state.record_selected(IntentCode::PropertyDetails);
            let options = state.menu_options();
            assert_eq!(options.len(), 4);
            assert!(!options.contains(&IntentCode::PropertyDetails));
        }

        #[test]
        fn initial_menu_refills_when_everything_was_chosen() {
            let mut state = SessionState::new();
            state.set_zoning_menu(true);
            for code in IntentCode::QUERIES {
                state.record_selected(code);
            }
            assert_eq!(state.menu_options(), IntentCode::QUERIES.to_vec());
        }

        #[test]
        fn follow_up_menu_offers_change_address_once_property_loaded() {
            let mut state = SessionState::new();
            state.set_follow_up_menu(true);
            assert!(!state.menu_options().contains(&IntentCode::ChangeAddress));
            state.set_property(property("42 Elm Street"));
            let options = state.menu_options();
            assert!(options.contains(&IntentCode::ChangeAddress));
            assert_eq!(options.last(), Some(&IntentCode::EndConversation));
        }
    }

    mod reset {
        use super::*;

        #[test]
        fn reset_restores_welcome_state_and_bumps_epoch() {
            let mut state = SessionState::new();
            state.set_user_name(Some("Bob".to_string()));
            state.push_message(Message::user("Bob"));
            state.record_selected(IntentCode::ZoningDistrict);
            state.set_current_intent(IntentCode::ZoningDistrict);
            state.set_property(property("42 Elm Street"));
            state.attach_document(1);

            state.reset();

            assert_eq!(state.user_name(), None);
            assert_eq!(state.messages().len(), 1);
            assert!(state.selected_intents().is_empty());
            assert_eq!(state.current_intent(), IntentCode::PropertyDetails);
            assert!(state.property().is_none());
            assert!(state.document_message_indices().is_empty());
            assert_eq!(state.epoch(), 1);
        }

        #[test]
        fn attach_document_deduplicates_indices() {
            let mut state = SessionState::new();
            state.attach_document(2);
            state.attach_document(2);
            assert_eq!(state.document_message_indices(), &[2]);
            assert!(state.show_document_link());
        }
    }
}
