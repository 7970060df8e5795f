//! Dialogue controller.
//!
//! The state machine behind the chat widget. It consumes host events
//! (typed text, option clicks, star ratings, reset, close) and internal
//! events (settled lookups, fired continuations), mutates the session, and
//! returns the effects the runtime must carry out.
//!
//! Typed text is processed in a fixed order:
//!
//! 1. append the user message
//! 2. first message of the session: capture (or skip) the name and greet
//! 3. routed intent: prompt for an address, ask what to build, look up,
//!    change address or say goodbye
//! 4. street address: look up (or, for feasibility, collect the building type)
//! 5. mentions "address": ask for one
//! 6. resolved context: building-type answer, late "no", or fallback
//! 7. fallback: "not trained to understand"
//!
//! Concurrent lookups race: whichever settles first while
//! `address_confirmed` is set is consumed, later ones are dropped.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::foundation::{FeedbackRating, SessionId, StateMachine};

use super::catalog::IntentCatalog;
use super::effect::{Continuation, Effect, LookupTicket, Scheduled};
use super::intent::IntentCode;
use super::message::{Message, MessageTag};
use super::phase::DialoguePhase;
use super::property::{FeedbackSubmission, LookupRequest, LookupSettlement, PropertyContext};
use super::router::{self, IntentRouter};
use super::session::SessionState;
use super::snapshot::SessionSnapshot;
use super::templates;

/// Delays for the scheduled UI reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueTimings {
    /// "Thinking" pause before the greeting.
    pub thinking: Duration,
    /// Pause between an answer and the follow-up menu.
    pub follow_up: Duration,
    /// Pause between a rating and the thank-you.
    pub feedback_thanks: Duration,
    /// Pause between the thank-you and the reset.
    pub reset: Duration,
}

impl DialogueTimings {
    /// All delays zero; continuations still go through the scheduler.
    pub fn immediate() -> Self {
        Self {
            thinking: Duration::ZERO,
            follow_up: Duration::ZERO,
            feedback_thanks: Duration::ZERO,
            reset: Duration::ZERO,
        }
    }
}

impl Default for DialogueTimings {
    fn default() -> Self {
        Self {
            thinking: Duration::from_millis(800),
            follow_up: Duration::from_millis(1200),
            feedback_thanks: Duration::from_millis(800),
            reset: Duration::from_millis(2500),
        }
    }
}

/// The single writer of a conversation's [`SessionState`].
#[derive(Debug)]
pub struct DialogueController {
    session_id: SessionId,
    router: IntentRouter,
    timings: DialogueTimings,
    state: SessionState,
    in_flight: BTreeMap<u64, LookupRequest>,
    next_sequence: u64,
    torn_down: bool,
}

impl DialogueController {
    /// Creates a controller with a fresh session.
    pub fn new(router: IntentRouter, timings: DialogueTimings) -> Self {
        Self::with_session_id(SessionId::new(), router, timings)
    }

    pub fn with_session_id(session_id: SessionId, router: IntentRouter, timings: DialogueTimings) -> Self {
        Self {
            session_id,
            router,
            timings,
            state: SessionState::new(),
            in_flight: BTreeMap::new(),
            next_sequence: 0,
            torn_down: false,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn catalog(&self) -> &IntentCatalog {
        self.router.catalog()
    }

    pub fn phase(&self) -> DialoguePhase {
        DialoguePhase::derive(&self.state)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self.session_id, &self.state, self.router.catalog())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host events
    // ─────────────────────────────────────────────────────────────────────────

    /// Handles a typed message.
    pub fn on_user_submit(&mut self, text: &str) -> Vec<Effect> {
        let text = text.trim();
        if text.is_empty() || !self.accepting("user_submit") {
            return Vec::new();
        }
        let text = text.to_string();
        self.observe("user_submit", |this, effects| this.handle_text(&text, effects))
    }

    /// Handles a click on an option button.
    ///
    /// Known labels bypass the router and select their intent directly.
    /// Unknown labels are treated as typed text.
    pub fn on_option_click(&mut self, label: &str) -> Vec<Effect> {
        let Some(code) = self.router.catalog().find_by_prompt(label) else {
            debug!(label, "Unknown option label, treating as text");
            return self.on_user_submit(label);
        };
        if !self.accepting("option_click") {
            return Vec::new();
        }

        let prompt = self.router.catalog().prompt(code).to_string();
        self.observe("option_click", |this, effects| {
            this.state
                .push_message(Message::user(prompt).with_tag(MessageTag::IsOptionEcho));
            this.select_intent(code, effects);
        })
    }

    /// Handles a star rating from the feedback control.
    pub fn on_feedback_click(&mut self, stars: u8) -> Vec<Effect> {
        if !self.accepting("feedback_click") {
            return Vec::new();
        }
        if !self.state.pending_feedback() {
            warn!(session_id = %self.session_id, stars, "Feedback click while no rating was requested");
            return Vec::new();
        }
        let rating = match FeedbackRating::try_new(stars) {
            Ok(rating) => rating,
            Err(err) => {
                warn!(session_id = %self.session_id, error = %err, "Ignoring invalid rating");
                return Vec::new();
            }
        };

        self.observe("feedback_click", |this, effects| {
            this.state.record_feedback(rating);
            let name = this
                .state
                .user_name()
                .unwrap_or(templates::ANONYMOUS)
                .to_string();
            info!(session_id = %this.session_id, rating = rating.stars(), "Submitting feedback");
            effects.push(Effect::SubmitFeedback(FeedbackSubmission { name, rating }));
            this.schedule(Continuation::ThankForFeedback, this.timings.feedback_thanks, effects);
        })
    }

    /// Resets the conversation to its welcome state.
    pub fn on_reset_requested(&mut self) -> Vec<Effect> {
        if !self.accepting("reset_requested") {
            return Vec::new();
        }
        self.observe("reset_requested", |this, effects| this.reset_session(effects))
    }

    /// The widget was unmounted. Every later event is ignored.
    pub fn on_widget_closed(&mut self) -> Vec<Effect> {
        if self.torn_down {
            return Vec::new();
        }
        info!(session_id = %self.session_id, "Widget closed, discarding session");
        self.torn_down = true;
        self.in_flight.clear();
        self.state.reset();
        Vec::new()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal events
    // ─────────────────────────────────────────────────────────────────────────

    /// Consumes a settled lookup, at most once.
    pub fn on_lookup_settled(&mut self, ticket: LookupTicket, settlement: LookupSettlement) -> Vec<Effect> {
        if self.torn_down || ticket.epoch != self.state.epoch() {
            debug!(
                session_id = %self.session_id,
                ticket_epoch = ticket.epoch,
                epoch = self.state.epoch(),
                "Discarding lookup from a previous conversation"
            );
            return Vec::new();
        }
        let Some(request) = self.in_flight.remove(&ticket.sequence) else {
            debug!(session_id = %self.session_id, sequence = ticket.sequence, "Unknown lookup ticket");
            return Vec::new();
        };
        if !self.state.address_confirmed() {
            debug!(
                session_id = %self.session_id,
                sequence = ticket.sequence,
                "Lookup result already consumed, dropping"
            );
            return Vec::new();
        }

        self.observe("lookup_settled", |this, effects| {
            this.state.set_address_confirmed(false);
            this.set_typing(false, effects);
            this.state.mark_lookup_resolved();
            this.present_settlement(request, settlement);
            this.schedule(Continuation::OfferFollowUp, this.timings.follow_up, effects);
        })
    }

    /// Records the outcome of a feedback submission. Nothing is shown.
    pub fn on_feedback_settled(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => info!(session_id = %self.session_id, "Feedback accepted"),
            Err(reason) => warn!(session_id = %self.session_id, reason, "Feedback submission failed"),
        }
    }

    /// Runs a scheduled continuation unless its conversation is gone.
    pub fn on_continuation(&mut self, scheduled: Scheduled) -> Vec<Effect> {
        if self.torn_down || scheduled.epoch != self.state.epoch() {
            debug!(
                session_id = %self.session_id,
                continuation = ?scheduled.continuation,
                "Discarding stale continuation"
            );
            return Vec::new();
        }

        self.observe("continuation", |this, effects| match scheduled.continuation {
            Continuation::Greet => this.greet(effects),
            Continuation::OfferFollowUp => this.offer_follow_up(),
            Continuation::ThankForFeedback => {
                this.state.push_message(Message::assistant(templates::FEEDBACK_THANKS));
                this.schedule(Continuation::ResetAfterFeedback, this.timings.reset, effects);
            }
            Continuation::ResetAfterFeedback => {
                this.reset_session(effects);
                effects.push(Effect::CloseWidget);
            }
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Turn processing
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_text(&mut self, text: &str, effects: &mut Vec<Effect>) {
        self.state.push_message(Message::user(text));
        let turn = self.state.user_message_count();

        if turn == 1 {
            self.capture_name(text, effects);
            return;
        }

        if let Some(code) = self.router.route(text, turn == 2) {
            debug!(session_id = %self.session_id, intent = %code, "Routed intent");
            self.select_intent(code, effects);
            return;
        }

        if router::looks_like_address(text) {
            self.handle_address(text, effects);
            return;
        }

        if router::mentions_address(text) {
            self.ask_for_address(templates::ADDRESS_PROMPT);
            return;
        }

        if self.state.has_property() || self.state.has_address_prompt() {
            self.handle_resolved_context_text(text, turn, effects);
            return;
        }

        self.say(templates::NOT_UNDERSTOOD);
    }

    fn capture_name(&mut self, text: &str, effects: &mut Vec<Effect>) {
        let name = if router::is_name_decline(text) {
            None
        } else {
            router::extract_name(text)
        };
        debug!(session_id = %self.session_id, named = name.is_some(), "Captured name");
        self.state.set_user_name(name);
        self.set_typing(true, effects);
        self.schedule(Continuation::Greet, self.timings.thinking, effects);
    }

    fn select_intent(&mut self, code: IntentCode, effects: &mut Vec<Effect>) {
        self.state.record_selected(code);
        self.state.set_follow_up_menu(false);
        if code != IntentCode::EndConversation {
            self.state.set_pending_feedback(false);
        }

        match code {
            IntentCode::EndConversation => self.end_conversation(),
            IntentCode::ChangeAddress => {
                let current = self.state.current_intent();
                if current != IntentCode::ChangeAddress {
                    self.state.set_previous_intent(current);
                }
                self.state.set_current_intent(IntentCode::ChangeAddress);
                self.ask_for_address(templates::NEW_ADDRESS_PROMPT);
            }
            IntentCode::BuildingType => {
                self.state.set_current_intent(IntentCode::BuildingType);
                if self.state.has_property() {
                    self.say(templates::BUILDING_QUESTION);
                } else {
                    self.ask_for_address(templates::ADDRESS_PROMPT);
                }
            }
            query => {
                self.state.set_current_intent(query);
                match self.state.property().map(|p| p.address.clone()) {
                    Some(address) => self.dispatch_lookup(LookupRequest::new(address, query), effects),
                    None => self.ask_for_address(templates::ADDRESS_PROMPT),
                }
            }
        }
    }

    fn handle_address(&mut self, text: &str, effects: &mut Vec<Effect>) {
        let current = self.state.current_intent();

        if current == IntentCode::BuildingType && self.collecting_building_type() {
            self.dispatch_building_lookup(text, effects);
            return;
        }

        // Feasibility needs a building type before the first lookup.
        if current == IntentCode::BuildingType && !self.state.has_property() {
            self.state.set_address(text);
            self.say(templates::BUILDING_QUESTION);
            return;
        }

        let option = if current == IntentCode::ChangeAddress {
            let previous = self.state.previous_intent();
            self.state.set_current_intent(previous);
            previous
        } else {
            current
        };

        self.dispatch_lookup(LookupRequest::new(text, option), effects);
    }

    fn handle_resolved_context_text(&mut self, text: &str, turn: usize, effects: &mut Vec<Effect>) {
        if self.state.current_intent() == IntentCode::BuildingType && self.collecting_building_type() {
            self.dispatch_building_lookup(text, effects);
            return;
        }

        if router::normalize(text) == "no" && turn > 2 {
            self.state.set_follow_up_menu(false);
            self.end_conversation();
            return;
        }

        self.say(templates::NOT_UNDERSTOOD);
    }

    /// True when the assistant's latest message asked what to build.
    fn collecting_building_type(&self) -> bool {
        self.state.last_assistant_said(templates::BUILDING_QUESTION)
    }

    fn dispatch_building_lookup(&mut self, building_type: &str, effects: &mut Vec<Effect>) {
        let address = self
            .state
            .address()
            .map(str::to_string)
            .or_else(|| self.state.property().map(|p| p.address.clone()));

        match address {
            Some(address) => {
                let request = LookupRequest::new(address, IntentCode::BuildingType)
                    .with_building_type(building_type);
                self.dispatch_lookup(request, effects);
            }
            None => self.ask_for_address(templates::ADDRESS_PROMPT),
        }
    }

    fn dispatch_lookup(&mut self, request: LookupRequest, effects: &mut Vec<Effect>) {
        self.next_sequence += 1;
        let ticket = LookupTicket {
            epoch: self.state.epoch(),
            sequence: self.next_sequence,
        };

        info!(
            session_id = %self.session_id,
            sequence = ticket.sequence,
            option = %request.option,
            has_building_type = request.building_type.is_some(),
            "Dispatching property lookup"
        );

        self.state.set_address(request.address.clone());
        self.state.push_message(Message::assistant(templates::PLACEHOLDER));
        self.state.set_address_confirmed(true);
        self.set_typing(true, effects);
        self.in_flight.insert(ticket.sequence, request.clone());
        effects.push(Effect::Lookup { ticket, request });
    }

    fn present_settlement(&mut self, request: LookupRequest, settlement: LookupSettlement) {
        match settlement {
            LookupSettlement::Found(report) => {
                info!(session_id = %self.session_id, option = %request.option, "Lookup found property");
                let text = if report.answer.trim().is_empty() {
                    templates::found_answer(&request.address)
                } else {
                    report.answer
                };
                let index = self.state.replace_last_placeholder(
                    Message::assistant(text).with_tag(MessageTag::ShowsDocumentLink),
                );
                self.state.attach_document(index);
                self.state.set_property(PropertyContext {
                    address: request.address,
                    record: report.record,
                    report_link: report.report_link,
                    day_night: report.day_night,
                });
            }
            LookupSettlement::Rejected { message } => {
                info!(session_id = %self.session_id, option = %request.option, "Lookup returned no data");
                let text = if message.trim().is_empty() {
                    templates::NO_DATA.to_string()
                } else {
                    message
                };
                self.say(text);
            }
            LookupSettlement::Failed { reason } => {
                warn!(session_id = %self.session_id, reason, "Property lookup failed");
                self.say(templates::LOOKUP_UNAVAILABLE);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Continuations
    // ─────────────────────────────────────────────────────────────────────────

    fn greet(&mut self, effects: &mut Vec<Effect>) {
        self.set_typing(false, effects);
        let greeting = templates::greeting(self.state.user_name());
        self.state
            .push_message(Message::assistant(greeting).with_tag(MessageTag::ShowsFollowUpMenu));
        self.state.set_zoning_menu(true);
        self.state.set_follow_up_menu(true);
    }

    fn offer_follow_up(&mut self) {
        if self.state.follow_up_message_added() {
            debug!(session_id = %self.session_id, "Follow-up already offered for this response");
            return;
        }
        if self.state.pending_feedback() || self.state.address_confirmed() {
            debug!(session_id = %self.session_id, "Skipping follow-up, conversation moved on");
            return;
        }
        self.state
            .push_message(Message::assistant(templates::FOLLOW_UP).with_tag(MessageTag::ShowsFollowUpMenu));
        self.state.mark_follow_up_added();
        self.state.set_zoning_menu(false);
        self.state.set_follow_up_menu(true);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn end_conversation(&mut self) {
        let closing = templates::closing(self.state.user_name());
        self.state
            .push_message(Message::assistant(closing).with_tag(MessageTag::ShowsFeedbackControl));
        self.state.set_pending_feedback(true);
        self.state.set_zoning_menu(false);
        self.state.set_follow_up_menu(false);
    }

    fn reset_session(&mut self, effects: &mut Vec<Effect>) {
        let was_typing = self.state.is_typing();
        self.in_flight.clear();
        self.state.reset();
        info!(session_id = %self.session_id, epoch = self.state.epoch(), "Conversation reset");
        if was_typing {
            effects.push(Effect::TypingChanged(false));
        }
        effects.push(Effect::ConversationReset);
    }

    fn ask_for_address(&mut self, prompt: &str) {
        self.state
            .push_message(Message::assistant(prompt).with_tag(MessageTag::IsAddressPrompt));
    }

    fn say(&mut self, text: impl Into<String>) {
        self.state.push_message(Message::assistant(text));
    }

    fn set_typing(&mut self, typing: bool, effects: &mut Vec<Effect>) {
        if self.state.set_typing(typing) {
            effects.push(Effect::TypingChanged(typing));
        }
    }

    fn schedule(&self, continuation: Continuation, delay: Duration, effects: &mut Vec<Effect>) {
        effects.push(Effect::Schedule {
            delay,
            scheduled: Scheduled {
                epoch: self.state.epoch(),
                continuation,
            },
        });
    }

    fn accepting(&self, event: &'static str) -> bool {
        if self.torn_down {
            warn!(session_id = %self.session_id, event, "Event after widget close ignored");
            return false;
        }
        if !self.phase().accepts_text() && event != "reset_requested" {
            debug!(session_id = %self.session_id, event, "Conversation closed, ignoring event");
            return false;
        }
        true
    }

    /// Runs a handler and logs the phase change it caused.
    fn observe<F>(&mut self, event: &'static str, handler: F) -> Vec<Effect>
    where
        F: FnOnce(&mut Self, &mut Vec<Effect>),
    {
        let before = self.phase();
        let mut effects = Vec::new();
        handler(self, &mut effects);
        let after = self.phase();

        if before != after {
            if before.can_transition_to(&after) {
                debug!(session_id = %self.session_id, event, from = ?before, to = ?after, "Phase changed");
            } else {
                warn!(session_id = %self.session_id, event, from = ?before, to = ?after, "Unexpected phase change");
            }
        }
        effects
    }
}
