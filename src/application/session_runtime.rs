//! Dialogue session runtime.
//!
//! Owns one [`DialogueController`] and carries out the effects it returns:
//! lookups and feedback submissions run as spawned tasks, delayed
//! continuations as sleeping tasks. Every task reports back through a
//! single event channel, so the controller only ever sees one event at a
//! time and stays the single writer of the session.
//!
//! Closing the session aborts every outstanding task; nothing scheduled
//! before the close reaches the controller afterwards.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::domain::dialogue::{
    DialogueController, DialoguePhase, Effect, LookupSettlement, LookupTicket, Scheduled,
    SessionSnapshot,
};
use crate::domain::foundation::SessionId;
use crate::ports::{settle, DialoguePresenter, FeedbackSink, PropertyLookup};

/// Errors returned to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session {0} is closed")]
    Closed(SessionId),
}

/// Result of an async task, delivered back to the controller.
#[derive(Debug)]
enum RuntimeEvent {
    LookupSettled {
        ticket: LookupTicket,
        settlement: LookupSettlement,
    },
    FeedbackSettled(Result<(), String>),
    ContinuationDue(Scheduled),
}

/// A live conversation wired to its collaborators.
pub struct DialogueSession {
    controller: DialogueController,
    lookup: Arc<dyn PropertyLookup>,
    feedback: Arc<dyn FeedbackSink>,
    presenter: Box<dyn DialoguePresenter>,
    events_tx: mpsc::UnboundedSender<RuntimeEvent>,
    events_rx: mpsc::UnboundedReceiver<RuntimeEvent>,
    tasks: Vec<JoinHandle<()>>,
    outstanding: usize,
    closed: bool,
}

impl DialogueSession {
    /// Starts a session and renders the welcome message.
    pub fn start(
        controller: DialogueController,
        lookup: Arc<dyn PropertyLookup>,
        feedback: Arc<dyn FeedbackSink>,
        presenter: Box<dyn DialoguePresenter>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut session = Self {
            controller,
            lookup,
            feedback,
            presenter,
            events_tx,
            events_rx,
            tasks: Vec::new(),
            outstanding: 0,
            closed: false,
        };
        info!(session_id = %session.id(), "Dialogue session started");
        session.render();
        session
    }

    pub fn id(&self) -> SessionId {
        self.controller.session_id()
    }

    pub fn phase(&self) -> DialoguePhase {
        self.controller.phase()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.controller.snapshot()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of spawned tasks whose result has not been consumed yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host events
    // ─────────────────────────────────────────────────────────────────────────

    pub fn submit_text(&mut self, text: &str) -> Result<(), SessionError> {
        self.ensure_open()?;
        let effects = self.controller.on_user_submit(text);
        self.apply(effects);
        Ok(())
    }

    pub fn click_option(&mut self, label: &str) -> Result<(), SessionError> {
        self.ensure_open()?;
        let effects = self.controller.on_option_click(label);
        self.apply(effects);
        Ok(())
    }

    pub fn click_feedback(&mut self, stars: u8) -> Result<(), SessionError> {
        self.ensure_open()?;
        let effects = self.controller.on_feedback_click(stars);
        self.apply(effects);
        Ok(())
    }

    pub fn request_reset(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        let effects = self.controller.on_reset_requested();
        self.apply(effects);
        Ok(())
    }

    /// Tears the session down. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.controller.on_widget_closed();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.outstanding = 0;
        info!(session_id = %self.id(), "Dialogue session closed");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal events
    // ─────────────────────────────────────────────────────────────────────────

    /// Waits for the next task result and feeds it to the controller.
    ///
    /// Returns `false` once the session is closed. Never resolves while the
    /// session is open and idle, which makes it suitable for `select!`.
    pub async fn pump(&mut self) -> bool {
        if self.closed {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                !self.closed
            }
            None => false,
        }
    }

    /// Processes task results until none are outstanding.
    pub async fn settle(&mut self) {
        while self.outstanding > 0 && self.pump().await {}
    }

    /// Processes results that already arrived, without waiting.
    pub fn drain_ready(&mut self) {
        while !self.closed {
            match self.events_rx.try_recv() {
                Ok(event) => self.dispatch(event),
                Err(_) => break,
            }
        }
    }

    fn dispatch(&mut self, event: RuntimeEvent) {
        if self.closed {
            return;
        }
        self.outstanding = self.outstanding.saturating_sub(1);

        match event {
            RuntimeEvent::LookupSettled { ticket, settlement } => {
                let effects = self.controller.on_lookup_settled(ticket, settlement);
                self.apply(effects);
            }
            RuntimeEvent::FeedbackSettled(result) => {
                self.controller.on_feedback_settled(result);
            }
            RuntimeEvent::ContinuationDue(scheduled) => {
                let effects = self.controller.on_continuation(scheduled);
                self.apply(effects);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Effects
    // ─────────────────────────────────────────────────────────────────────────

    fn apply(&mut self, effects: Vec<Effect>) {
        let mut close_widget = false;

        for effect in effects {
            match effect {
                Effect::Lookup { ticket, request } => {
                    let lookup = Arc::clone(&self.lookup);
                    let tx = self.events_tx.clone();
                    self.spawn(async move {
                        let settlement = settle(lookup.lookup(request).await);
                        let _ = tx.send(RuntimeEvent::LookupSettled { ticket, settlement });
                    });
                }
                Effect::SubmitFeedback(submission) => {
                    let feedback = Arc::clone(&self.feedback);
                    let tx = self.events_tx.clone();
                    self.spawn(async move {
                        let result = feedback.submit(submission).await.map_err(|e| e.to_string());
                        let _ = tx.send(RuntimeEvent::FeedbackSettled(result));
                    });
                }
                Effect::Schedule { delay, scheduled } => {
                    debug!(session_id = %self.id(), continuation = ?scheduled.continuation, ?delay, "Scheduling continuation");
                    let tx = self.events_tx.clone();
                    self.spawn(async move {
                        sleep(delay).await;
                        let _ = tx.send(RuntimeEvent::ContinuationDue(scheduled));
                    });
                }
                Effect::TypingChanged(typing) => self.presenter.notify_typing_changed(typing),
                Effect::ConversationReset => self.presenter.notify_conversation_reset(),
                Effect::CloseWidget => close_widget = true,
            }
        }

        self.render();
        if close_widget {
            self.presenter.close_widget();
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.tasks.retain(|handle| !handle.is_finished());
        self.tasks.push(tokio::spawn(task));
        self.outstanding += 1;
    }

    fn render(&mut self) {
        let snapshot = self.controller.snapshot();
        self.presenter.render(&snapshot);
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed {
            warn!(session_id = %self.id(), "Host event after close");
            return Err(SessionError::Closed(self.id()));
        }
        Ok(())
    }
}

impl Drop for DialogueSession {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        MockFeedbackSink, MockPropertyLookup, PresenterEvent, RecordingPresenter,
    };
    use crate::domain::dialogue::{DialogueTimings, IntentRouter};
    use crate::ports::{LookupError, LookupResponse};
    use serde_json::json;
    use std::time::Duration;

    struct Harness {
        session: DialogueSession,
        lookup: MockPropertyLookup,
        feedback: MockFeedbackSink,
        presenter: RecordingPresenter,
    }

    fn harness(lookup: MockPropertyLookup) -> Harness {
        let feedback = MockFeedbackSink::new();
        let presenter = RecordingPresenter::new();
        let controller = DialogueController::new(IntentRouter::default(), DialogueTimings::default());
        let session = DialogueSession::start(
            controller,
            Arc::new(lookup.clone()),
            Arc::new(feedback.clone()),
            Box::new(presenter.clone()),
        );
        Harness {
            session,
            lookup,
            feedback,
            presenter,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn start_renders_welcome() {
        let h = harness(MockPropertyLookup::new());
        assert_eq!(h.presenter.render_count(), 1);
        assert_eq!(h.session.phase(), DialoguePhase::AwaitingName);
    }

    #[tokio::test(start_paused = true)]
    async fn greeting_arrives_after_thinking_delay() {
        let mut h = harness(MockPropertyLookup::new());
        h.session.submit_text("Bob").unwrap();
        assert_eq!(h.session.outstanding(), 1);
        assert!(h.session.snapshot().is_typing);

        h.session.settle().await;

        let snapshot = h.session.snapshot();
        assert!(!snapshot.is_typing);
        assert!(snapshot.show_follow_up_menu);
        assert_eq!(snapshot.messages.len(), 3);
        assert!(h.presenter.events().contains(&PresenterEvent::TypingChanged(false)));
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_result_then_follow_up() {
        let lookup = MockPropertyLookup::new().with_found(json!({"zoning": "R-1"}), "Zoned R-1.");
        let mut h = harness(lookup);
        h.session.submit_text("Bob").unwrap();
        h.session.settle().await;
        h.session
            .click_option("What is the zoning district of this property?")
            .unwrap();
        h.session.submit_text("42 Elm Street").unwrap();
        h.session.settle().await;

        let snapshot = h.session.snapshot();
        assert_eq!(h.lookup.call_count(), 1);
        assert_eq!(snapshot.phase, DialoguePhase::PresentingResultAndMenu);
        let texts: Vec<_> = snapshot.messages.iter().map(|m| m.text().to_string()).collect();
        assert!(texts.contains(&"Zoned R-1.".to_string()));
        assert_eq!(snapshot.last_text(), Some("Is there anything else I can help you with?"));
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_shows_generic_message() {
        let lookup = MockPropertyLookup::new().with_error(LookupError::Network("refused".to_string()));
        let mut h = harness(lookup);
        h.session.submit_text("Bob").unwrap();
        h.session.settle().await;
        h.session.submit_text("what is the zoning?").unwrap();
        h.session.submit_text("42 Elm Street").unwrap();
        h.session.settle().await;

        let snapshot = h.session.snapshot();
        assert!(snapshot
            .messages
            .iter()
            .any(|m| m.text().starts_with("Sorry, I could not reach the property service")));
        assert!(!snapshot.address_confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn feedback_flow_submits_and_closes_widget() {
        let lookup = MockPropertyLookup::new().with_rejection("No match found");
        let mut h = harness(lookup);
        h.session.submit_text("Bob").unwrap();
        h.session.settle().await;
        h.session.submit_text("zoning").unwrap();
        h.session.submit_text("42 Elm Street").unwrap();
        h.session.settle().await;
        h.session.submit_text("no").unwrap();
        h.session.click_feedback(5).unwrap();
        h.session.settle().await;

        assert_eq!(h.feedback.submissions().len(), 1);
        assert_eq!(h.feedback.submissions()[0].name, "Bob");
        let events = h.presenter.events();
        assert!(events.contains(&PresenterEvent::ConversationReset));
        assert_eq!(events.last(), Some(&PresenterEvent::WidgetClosed));
        assert_eq!(h.session.phase(), DialoguePhase::AwaitingName);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_discards_in_flight_lookup() {
        let lookup = MockPropertyLookup::new().with_delayed_response(
            LookupResponse::rejected("late"),
            Duration::from_secs(5),
        );
        let mut h = harness(lookup);
        h.session.submit_text("Bob").unwrap();
        h.session.settle().await;
        h.session.submit_text("zoning").unwrap();
        h.session.submit_text("42 Elm Street").unwrap();
        h.session.request_reset().unwrap();
        h.session.settle().await;

        let snapshot = h.session.snapshot();
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.phase, DialoguePhase::AwaitingName);
    }

    #[tokio::test(start_paused = true)]
    async fn close_aborts_tasks_and_rejects_events() {
        let mut h = harness(MockPropertyLookup::new());
        h.session.submit_text("Bob").unwrap();
        h.session.close();
        h.session.close();

        assert_eq!(h.session.outstanding(), 0);
        assert!(!h.session.pump().await);
        assert_eq!(
            h.session.submit_text("hello"),
            Err(SessionError::Closed(h.session.id()))
        );
        tokio::time::sleep(Duration::from_secs(5)).await;
        h.session.drain_ready();
        assert_eq!(h.session.snapshot().messages.len(), 1);
    }
}
