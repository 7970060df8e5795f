//! Recording presenter for tests.
//!
//! Clones share the same log, so a test can hand one clone to the runtime
//! and inspect the other.

use std::sync::{Arc, Mutex};

use crate::domain::dialogue::SessionSnapshot;
use crate::ports::DialoguePresenter;

/// Notification received by the presenter, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    Rendered,
    TypingChanged(bool),
    ConversationReset,
    WidgetClosed,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    snapshots: Arc<Mutex<Vec<SessionSnapshot>>>,
    events: Arc<Mutex<Vec<PresenterEvent>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<SessionSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn last_snapshot(&self) -> Option<SessionSnapshot> {
        self.snapshots.lock().unwrap().last().cloned()
    }

    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn render_count(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }

    fn record(&self, event: PresenterEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl DialoguePresenter for RecordingPresenter {
    fn render(&mut self, snapshot: &SessionSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot.clone());
        self.record(PresenterEvent::Rendered);
    }

    fn notify_typing_changed(&mut self, typing: bool) {
        self.record(PresenterEvent::TypingChanged(typing));
    }

    fn notify_conversation_reset(&mut self) {
        self.record(PresenterEvent::ConversationReset);
    }

    fn close_widget(&mut self) {
        self.record(PresenterEvent::WidgetClosed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::{IntentCatalog, SessionState};
    use crate::domain::foundation::SessionId;

    #[test]
    fn clones_share_the_log() {
        let presenter = RecordingPresenter::new();
        let mut handle = presenter.clone();

        let snapshot =
            SessionSnapshot::capture(SessionId::new(), &SessionState::new(), &IntentCatalog::standard());
        handle.render(&snapshot);
        handle.notify_typing_changed(true);
        handle.close_widget();

        assert_eq!(presenter.render_count(), 1);
        assert_eq!(
            presenter.events(),
            vec![
                PresenterEvent::Rendered,
                PresenterEvent::TypingChanged(true),
                PresenterEvent::WidgetClosed
            ]
        );
    }
}
