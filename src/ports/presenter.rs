//! Dialogue Presenter Port - Renders a session for the host UI.
//!
//! The runtime calls `render` after every event that changed the session.
//! Presenters only ever see snapshots; they cannot mutate the session.

use crate::domain::dialogue::SessionSnapshot;

pub trait DialoguePresenter: Send {
    /// Draws the current session.
    fn render(&mut self, snapshot: &SessionSnapshot);

    /// The typing indicator turned on or off.
    fn notify_typing_changed(&mut self, _typing: bool) {}

    /// The conversation went back to its welcome state.
    fn notify_conversation_reset(&mut self) {}

    /// The conversation finished and the widget should close.
    fn close_widget(&mut self) {}
}
