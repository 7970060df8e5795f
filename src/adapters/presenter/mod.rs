//! Dialogue presenter adapters.

mod recording;
mod terminal;

pub use recording::{PresenterEvent, RecordingPresenter};
pub use terminal::{strip_markup, TerminalPresenter};
