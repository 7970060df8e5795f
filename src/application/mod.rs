//! Application layer - Runs dialogue sessions.
//!
//! This layer wires the dialogue controller to its ports and executes the
//! effects it returns.

mod session_runtime;

pub use session_runtime::{DialogueSession, SessionError};
