//! Dialogue timing configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::dialogue::DialogueTimings;

/// Longest allowed UI delay.
const MAX_DELAY_MS: u64 = 60_000;

/// Delays between a user action and the assistant's scripted reply, in ms
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DialogueConfig {
    /// Pause before the greeting
    #[serde(default = "default_thinking_ms")]
    pub thinking_delay_ms: u64,

    /// Pause before the follow-up menu after a lookup
    #[serde(default = "default_follow_up_ms")]
    pub follow_up_delay_ms: u64,

    /// Pause before thanking the user for a rating
    #[serde(default = "default_feedback_thanks_ms")]
    pub feedback_thanks_delay_ms: u64,

    /// Pause before resetting after the thank-you
    #[serde(default = "default_reset_ms")]
    pub reset_delay_ms: u64,
}

impl DialogueConfig {
    pub fn timings(&self) -> DialogueTimings {
        DialogueTimings {
            thinking: Duration::from_millis(self.thinking_delay_ms),
            follow_up: Duration::from_millis(self.follow_up_delay_ms),
            feedback_thanks: Duration::from_millis(self.feedback_thanks_delay_ms),
            reset: Duration::from_millis(self.reset_delay_ms),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let delays = [
            ("thinking_delay_ms", self.thinking_delay_ms),
            ("follow_up_delay_ms", self.follow_up_delay_ms),
            ("feedback_thanks_delay_ms", self.feedback_thanks_delay_ms),
            ("reset_delay_ms", self.reset_delay_ms),
        ];
        for (name, millis) in delays {
            if millis > MAX_DELAY_MS {
                return Err(ValidationError::DelayTooLong {
                    name,
                    millis,
                    max: MAX_DELAY_MS,
                });
            }
        }
        Ok(())
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            thinking_delay_ms: default_thinking_ms(),
            follow_up_delay_ms: default_follow_up_ms(),
            feedback_thanks_delay_ms: default_feedback_thanks_ms(),
            reset_delay_ms: default_reset_ms(),
        }
    }
}

fn default_thinking_ms() -> u64 {
    800
}

fn default_follow_up_ms() -> u64 {
    1200
}

fn default_feedback_thanks_ms() -> u64 {
    800
}

fn default_reset_ms() -> u64 {
    2500
}
