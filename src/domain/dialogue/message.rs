//! Chat message entity.
//!
//! Messages are appended to the session log and never edited, with one
//! exception: the "let me check" placeholder may be replaced by the answer
//! once a lookup settles (see `SessionState::replace_last_placeholder`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::Timestamp;

/// UI affordances attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageTag {
    /// Assistant asked for a property address.
    IsAddressPrompt,
    /// User message produced by clicking an option button.
    IsOptionEcho,
    /// Render the follow-up option menu under this message.
    ShowsFollowUpMenu,
    /// Render the star-rating control under this message.
    ShowsFeedbackControl,
    /// Render a downloadable-report link under this message.
    ShowsDocumentLink,
}

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// A single chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    text: String,
    sender: Sender,
    tags: BTreeSet<MessageTag>,
    created_at: Timestamp,
}

impl Message {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender,
            tags: BTreeSet::new(),
            created_at: Timestamp::now(),
        }
    }

    /// Creates a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Creates an assistant message. Text may embed simple markup.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    /// Adds a tag.
    pub fn with_tag(mut self, tag: MessageTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn tags(&self) -> &BTreeSet<MessageTag> {
        &self.tags
    }

    pub fn has_tag(&self, tag: MessageTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}
