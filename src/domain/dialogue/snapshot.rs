//! Read-only view of a session handed to presenters.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::domain::foundation::{FeedbackRating, SessionId};

use super::catalog::IntentCatalog;
use super::intent::IntentCode;
use super::message::Message;
use super::phase::DialoguePhase;
use super::property::{DayNight, PropertyContext};
use super::session::SessionState;

/// A clickable option button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuOption {
    pub code: IntentCode,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub epoch: u64,
    pub phase: DialoguePhase,
    pub user_name: Option<String>,
    pub messages: Vec<Message>,
    pub current_intent: IntentCode,
    pub previous_intent: IntentCode,
    pub address_confirmed: bool,
    pub selected_intents: BTreeSet<IntentCode>,
    pub is_typing: bool,
    pub pending_feedback: bool,
    pub feedback_rating: Option<FeedbackRating>,
    pub show_document_link: bool,
    pub show_follow_up_menu: bool,
    pub show_zoning_menu: bool,
    pub document_message_indices: Vec<usize>,
    pub menu_options: Vec<MenuOption>,
    pub property: Option<PropertyContext>,
    pub day_night: Option<DayNight>,
}

impl SessionSnapshot {
    pub fn capture(session_id: SessionId, state: &SessionState, catalog: &IntentCatalog) -> Self {
        let menu_options = state
            .menu_options()
            .into_iter()
            .map(|code| MenuOption {
                code,
                label: catalog.prompt(code).to_string(),
            })
            .collect();

        Self {
            session_id,
            epoch: state.epoch(),
            phase: DialoguePhase::derive(state),
            user_name: state.user_name().map(str::to_string),
            messages: state.messages().to_vec(),
            current_intent: state.current_intent(),
            previous_intent: state.previous_intent(),
            address_confirmed: state.address_confirmed(),
            selected_intents: state.selected_intents().clone(),
            is_typing: state.is_typing(),
            pending_feedback: state.pending_feedback(),
            feedback_rating: state.feedback_rating(),
            show_document_link: state.show_document_link(),
            show_follow_up_menu: state.show_follow_up_menu(),
            show_zoning_menu: state.show_zoning_menu(),
            document_message_indices: state.document_message_indices().to_vec(),
            menu_options,
            property: state.property().cloned(),
            day_night: state.property().and_then(|p| p.day_night),
        }
    }

    /// Text of the last message, if any.
    pub fn last_text(&self) -> Option<&str> {
        self.messages.last().map(Message::text)
    }
}
