//! Property lookup values shared by the controller and the lookup port.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::FeedbackRating;

use super::intent::IntentCode;

/// Request sent to the property lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub address: String,
    pub option: IntentCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_type: Option<String>,
}

impl LookupRequest {
    pub fn new(address: impl Into<String>, option: IntentCode) -> Self {
        Self {
            address: address.into(),
            option,
            building_type: None,
        }
    }

    pub fn with_building_type(mut self, building_type: impl Into<String>) -> Self {
        self.building_type = Some(building_type.into());
        self
    }
}

/// Theme hint returned alongside a property record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayNight {
    Day,
    Night,
}

/// Opaque property record as returned by the lookup service.
///
/// Usually an object, but any non-null JSON value is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyRecord(Value);

impl PropertyRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns a top-level field; `None` when the record is not an object.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.as_object().and_then(|fields| fields.get(key))
    }

    /// Returns a string field, if present and textual.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }
}

impl Default for PropertyRecord {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

/// A successful lookup, ready to be shown.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyReport {
    pub record: PropertyRecord,
    /// Answer text from the service; empty when it sent none.
    pub answer: String,
    pub day_night: Option<DayNight>,
    pub report_link: Option<String>,
}

/// How a dispatched lookup settled, as seen by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupSettlement {
    /// The service returned a property record.
    Found(PropertyReport),
    /// The service answered but reported no data.
    Rejected { message: String },
    /// The service could not be reached or answered garbage.
    Failed { reason: String },
}

/// The property the conversation is currently about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyContext {
    pub address: String,
    pub record: PropertyRecord,
    pub report_link: Option<String>,
    pub day_night: Option<DayNight>,
}

/// Feedback sent to the feedback service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub name: String,
    pub rating: FeedbackRating,
}
