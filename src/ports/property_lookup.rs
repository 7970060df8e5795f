//! Property Lookup Port - Interface to the zoning data service.
//!
//! The service takes an address and an intent code and answers with a
//! property record and a human-readable message. A `null` record means the
//! service understood the request but has nothing for it (a domain error);
//! transport problems are reported through [`LookupError`].
//!
//! # Wire format
//!
//! ```text
//! POST {base_url}{path}
//! { "address": "42 Elm Street", "option": "BT", "buildingType": "duplex" }
//!
//! 200 OK
//! { "data": { ... } | null, "msg": "...", "dayNight": "day", "reportLink": "https://..." }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::dialogue::{
    DayNight, LookupRequest, LookupSettlement, PropertyRecord, PropertyReport,
};

/// Port for property lookups.
#[async_trait]
pub trait PropertyLookup: Send + Sync {
    /// Looks up a property. Implementations do not retry.
    async fn lookup(&self, request: LookupRequest) -> Result<LookupResponse, LookupError>;
}

/// Body returned by the lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    #[serde(default)]
    pub data: Option<PropertyRecord>,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub day_night: Option<DayNight>,
    #[serde(default)]
    pub report_link: Option<String>,
}

impl LookupResponse {
    /// A response carrying a property record.
    pub fn found(record: PropertyRecord, msg: impl Into<String>) -> Self {
        Self {
            data: Some(record),
            msg: msg.into(),
            day_night: None,
            report_link: None,
        }
    }

    /// A domain error: the service answered without data.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self {
            data: None,
            msg: msg.into(),
            day_night: None,
            report_link: None,
        }
    }

    pub fn with_report_link(mut self, link: impl Into<String>) -> Self {
        self.report_link = Some(link.into());
        self
    }

    pub fn with_day_night(mut self, day_night: DayNight) -> Self {
        self.day_night = Some(day_night);
        self
    }

    /// Converts the response into what the dialogue controller consumes.
    pub fn into_settlement(self) -> LookupSettlement {
        match self.data {
            Some(record) => LookupSettlement::Found(PropertyReport {
                record,
                answer: self.msg,
                day_night: self.day_night,
                report_link: self.report_link,
            }),
            None => LookupSettlement::Rejected { message: self.msg },
        }
    }
}

/// Errors from the lookup transport.
///
/// Every variant is shown to the user the same way; the distinction exists
/// for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// Connection or other network failure.
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status.
    #[error("lookup service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Folds a lookup result into a settlement.
pub fn settle(result: Result<LookupResponse, LookupError>) -> LookupSettlement {
    match result {
        Ok(response) => response.into_settlement(),
        Err(err) => LookupSettlement::Failed {
            reason: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_service_response() {
        let response: LookupResponse = serde_json::from_value(json!({
            "data": {"zoning": "R-1"},
            "msg": "The property is zoned R-1.",
            "dayNight": "night",
            "reportLink": "https://example.test/r.pdf"
        }))
        .unwrap();

        assert_eq!(response.day_night, Some(DayNight::Night));
        assert_eq!(response.report_link.as_deref(), Some("https://example.test/r.pdf"));
        assert_eq!(response.data.unwrap().text("zoning"), Some("R-1"));
    }

    #[test]
    fn null_data_is_a_rejection() {
        let response: LookupResponse =
            serde_json::from_value(json!({"data": null, "msg": "No match found"})).unwrap();
        assert_eq!(
            response.into_settlement(),
            LookupSettlement::Rejected {
                message: "No match found".to_string()
            }
        );
    }

    #[test]
    fn non_object_data_is_still_found() {
        let response: LookupResponse =
            serde_json::from_value(json!({"data": "R-1", "msg": "Zoned R-1."})).unwrap();
        match response.into_settlement() {
            LookupSettlement::Found(report) => {
                assert_eq!(report.record, PropertyRecord::new(json!("R-1")));
                assert_eq!(report.answer, "Zoned R-1.");
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn missing_fields_default() {
        let response: LookupResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.data.is_none());
        assert!(response.msg.is_empty());
    }

    #[test]
    fn found_carries_report_fields() {
        let settlement = LookupResponse::found(PropertyRecord::default(), "ok")
            .with_report_link("https://example.test/r.pdf")
            .with_day_night(DayNight::Day)
            .into_settlement();
        match settlement {
            LookupSettlement::Found(report) => {
                assert_eq!(report.answer, "ok");
                assert_eq!(report.day_night, Some(DayNight::Day));
                assert!(report.report_link.is_some());
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn transport_errors_settle_as_failures() {
        let settlement = settle(Err(LookupError::Timeout { timeout_secs: 15 }));
        assert_eq!(
            settlement,
            LookupSettlement::Failed {
                reason: "request timed out after 15s".to_string()
            }
        );
    }

    #[test]
    fn status_error_message_includes_code() {
        let err = LookupError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "lookup service returned 502: bad gateway");
    }
}
