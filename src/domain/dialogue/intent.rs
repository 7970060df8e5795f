//! Intent codes understood by the assistant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// One of the fixed question types the assistant answers, or a control intent.
///
/// The wire representation is the two-letter code the lookup service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum IntentCode {
    /// Summary report of the property.
    #[default]
    #[serde(rename = "PD")]
    PropertyDetails,
    /// What can be built on the property.
    #[serde(rename = "BP")]
    BuildablePermits,
    /// Whether the property lies within city limits.
    #[serde(rename = "CL")]
    CityLimits,
    /// The zoning district of the property.
    #[serde(rename = "ZD")]
    ZoningDistrict,
    /// Feasibility of a specific development.
    #[serde(rename = "BT")]
    BuildingType,
    /// Switch to a different address.
    #[serde(rename = "CA")]
    ChangeAddress,
    /// End the conversation.
    #[serde(rename = "NO")]
    EndConversation,
}

impl IntentCode {
    /// All codes in catalog order.
    pub const ALL: [IntentCode; 7] = [
        IntentCode::PropertyDetails,
        IntentCode::BuildablePermits,
        IntentCode::CityLimits,
        IntentCode::ZoningDistrict,
        IntentCode::BuildingType,
        IntentCode::ChangeAddress,
        IntentCode::EndConversation,
    ];

    /// The five intents answered by the property lookup service.
    pub const QUERIES: [IntentCode; 5] = [
        IntentCode::PropertyDetails,
        IntentCode::BuildablePermits,
        IntentCode::CityLimits,
        IntentCode::ZoningDistrict,
        IntentCode::BuildingType,
    ];

    /// Returns the two-letter wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCode::PropertyDetails => "PD",
            IntentCode::BuildablePermits => "BP",
            IntentCode::CityLimits => "CL",
            IntentCode::ZoningDistrict => "ZD",
            IntentCode::BuildingType => "BT",
            IntentCode::ChangeAddress => "CA",
            IntentCode::EndConversation => "NO",
        }
    }

    /// Returns true for intents answered by a property lookup.
    pub fn is_query(&self) -> bool {
        !self.is_control()
    }

    /// Returns true for change-address and end-conversation.
    pub fn is_control(&self) -> bool {
        matches!(self, IntentCode::ChangeAddress | IntentCode::EndConversation)
    }
}

impl fmt::Display for IntentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntentCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ValidationError::invalid_format("intent_code", format!("unknown code '{}'", s))
            })
    }
}
