//! Intent catalog.
//!
//! An ordered, read-only table of the intents the assistant recognises.
//! Each entry carries the canonical prompt (shown as an option label) and
//! the pattern used to recognise paraphrases in typed text.
//!
//! Order matters: the router walks the table front to back and the first
//! matching entry wins. Several query patterns overlap in phrasing
//! ("what can I build" vs "can I build a duplex"); the order below decides
//! those cases and is kept as-is.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use super::intent::IntentCode;

/// Errors raised while compiling a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid pattern for intent {code}: {source}")]
    InvalidPattern {
        code: IntentCode,
        #[source]
        source: regex::Error,
    },

    #[error("intent {0} appears more than once")]
    DuplicateIntent(IntentCode),
}

/// Source definition of one catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct IntentDefinition {
    pub code: IntentCode,
    pub prompt: &'static str,
    pub pattern: &'static str,
}

/// A compiled catalog entry.
#[derive(Debug, Clone)]
pub struct IntentEntry {
    code: IntentCode,
    prompt: String,
    matcher: Regex,
}

impl IntentEntry {
    pub fn code(&self) -> IntentCode {
        self.code
    }

    /// Canonical prompt, used as the option label.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Returns true if the (already normalised) text matches this intent.
    pub fn matches(&self, normalized: &str) -> bool {
        self.matcher.is_match(normalized)
    }
}

/// The standard seven intents, in matching order.
pub const STANDARD_INTENTS: [IntentDefinition; 7] = [
    IntentDefinition {
        code: IntentCode::PropertyDetails,
        prompt: "Provide a Summary Report of the property.",
        pattern: r"summary|report|overview|everything about|site info|property info|property details|details (of|about|on) (this|the|my) (property|site|parcel|lot)|tell me (more )?about (this|the|my|that) (property|site|parcel|lot)",
    },
    IntentDefinition {
        code: IntentCode::BuildablePermits,
        prompt: "What can I build on this property?",
        pattern: r"what (can|could|may) (i|we|you) build|buildable|permitted uses?|allowed uses?|(uses|things) (are )?(allowed|permitted)|by right|what is allowed",
    },
    IntentDefinition {
        code: IntentCode::CityLimits,
        prompt: "Is this property within city limits?",
        pattern: r"city limits?|within (the )?city|inside (the )?city|in (the )?city\b|incorporated|annex|jurisdiction|which city",
    },
    IntentDefinition {
        code: IntentCode::ZoningDistrict,
        prompt: "What is the zoning district of this property?",
        pattern: r"zoning|zoned|\bzone\b|district",
    },
    IntentDefinition {
        code: IntentCode::BuildingType,
        prompt: "Can I build a specific development on this property?",
        pattern: r"(can|could|may) (i|we) build (an? |the )?\w+|specific development|feasib|is it possible to build|allowed to build|(want|plan|going) to build|construct",
    },
    IntentDefinition {
        code: IntentCode::ChangeAddress,
        prompt: "Change address",
        pattern: r"change (the |my )?address|(different|new|another) (address|property|location)|wrong address|update (the |my )?address",
    },
    IntentDefinition {
        code: IntentCode::EndConversation,
        prompt: "No",
        pattern: r"^(no|nope|nah|no thanks?|no,? thank you|nothing( else)?|that'?s (all|it)|i'?m (done|good)|bye|goodbye|exit|quit)[.!]*$",
    },
];

/// Ordered, immutable table of intents.
#[derive(Debug, Clone)]
pub struct IntentCatalog {
    entries: Vec<IntentEntry>,
}

impl IntentCatalog {
    /// Compiles a catalog from definitions, preserving their order.
    ///
    /// # Errors
    ///
    /// - `InvalidPattern` if a pattern does not compile
    /// - `DuplicateIntent` if a code is listed twice
    pub fn from_definitions(definitions: &[IntentDefinition]) -> Result<Self, CatalogError> {
        let mut entries: Vec<IntentEntry> = Vec::with_capacity(definitions.len());

        for definition in definitions {
            if entries.iter().any(|e| e.code == definition.code) {
                return Err(CatalogError::DuplicateIntent(definition.code));
            }

            let matcher = RegexBuilder::new(definition.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| CatalogError::InvalidPattern {
                    code: definition.code,
                    source,
                })?;

            entries.push(IntentEntry {
                code: definition.code,
                prompt: definition.prompt.to_string(),
                matcher,
            });
        }

        Ok(Self { entries })
    }

    /// The standard catalog used by the assistant.
    pub fn standard() -> Self {
        Self::from_definitions(&STANDARD_INTENTS).expect("standard intent patterns compile")
    }

    /// Entries in matching order.
    pub fn entries(&self) -> &[IntentEntry] {
        &self.entries
    }

    pub fn get(&self, code: IntentCode) -> Option<&IntentEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    /// Canonical prompt for a code, or the bare code if the catalog lacks it.
    pub fn prompt(&self, code: IntentCode) -> &str {
        self.get(code).map(IntentEntry::prompt).unwrap_or(code.as_str())
    }

    /// Resolves an option label back to its intent.
    pub fn find_by_prompt(&self, label: &str) -> Option<IntentCode> {
        let label = label.trim();
        self.entries
            .iter()
            .find(|e| e.prompt.eq_ignore_ascii_case(label))
            .map(|e| e.code)
    }
}

impl Default for IntentCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
