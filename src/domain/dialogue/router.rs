//! Intent router and the small text heuristics the controller relies on.
//!
//! Everything here is pure: no state, no side effects.

use once_cell::sync::Lazy;
use regex::Regex;

use super::catalog::IntentCatalog;
use super::intent::IntentCode;

static ADDRESS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\d+[a-z]?\s+[a-z]").expect("address pattern compiles"));

static ADDRESS_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\baddress\b").expect("address word pattern compiles"));

static NAME_DECLINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(no|nope|nah|skip|pass|none|anonymous|anon|no name|no thanks?)[.!]*$|rather not|prefer not|not telling|don'?t want to (say|tell)",
    )
    .expect("decline pattern compiles")
});

/// Lowercases and trims free text before matching.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Returns true if the text looks like a street address ("42 Elm Street").
pub fn looks_like_address(text: &str) -> bool {
    ADDRESS_PATTERN.is_match(text.trim())
}

/// Returns true if the text mentions the word "address".
pub fn mentions_address(text: &str) -> bool {
    ADDRESS_WORD.is_match(text)
}

/// Returns true if the user declined to give a name.
pub fn is_name_decline(text: &str) -> bool {
    NAME_DECLINE_PATTERN.is_match(text.trim())
}

/// Takes the first whitespace-delimited token as the user's name.
pub fn extract_name(text: &str) -> Option<String> {
    text.split_whitespace()
        .next()
        .map(|token| token.trim_end_matches([',', '.', '!', '?']))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Maps free text onto a catalog intent.
#[derive(Debug, Clone)]
pub struct IntentRouter {
    catalog: IntentCatalog,
}

impl IntentRouter {
    pub fn new(catalog: IntentCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &IntentCatalog {
        &self.catalog
    }

    /// Returns the first catalog intent whose pattern accepts the text.
    ///
    /// On the first turn after the name `EndConversation` is never
    /// returned, so a bare "no" or "hi" is not read as a goodbye.
    pub fn route(&self, text: &str, is_first_turn: bool) -> Option<IntentCode> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }

        self.catalog
            .entries()
            .iter()
            .filter(|entry| !(is_first_turn && entry.code() == IntentCode::EndConversation))
            .find(|entry| entry.matches(&normalized))
            .map(|entry| entry.code())
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new(IntentCatalog::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> IntentRouter {
        IntentRouter::default()
    }

    mod route {
        use super::*;

        #[test]
        fn canonical_prompts_route_to_their_own_intent() {
            let router = router();
            for code in IntentCode::ALL {
                let prompt = router.catalog().prompt(code).to_string();
                assert_eq!(router.route(&prompt, false), Some(code), "prompt: {}", prompt);
            }
        }

        #[test]
        fn summary_paraphrases_route_to_property_details() {
            let router = router();
            for text in [
                "Tell me about this property",
                "site information please",
                "can I get a summary report",
                "I'd like an overview",
            ] {
                assert_eq!(router.route(text, false), Some(IntentCode::PropertyDetails), "{}", text);
            }
        }

        #[test]
        fn buildable_and_feasibility_are_distinguished_by_order() {
            let router = router();
            assert_eq!(
                router.route("what could we build here", false),
                Some(IntentCode::BuildablePermits)
            );
            assert_eq!(
                router.route("can I build a duplex", false),
                Some(IntentCode::BuildingType)
            );
        }

        #[test]
        fn city_limit_and_zoning_paraphrases() {
            let router = router();
            assert_eq!(router.route("is it inside the city?", false), Some(IntentCode::CityLimits));
            assert_eq!(router.route("how is this zoned", false), Some(IntentCode::ZoningDistrict));
        }

        #[test]
        fn change_address_paraphrases() {
            let router = router();
            assert_eq!(router.route("I want to use a different address", false), Some(IntentCode::ChangeAddress));
            assert_eq!(router.route("change my address", false), Some(IntentCode::ChangeAddress));
        }

        #[test]
        fn no_is_suppressed_on_first_turn() {
            let router = router();
            assert_eq!(router.route("no", true), None);
            assert_eq!(router.route("No", false), Some(IntentCode::EndConversation));
        }

        #[test]
        fn end_conversation_requires_whole_message() {
            let router = router();
            assert_eq!(router.route("nothing else, thanks!", false), None);
            assert_eq!(router.route("that's all.", false), Some(IntentCode::EndConversation));
        }

        #[test]
        fn unrelated_text_matches_nothing() {
            let router = router();
            assert_eq!(router.route("hello there", false), None);
            assert_eq!(router.route("   ", false), None);
        }
    }

    mod heuristics {
        use super::*;

        #[test]
        fn recognises_street_addresses() {
            assert!(looks_like_address("42 Elm Street"));
            assert!(looks_like_address("  1200B Main St "));
            assert!(!looks_like_address("Elm Street 42"));
            assert!(!looks_like_address("42"));
        }

        #[test]
        fn detects_the_word_address() {
            assert!(mentions_address("what ADDRESS do you need?"));
            assert!(!mentions_address("addressing the issue"));
        }

        #[test]
        fn detects_name_declines() {
            for text in ["no", "Skip", "anonymous", "I'd rather not say", "none."] {
                assert!(is_name_decline(text), "{}", text);
            }
            assert!(!is_name_decline("Bob"));
            assert!(!is_name_decline("Noah"));
        }

        #[test]
        fn extracts_first_token_as_name() {
            assert_eq!(extract_name("Bob"), Some("Bob".to_string()));
            assert_eq!(extract_name("  Alice Smith"), Some("Alice".to_string()));
            assert_eq!(extract_name("Carol!"), Some("Carol".to_string()));
            assert_eq!(extract_name("   "), None);
        }
    }
}
