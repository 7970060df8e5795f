//! Canned assistant texts.
//!
//! Texts may embed `<strong>` markup; the presenter decides how to render it.

pub const WELCOME: &str =
    "Hi, I am <strong>Koby</strong>, your zoning assistant. Before we start, what is your name?";

pub const ADDRESS_PROMPT: &str = "Please type the address of the property you are interested in.";

pub const NEW_ADDRESS_PROMPT: &str = "Sure. Please type the new address.";

/// Shown while a lookup is in flight and later replaced by the answer.
pub const PLACEHOLDER: &str = "Sure. Let me check this.";

pub const BUILDING_QUESTION: &str = "What do you want to build on this property?";

pub const NOT_UNDERSTOOD: &str = "I am not trained to understand this prompt.";

pub const FOLLOW_UP: &str = "Is there anything else I can help you with?";

pub const LOOKUP_UNAVAILABLE: &str =
    "Sorry, I could not reach the property service right now. Please try again.";

pub const NO_DATA: &str = "I could not find any information for this address.";

pub const FEEDBACK_THANKS: &str = "Thank you for your feedback! Have a great day.";

pub const ANONYMOUS: &str = "Anonymous";

/// Greeting shown once the name step is done.
pub fn greeting(name: Option<&str>) -> String {
    match name {
        Some(name) => format!(
            "Nice to meet you, <strong>{}</strong>! What would you like to know?",
            escape_markup(name)
        ),
        None => "No problem! What would you like to know?".to_string(),
    }
}

/// Closing message that precedes the star rating.
pub fn closing(name: Option<&str>) -> String {
    match name {
        Some(name) => format!(
            "It was my pleasure assisting you today, <strong>{}</strong>. How would you rate this conversation?",
            escape_markup(name)
        ),
        None => "It was my pleasure assisting you today. How would you rate this conversation?"
            .to_string(),
    }
}

/// Default answer when the service found a property but sent no text.
pub fn found_answer(address: &str) -> String {
    format!("Here is what I found for <strong>{}</strong>.", escape_markup(address))
}

/// Escapes user-provided text before it is embedded in markup.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
