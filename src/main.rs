//! Terminal host for the Koby assistant.
//!
//! Reads chat input line by line from stdin. Plain text is sent as a typed
//! message; slash commands drive the widget controls:
//!
//! - `/N` clicks the N-th option of the menu on screen
//! - `/rate N` gives an N-star rating
//! - `/reset` starts over
//! - `/quit` closes the widget

use std::error::Error;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use koby_assistant::adapters::{HttpFeedbackSink, HttpPropertyLookup, TerminalPresenter};
use koby_assistant::application::{DialogueSession, SessionError};
use koby_assistant::config::{AppConfig, LoggingConfig};
use koby_assistant::domain::dialogue::{DialogueController, IntentCatalog, IntentRouter};

/// A parsed line of input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Text(&'a str),
    Option(usize),
    Rate(u8),
    Reset,
    Quit,
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Command::Text(line);
    };
    match command.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["reset"] => Command::Reset,
        ["quit"] | ["exit"] => Command::Quit,
        ["rate", stars] => stars.parse().map(Command::Rate).unwrap_or(Command::Text(line)),
        [index] => index.parse().map(Command::Option).unwrap_or(Command::Text(line)),
        _ => Command::Text(line),
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::from_default_env().add_directive(logging.directive().parse()?);
    let json = logging.json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
    Ok(())
}

fn handle_line(session: &mut DialogueSession, line: &str) -> Result<bool, SessionError> {
    match parse_command(line) {
        Command::Quit => {
            session.close();
            return Ok(false);
        }
        Command::Reset => session.request_reset()?,
        Command::Rate(stars) => session.click_feedback(stars)?,
        Command::Option(index) => {
            let label = session
                .snapshot()
                .menu_options
                .get(index.wrapping_sub(1))
                .map(|option| option.label.clone());
            match label {
                Some(label) => session.click_option(&label)?,
                None => session.submit_text(line)?,
            }
        }
        Command::Text(text) => session.submit_text(text)?,
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging)?;
    config.validate()?;

    info!(
        lookup = %config.lookup.adapter_config().endpoint(),
        "Starting Koby assistant"
    );

    let lookup = HttpPropertyLookup::new(config.lookup.adapter_config())?;
    let feedback = HttpFeedbackSink::new(config.feedback.adapter_config(&config.lookup))?;
    let controller = DialogueController::new(
        IntentRouter::new(IntentCatalog::standard()),
        config.dialogue.timings(),
    );

    let mut session = DialogueSession::start(
        controller,
        Arc::new(lookup),
        Arc::new(feedback),
        Box::new(TerminalPresenter::stdout()),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_line(&mut session, &line) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => {
                        error!(error = %e, "Input rejected");
                        break;
                    }
                }
            }
            open = session.pump() => {
                if !open {
                    break;
                }
            }
        }
    }

    session.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_text() {
        assert_eq!(parse_command("  42 Elm Street "), Command::Text("42 Elm Street"));
    }

    #[test]
    fn parses_slash_commands() {
        assert_eq!(parse_command("/reset"), Command::Reset);
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("/rate 4"), Command::Rate(4));
        assert_eq!(parse_command("/2"), Command::Option(2));
    }

    #[test]
    fn malformed_commands_are_text() {
        assert_eq!(parse_command("/rate five"), Command::Text("/rate five"));
        assert_eq!(parse_command("/dance"), Command::Text("/dance"));
    }
}
