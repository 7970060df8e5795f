//! Terminal presenter.
//!
//! Prints message bubbles as they appear, with the inline markup stripped,
//! followed by the numbered option menu or the star prompt.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{self, Stdout, Write};
use tracing::warn;

use crate::domain::dialogue::{MessageTag, SessionSnapshot};
use crate::ports::DialoguePresenter;

static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").expect("markup pattern compiles"));

/// Removes inline tags and decodes the entities the templates produce.
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG
        .replace_all(text, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub struct TerminalPresenter<W: Write + Send = Stdout> {
    out: W,
    printed: usize,
    last_printed_text: Option<String>,
    epoch: u64,
    last_menu: Vec<String>,
}

impl TerminalPresenter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: 0,
            last_printed_text: None,
            epoch: 0,
            last_menu: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Menu labels as last printed; `1` selects the first entry.
    pub fn menu(&self) -> &[String] {
        &self.last_menu
    }

    fn write_snapshot(&mut self, snapshot: &SessionSnapshot) -> io::Result<()> {
        if snapshot.epoch != self.epoch || snapshot.messages.len() < self.printed {
            self.epoch = snapshot.epoch;
            self.printed = 0;
        }

        // The placeholder is replaced in place; reprint it when that happens.
        if self.printed > 0 {
            let last = snapshot.messages[self.printed - 1].text();
            if self.last_printed_text.as_deref() != Some(last) {
                self.printed -= 1;
            }
        }

        let mut printed_any = false;
        for message in &snapshot.messages[self.printed..] {
            let who = if message.is_from_user() { "you" } else { "koby" };
            writeln!(self.out, "{:>5}> {}", who, strip_markup(message.text()))?;
            if message.has_tag(MessageTag::ShowsDocumentLink) {
                if let Some(link) = snapshot.property.as_ref().and_then(|p| p.report_link.as_deref()) {
                    writeln!(self.out, "       report: {}", link)?;
                }
            }
            printed_any = true;
        }
        self.printed = snapshot.messages.len();
        self.last_printed_text = snapshot.messages.last().map(|m| m.text().to_string());

        if !printed_any {
            return self.out.flush();
        }

        self.last_menu = snapshot.menu_options.iter().map(|o| o.label.clone()).collect();
        let assistant_spoke_last = snapshot.messages.last().is_some_and(|m| !m.is_from_user());
        if snapshot.is_typing {
            writeln!(self.out, "  koby is typing...")?;
        } else if snapshot.pending_feedback {
            writeln!(self.out, "       rate 1-5 with /rate N")?;
        } else if assistant_spoke_last {
            for (i, label) in self.last_menu.iter().enumerate() {
                writeln!(self.out, "       [{}] {}", i + 1, label)?;
            }
        }
        self.out.flush()
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write + Send> DialoguePresenter for TerminalPresenter<W> {
    fn render(&mut self, snapshot: &SessionSnapshot) {
        if let Err(e) = self.write_snapshot(snapshot) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }

    fn notify_conversation_reset(&mut self) {
        self.printed = 0;
        self.last_printed_text = None;
        self.last_menu.clear();
        self.write_line("  --- new conversation ---");
    }

    fn close_widget(&mut self) {
        self.write_line("  (chat closed)");
    }
}
