//! Full-page terminal rendering of a chat session.

use std::io::{self, Write};

use chrono::Local;
use client_core::{PageText, Session};
use shared::domain::{Role, Turn};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct TerminalRenderer<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen }
    }

    /// Redraws the whole page from scratch: header, suggestions, transcript.
    pub fn render(&mut self, page: &PageText, session: &Session) -> io::Result<()> {
        if self.clear_screen {
            write!(self.out, "{CLEAR_SCREEN}")?;
        }

        writeln!(self.out, "# {}", page.title)?;
        for line in &page.greeting {
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out)?;

        if session.suggestions_offered() && !session.catalog().is_empty() {
            self.render_suggestions(page, session)?;
        }

        for turn in session.transcript() {
            self.render_turn(turn)?;
        }

        writeln!(self.out, "{}", page.input_placeholder)?;
        self.out.flush()
    }

    pub fn render_pending(&mut self, question: &str) -> io::Result<()> {
        writeln!(self.out, "{} {question}", label(Role::User))?;
        writeln!(self.out, "{} …", label(Role::Assistant))?;
        self.out.flush()
    }

    pub fn render_help(&mut self) -> io::Result<()> {
        writeln!(self.out, "Type a question and press enter.")?;
        writeln!(self.out, "  /N     ask suggestion number N")?;
        writeln!(self.out, "  /help  show this help")?;
        writeln!(self.out, "  /quit  leave the chat")?;
        self.out.flush()
    }

    pub fn render_notice(&mut self, notice: &str) -> io::Result<()> {
        writeln!(self.out, "{notice}")?;
        self.out.flush()
    }

    fn render_suggestions(&mut self, page: &PageText, session: &Session) -> io::Result<()> {
        writeln!(self.out, "## {}", page.suggestions_heading)?;
        let mut current_group = None;
        for (number, group, suggestion) in session.catalog().numbered() {
            if current_group != Some(group.key.as_str()) {
                writeln!(self.out, "### {}", group.heading)?;
                current_group = Some(group.key.as_str());
            }
            writeln!(self.out, "  [/{number}] {}", suggestion.text())?;
        }
        writeln!(self.out)
    }

    fn render_turn(&mut self, turn: &Turn) -> io::Result<()> {
        writeln!(
            self.out,
            "{} ({})",
            label(turn.role()),
            turn.sent_at().with_timezone(&Local).format("%H:%M")
        )?;
        for line in turn.content().lines() {
            writeln!(self.out, "  {line}")?;
        }
        writeln!(self.out)
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

fn label(role: Role) -> &'static str {
    match role {
        Role::User => "You:",
        Role::Assistant => "Assistant:",
    }
}
