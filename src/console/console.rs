//! Main console struct integrating all components

use core::fmt::Write;

use super::error::{write_diagnostic, MonitorError};
use super::escape::{EscapeDecoder, Key};
use super::eval::eval;
use super::history::{Browse, History};
use super::line_buffer::LINE_SIZE;
use super::session::Session;
use crate::config::keys::ERASE_ECHO;
use crate::config::MonitorConfig;
use crate::mon_warn;
use crate::token::truncated;

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// What became of a submitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Evaluated; any result was printed.
    Completed,
    /// Evaluation abandoned; the diagnostic was printed.
    Failed(MonitorError),
    /// `exit` was entered.
    Exit,
}

/// Line editor: raw bytes in, evaluated lines out
pub struct Console {
    session: Session,
    history: History,
    decoder: EscapeDecoder,
}

impl Console {
    /// Create new console
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            session: Session::new(config),
            history: History::new(),
            decoder: EscapeDecoder::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Process a single input byte
    ///
    /// Returns Some(outcome) if a line was submitted, None if more input needed.
    pub fn process_byte(&mut self, byte: u8, out: &mut dyn Write) -> Option<LineOutcome> {
        let mut outcome = None;
        for key in self.decoder.feed(byte) {
            if let Some(o) = self.handle_key(key, out) {
                outcome = Some(o);
            }
        }
        outcome
    }

    /// Process several bytes; returns the outcome of the last submitted line.
    pub fn process_bytes(&mut self, bytes: &[u8], out: &mut dyn Write) -> Option<LineOutcome> {
        let mut outcome = None;
        for &b in bytes {
            if let Some(o) = self.process_byte(b, out) {
                outcome = Some(o);
            }
        }
        outcome
    }

    fn handle_key(&mut self, key: Key, out: &mut dyn Write) -> Option<LineOutcome> {
        let keys = *self.session.keys();

        match key {
            Key::HistoryPrevious => self.handle_up(out),
            Key::HistoryNext => self.handle_down(out),
            Key::Byte(b) if b == keys.terminator => return Some(self.submit(out)),
            Key::Byte(b) if b == keys.erase => {
                if !self.history.current().is_empty() {
                    self.history.current_mut().backspace();
                    let _ = out.write_str(ERASE_ECHO);
                }
            }
            Key::Byte(b) if b == keys.history_prev => self.handle_up(out),
            Key::Byte(b) if b == keys.history_next => self.handle_down(out),
            Key::Byte(b) => {
                if self.history.current_mut().push(b) {
                    let _ = out.write_char(b as char);
                }
            }
        }
        None
    }

    fn submit(&mut self, out: &mut dyn Write) -> LineOutcome {
        let eol = self.session.eol();
        let _ = out.write_str(eol);

        let line: heapless::String<LINE_SIZE> = truncated(self.history.current().as_str());

        let outcome = match eval(&mut self.session, &line, out) {
            Ok(Some(result)) => {
                if let Ok(token) = self.session.token(result) {
                    if token.is_printable() {
                        let _ = token.write_text(self.session.number_base(), out);
                        let _ = out.write_str(eol);
                    }
                }
                self.session.release(result);
                LineOutcome::Completed
            }
            Ok(None) => LineOutcome::Exit,
            Err(err) => {
                mon_warn!(self.session.log, "line abandoned: {} {}", err.code(), err);
                let _ = write_diagnostic(out, &err, eol);
                LineOutcome::Failed(err)
            }
        };

        if !self.session.exit_requested() {
            self.print_prompt(out);
        }
        self.history.commit();
        outcome
    }

    fn handle_up(&mut self, out: &mut dyn Write) {
        let shown = self.history.current().len();
        if self.history.previous() == Browse::Recalled {
            self.redraw(shown, out);
        }
    }

    fn handle_down(&mut self, out: &mut dyn Write) {
        let shown = self.history.current().len();
        match self.history.next() {
            Browse::Recalled => self.redraw(shown, out),
            Browse::Cleared => erase(shown, out),
            Browse::Refused => {}
        }
    }

    /// Replace `shown` characters on screen with the current line
    fn redraw(&self, shown: usize, out: &mut dyn Write) {
        erase(shown, out);
        let _ = out.write_str(self.history.current().as_str());
    }

    /// Print the prompt
    pub fn print_prompt(&self, out: &mut dyn Write) {
        self.session.write_prompt(out);
    }

    /// Print welcome banner
    pub fn print_banner(&self, out: &mut dyn Write) {
        let eol = self.session.eol();
        let _ = write!(out, "{}{}", VERSION, eol);
        let _ = write!(out, "Type 'help' for commands.{}", eol);
        self.print_prompt(out);
    }
}

fn erase(count: usize, out: &mut dyn Write) {
    for _ in 0..count {
        let _ = out.write_str(ERASE_ECHO);
    }
}
