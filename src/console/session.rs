//! Monitor session state
//!
//! Everything that used to be process-wide (token pool, registers, prompt,
//! number base, exit flag) lives in one [`Session`] value, so several
//! independent monitors can coexist and tests start from a clean slate.

use core::fmt::Write;

use super::commands::CommandTable;
use super::error::MonitorError;
use super::registers::RegisterStore;
use crate::config::{Capabilities, KeyMap, MonitorConfig};
use crate::logging::LogStream;
use crate::token::{truncated, NumberBase, Token, TokenHandle, TokenPool, TokenText};
use crate::{mon_debug, mon_error, mon_warn};

/// Prompt buffer size; prompts keep at most `PROMPT_SIZE - 1` characters.
pub const PROMPT_SIZE: usize = 20;

/// Prompt text.
pub type PromptText = heapless::String<PROMPT_SIZE>;

/// Evaluation context shared by evaluator, dispatcher and line editor.
pub struct Session {
    pool: TokenPool,
    registers: RegisterStore,
    commands: CommandTable,
    prompt: PromptText,
    base: NumberBase,
    exit_requested: bool,
    caps: Capabilities,
    keys: KeyMap,
    /// Diagnostic log, drained by the host.
    pub log: LogStream,
}

impl Session {
    /// Create session for the given configuration
    pub fn new(config: &MonitorConfig) -> Self {
        let mut session = Self {
            pool: TokenPool::new(),
            registers: RegisterStore::new(),
            commands: CommandTable::new(&config.capabilities),
            prompt: PromptText::new(),
            base: NumberBase::Decimal,
            exit_requested: false,
            caps: config.capabilities,
            keys: config.capabilities.key_map(),
            log: LogStream::with_threshold(config.log_level),
        };
        session.set_prompt(config.prompt);
        session
    }

    // --- Token ownership ---

    /// Allocate a token; exhaustion is logged and returned as an error.
    pub fn allocate(&mut self, owner: &'static str, token: Token) -> Result<TokenHandle, MonitorError> {
        self.pool.allocate(owner, token).map_err(|err| {
            mon_error!(self.log, "{} by {} ({} live)", err, owner, self.pool.live());
            MonitorError::from(err)
        })
    }

    /// Allocate an owned copy of `handle`'s token.
    pub fn duplicate(&mut self, handle: TokenHandle, owner: &'static str) -> Result<TokenHandle, MonitorError> {
        self.pool.duplicate(handle, owner).map_err(|err| {
            mon_error!(self.log, "{} by {} ({} live)", err, owner, self.pool.live());
            MonitorError::from(err)
        })
    }

    /// Give a token back. A defective release is logged, never fatal.
    pub fn release(&mut self, handle: TokenHandle) {
        let owner = self.pool.owner(handle).unwrap_or("?");
        if let Err(err) = self.pool.release(handle) {
            mon_warn!(self.log, "release #{} ({}): {}", handle.index(), owner, err);
        }
    }

    /// Read a token.
    pub fn token(&self, handle: TokenHandle) -> Result<&Token, MonitorError> {
        Ok(self.pool.get(handle)?)
    }

    /// Token text in the current number base.
    pub fn text(&self, handle: TokenHandle) -> Result<TokenText, MonitorError> {
        Ok(self.token(handle)?.text(self.base))
    }

    pub fn pool(&self) -> &TokenPool {
        &self.pool
    }

    // --- Registers ---

    /// Copy `value` into register `id`.
    ///
    /// An out-of-range id prints the same diagnostic as a bad read.
    pub fn set_register(&mut self, id: char, value: TokenHandle, out: &mut dyn Write) -> Result<(), MonitorError> {
        match self.registers.set(&mut self.pool, id, value) {
            Ok(displaced) => {
                if let Ok(token) = self.pool.get(value) {
                    mon_debug!(self.log, "reg {} <- {}", id, token.describe());
                }
                if let Some(old) = displaced {
                    self.release(old);
                }
                Ok(())
            }
            Err(err @ MonitorError::RegisterOutOfRange(_)) => {
                let _ = super::error::write_diagnostic(out, &err, self.keys.eol);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Register value for reading, or the empty sentinel after a diagnostic.
    /// The returned handle is not owned by the caller.
    pub fn read_register(&self, id: char, out: &mut dyn Write) -> TokenHandle {
        self.registers.read(id, out, self.keys.eol)
    }

    // --- Presentation ---

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Replace the prompt, truncated to fit.
    pub fn set_prompt(&mut self, text: &str) {
        let mut prompt: PromptText = truncated(text);
        if prompt.len() == PROMPT_SIZE {
            prompt.pop();
        }
        self.prompt = prompt;
    }

    /// Write the prompt and its trailing space.
    pub fn write_prompt(&self, out: &mut dyn Write) {
        let _ = write!(out, "{} ", self.prompt);
    }

    pub fn number_base(&self) -> NumberBase {
        self.base
    }

    /// Switch between decimal and hexadecimal output; returns the new base.
    pub fn toggle_number_base(&mut self) -> NumberBase {
        self.base = self.base.toggled();
        self.base
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn keys(&self) -> &KeyMap {
        &self.keys
    }

    /// Line ending for output.
    pub fn eol(&self) -> &'static str {
        self.keys.eol
    }

    // --- Termination ---

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&MonitorConfig::default())
    }
}
