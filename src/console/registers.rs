//! Register store
//!
//! Eight one-letter slots, `a` to `h`. Each holds an owned copy of the last
//! token written by `set`, or nothing. Reads never hand out ownership.

use core::fmt::Write;

use super::error::{write_diagnostic, MonitorError};
use crate::token::{TokenHandle, TokenPool};

/// Number of registers.
pub const NUM_REGS: usize = 8;

/// Name of the first register.
pub const FIRST_REGISTER: char = 'a';

/// Register slots.
pub struct RegisterStore {
    slots: [Option<TokenHandle>; NUM_REGS],
}

impl RegisterStore {
    /// Create store with every register undefined
    pub const fn new() -> Self {
        Self {
            slots: [None; NUM_REGS],
        }
    }

    /// Slot index for a register letter.
    pub fn slot(id: char) -> Result<usize, MonitorError> {
        let n = (id as u32).wrapping_sub(FIRST_REGISTER as u32) as usize;
        if n < NUM_REGS {
            Ok(n)
        } else {
            Err(MonitorError::RegisterOutOfRange(id))
        }
    }

    /// Store a duplicate of `value` in register `id`.
    ///
    /// Returns the displaced value, which the caller now owns and must
    /// release. On failure the register keeps its previous value.
    pub fn set(&mut self, pool: &mut TokenPool, id: char, value: TokenHandle) -> Result<Option<TokenHandle>, MonitorError> {
        let n = Self::slot(id)?;
        let copy = pool.duplicate(value, "setReg")?;
        Ok(self.slots[n].replace(copy))
    }

    /// Handle of the value in register `id`. Not owned by the caller.
    pub fn get(&self, id: char) -> Result<TokenHandle, MonitorError> {
        let n = Self::slot(id)?;
        self.slots[n].ok_or(MonitorError::RegisterUndefined(id))
    }

    /// Like [`get`](Self::get), but a failed read prints a diagnostic and
    /// yields [`TokenHandle::EMPTY`], which must not be released.
    pub fn read(&self, id: char, out: &mut dyn Write, eol: &str) -> TokenHandle {
        match self.get(id) {
            Ok(handle) => handle,
            Err(err) => {
                let _ = write_diagnostic(out, &err, eol);
                TokenHandle::EMPTY
            }
        }
    }
}

impl Default for RegisterStore {
    fn default() -> Self {
        Self::new()
    }
}
