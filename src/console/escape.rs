//! Arrow-key decoding
//!
//! `ESC [ A` and `ESC [ B` become history keys. Anything that turns out not
//! to be one of those sequences is handed back as plain bytes, in arrival
//! order, so the editor sees exactly what it would have without decoding.

use crate::config::keys::{ARROW_DOWN, ARROW_UP, CSI_BRACKET, ESC};

/// Decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EscapeState {
    Idle,
    /// Got ESC
    SawEscape,
    /// Got ESC [
    SawBracket,
}

/// Input event for the line editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Byte(u8),
    HistoryPrevious,
    HistoryNext,
}

/// Keys to apply, in order, after one input byte.
pub type Replay = heapless::Vec<Key, 3>;

/// Escape sequence state machine
pub struct EscapeDecoder {
    state: EscapeState,
}

impl EscapeDecoder {
    pub const fn new() -> Self {
        Self {
            state: EscapeState::Idle,
        }
    }

    /// Feed one byte, get the keys it releases (possibly none).
    pub fn feed(&mut self, byte: u8) -> Replay {
        let mut keys = Replay::new();
        // Never more than three keys, the capacity of Replay
        let mut emit = |key: Key| {
            let _ = keys.push(key);
        };

        self.state = match (self.state, byte) {
            (EscapeState::Idle, ESC) => EscapeState::SawEscape,
            (EscapeState::Idle, b) => {
                emit(Key::Byte(b));
                EscapeState::Idle
            }

            (EscapeState::SawEscape, CSI_BRACKET) => EscapeState::SawBracket,
            // The byte after a lone ESC is swallowed
            (EscapeState::SawEscape, _) => {
                emit(Key::Byte(ESC));
                EscapeState::Idle
            }

            (EscapeState::SawBracket, ARROW_UP) => {
                emit(Key::HistoryPrevious);
                EscapeState::Idle
            }
            (EscapeState::SawBracket, ARROW_DOWN) => {
                emit(Key::HistoryNext);
                EscapeState::Idle
            }
            (EscapeState::SawBracket, b) => {
                emit(Key::Byte(ESC));
                emit(Key::Byte(CSI_BRACKET));
                emit(Key::Byte(b));
                EscapeState::Idle
            }
        };

        keys
    }
}

impl Default for EscapeDecoder {
    fn default() -> Self {
        Self::new()
    }
}
