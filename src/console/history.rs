//! Command history ring
//!
//! Four line slots. One is the line being edited (`current`); the others hold
//! previously submitted lines. Browsing copies a history slot into the
//! current one, so history entries themselves are never edited.

use super::line_buffer::LineBuffer;

/// Number of ring slots, including the one being edited
pub const HISTORY_SIZE: usize = 4;

/// Result of a browse step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browse {
    /// A history entry was copied into the current line.
    Recalled,
    /// Browsing back onto the current line: it was emptied.
    Cleared,
    /// Nothing further in that direction; nothing changed.
    Refused,
}

/// Command history ring buffer
pub struct History {
    slots: [LineBuffer; HISTORY_SIZE],
    /// Whether each slot holds a submitted line
    submitted: [bool; HISTORY_SIZE],
    /// Slot being edited
    current: usize,
    /// Slot last recalled (equals `current` when not browsing)
    cursor: usize,
}

impl History {
    /// Create empty history
    pub const fn new() -> Self {
        const EMPTY: LineBuffer = LineBuffer::new();
        Self {
            slots: [EMPTY; HISTORY_SIZE],
            submitted: [false; HISTORY_SIZE],
            current: 0,
            cursor: 0,
        }
    }

    /// Line being edited
    pub fn current(&self) -> &LineBuffer {
        &self.slots[self.current]
    }

    pub fn current_mut(&mut self) -> &mut LineBuffer {
        &mut self.slots[self.current]
    }

    /// Keep the current line as history and move on to a fresh slot.
    ///
    /// The slot taken over is the oldest entry, which is forgotten.
    pub fn commit(&mut self) {
        self.submitted[self.current] = true;
        self.current = (self.current + 1) % HISTORY_SIZE;
        self.slots[self.current].clear();
        self.submitted[self.current] = false;
        self.cursor = self.current;
    }

    /// Step back to an older line.
    ///
    /// Never moves past the oldest submitted line.
    pub fn previous(&mut self) -> Browse {
        let target = (self.cursor + HISTORY_SIZE - 1) % HISTORY_SIZE;
        self.recall(target)
    }

    /// Step forward to a newer line; stepping onto the current slot empties
    /// the line.
    pub fn next(&mut self) -> Browse {
        let target = (self.cursor + 1) % HISTORY_SIZE;
        if target == self.current {
            self.cursor = self.current;
            self.slots[self.current].clear();
            return Browse::Cleared;
        }
        self.recall(target)
    }

    fn recall(&mut self, target: usize) -> Browse {
        if target == self.current || !self.submitted[target] {
            return Browse::Refused;
        }
        self.cursor = target;
        self.slots[self.current] = self.slots[target].clone();
        Browse::Recalled
    }

    /// Submitted lines, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> + '_ {
        (1..HISTORY_SIZE)
            .map(move |back| (self.current + HISTORY_SIZE - back) % HISTORY_SIZE)
            .take_while(move |&i| self.submitted[i])
            .map(move |i| self.slots[i].as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
