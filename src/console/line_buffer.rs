//! Line buffer for console input

/// Maximum line length
pub const LINE_SIZE: usize = 30;

/// One editable line
#[derive(Clone, Default)]
pub struct LineBuffer {
    buf: heapless::Vec<u8, LINE_SIZE>,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
        }
    }

    /// Push an ASCII character; returns `false` (and drops it) when full or
    /// when `c` is not ASCII, so the line is always valid text
    pub fn push(&mut self, c: u8) -> bool {
        c.is_ascii() && self.buf.push(c).is_ok()
    }

    /// Remove last character
    pub fn backspace(&mut self) {
        self.buf.pop();
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Get buffer as string slice
    pub fn as_str(&self) -> &str {
        // push only admits ASCII
        core::str::from_utf8(&self.buf).unwrap_or_default()
    }

    /// Get buffer length
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
