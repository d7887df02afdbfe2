//! Control bytes and line ending per platform convention

/// Erase sequence echoed for one character: back, blank, back.
pub const ERASE_ECHO: &str = "\x08 \x08";

/// Escape byte that starts an arrow-key sequence.
pub const ESC: u8 = 0x1B;

/// Second byte of a CSI sequence.
pub const CSI_BRACKET: u8 = 0x5B;

/// Final byte of the up-arrow sequence.
pub const ARROW_UP: u8 = 0x41;

/// Final byte of the down-arrow sequence.
pub const ARROW_DOWN: u8 = 0x42;

/// Which input bytes mean what, and how lines end on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    /// Submits the line.
    pub terminator: u8,
    /// Erases the last character.
    pub erase: u8,
    /// Recalls the previous history entry (Ctrl-U).
    pub history_prev: u8,
    /// Recalls the next history entry (Ctrl-D).
    pub history_next: u8,
    /// Line ending written to the output channel.
    pub eol: &'static str,
}

impl KeyMap {
    /// Unix-like host: DEL erases, LF ends lines.
    pub const HOSTED: KeyMap = KeyMap {
        terminator: 0x0A,
        erase: 0x7F,
        history_prev: 0x15,
        history_next: 0x04,
        eol: "\n",
    };

    /// Serial terminal on an MCU: BS erases, CR ends lines.
    pub const EMBEDDED: KeyMap = KeyMap {
        terminator: 0x0D,
        erase: 0x08,
        history_prev: 0x15,
        history_next: 0x04,
        eol: "\r\n",
    };
}
