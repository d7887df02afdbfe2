//! Tokens: the one value type that flows between tokenizer, evaluator,
//! registers and command handlers.
//!
//! Tokens live in a [`TokenPool`] and are passed around as [`TokenHandle`]s.
//! A token is owned by exactly one holder; copies are made with
//! [`TokenPool::duplicate`], never by sharing a handle.

pub mod pool;

pub use pool::{PoolError, TokenHandle, TokenPool, POOL_SIZE};

use core::fmt::{self, Write};

/// Capacity of token text (strings, error messages).
pub const TOKEN_TEXT_SIZE: usize = 32;

/// Bounded token text.
pub type TokenText = heapless::String<TOKEN_TEXT_SIZE>;

/// How numbers are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberBase {
    #[default]
    Decimal,
    Hex,
}

impl NumberBase {
    /// The other base.
    pub fn toggled(self) -> Self {
        match self {
            Self::Decimal => Self::Hex,
            Self::Hex => Self::Decimal,
        }
    }
}

/// Kind of a token, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Error,
    String,
    Number,
    Register,
    RegisterGet,
    Execute,
    Empty,
    EndOfInput,
    Exit,
}

/// Tagged token value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Failed command; carries the diagnostic.
    Error(TokenText),
    String(TokenText),
    Number(i32),
    /// Register name as an argument (`set a ...`).
    Register(char),
    /// Inline register read (`$a`), resolved by the evaluator.
    RegisterGet(char),
    /// `!` marker: evaluate the next string as a command.
    Execute,
    Empty,
    EndOfInput,
    Exit,
}

impl Token {
    /// String token from text, truncated to capacity.
    pub fn string(text: &str) -> Self {
        Token::String(truncated(text))
    }

    /// Error token from text, truncated to capacity.
    pub fn error(text: &str) -> Self {
        Token::Error(truncated(text))
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Error(_) => TokenKind::Error,
            Token::String(_) => TokenKind::String,
            Token::Number(_) => TokenKind::Number,
            Token::Register(_) => TokenKind::Register,
            Token::RegisterGet(_) => TokenKind::RegisterGet,
            Token::Execute => TokenKind::Execute,
            Token::Empty => TokenKind::Empty,
            Token::EndOfInput => TokenKind::EndOfInput,
            Token::Exit => TokenKind::Exit,
        }
    }

    /// Whether the token carries something worth printing as a result.
    pub fn is_printable(&self) -> bool {
        !matches!(self, Token::Empty | Token::Error(_))
    }

    /// Write the token's text: strings as-is, numbers in `base`, registers
    /// as their letter, everything else as nothing.
    pub fn write_text(&self, base: NumberBase, out: &mut dyn Write) -> fmt::Result {
        match self {
            Token::String(s) | Token::Error(s) => out.write_str(s),
            Token::Number(n) => match base {
                NumberBase::Decimal => write!(out, "{}", n),
                NumberBase::Hex => write!(out, "0x{:X}", *n as u32),
            },
            Token::Register(c) => out.write_char(*c),
            _ => Ok(()),
        }
    }

    /// Token text as an owned bounded string.
    pub fn text(&self, base: NumberBase) -> TokenText {
        let mut s = TokenText::new();
        // Overflow only truncates
        let _ = self.write_text(base, &mut s);
        s
    }

    /// Debug description, e.g. `STR: "abc"` or `NUM: 5`.
    pub fn describe(&self) -> Describe<'_> {
        Describe(self)
    }
}

/// Display adapter returned by [`Token::describe`].
pub struct Describe<'a>(&'a Token);

impl fmt::Display for Describe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Token::Error(s) => write!(f, "ERR: {}", s),
            Token::String(s) => write!(f, "STR: \"{}\"", s),
            Token::Number(n) => write!(f, "NUM: {}", n),
            Token::Register(c) => write!(f, "REG: {}", c),
            Token::RegisterGet(c) => write!(f, "GET: {}", c),
            Token::Execute => f.write_str("EXE"),
            Token::Empty => f.write_str("EMPTY"),
            Token::EndOfInput => f.write_str("END"),
            Token::Exit => f.write_str("EXIT"),
        }
    }
}

/// Copy as much of `text` as fits, never splitting a character.
pub fn truncated<const N: usize>(text: &str) -> heapless::String<N> {
    let mut s = heapless::String::new();
    for c in text.chars() {
        if s.push(c).is_err() {
            break;
        }
    }
    s
}
