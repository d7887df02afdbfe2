//! Command line tokenizer
//!
//! `name arg1, arg2 ...` with arguments separated by spaces, commas or
//! brackets. Quoted strings keep their whitespace, `$x` reads register `x`
//! inline and `!` marks the next quoted string for nested evaluation.

use crate::config::Capabilities;
use crate::token::Token;

/// Source of tokens for one command line.
pub trait Tokenizer {
    /// Next token; `EndOfInput` once the line is used up, and forever after.
    fn next_token(&mut self) -> Token;
}

/// Default tokenizer over a borrowed line.
pub struct Lexer<'a> {
    rest: &'a str,
    registers: bool,
    exit: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(line: &'a str, caps: &Capabilities) -> Self {
        Self {
            rest: line,
            registers: caps.registers,
            exit: caps.exit,
        }
    }

    fn skip_separators(&mut self) {
        self.rest = self.rest.trim_start_matches(is_separator);
    }

    fn quoted(&mut self) -> Token {
        let body = &self.rest[1..];
        match body.find('"') {
            Some(end) => {
                self.rest = &body[end + 1..];
                Token::string(&body[..end])
            }
            None => {
                self.rest = "";
                Token::error("Bad String")
            }
        }
    }

    fn register_get(&mut self) -> Token {
        let mut chars = self.rest[1..].chars();
        match chars.next() {
            Some(c) if self.registers && c.is_ascii_lowercase() => {
                self.rest = chars.as_str();
                Token::RegisterGet(c)
            }
            _ => {
                self.rest = &self.rest[1..];
                self.word();
                Token::error("Bad Register")
            }
        }
    }

    /// Consume up to the next separator or quote.
    fn word(&mut self) -> &'a str {
        let end = self
            .rest
            .find(|c: char| is_separator(c) || c == '"')
            .unwrap_or(self.rest.len());
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        word
    }

    fn classify(&self, word: &str) -> Token {
        if let Some(n) = parse_number(word) {
            return Token::Number(n);
        }
        if looks_numeric(word) {
            return Token::error("Bad Number");
        }
        if self.exit && word == "exit" {
            return Token::Exit;
        }
        let mut chars = word.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if self.registers && c.is_ascii_lowercase() {
                return Token::Register(c);
            }
        }
        Token::string(word)
    }
}

impl Tokenizer for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        self.skip_separators();

        match self.rest.as_bytes().first() {
            None => Token::EndOfInput,
            Some(b'"') => self.quoted(),
            Some(b'!') => {
                self.rest = &self.rest[1..];
                Token::Execute
            }
            Some(b'$') => self.register_get(),
            Some(_) => {
                let word = self.word();
                self.classify(word)
            }
        }
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | ',' | '(' | ')' | '\r' | '\n')
}

/// Starts like a number: a digit, or `-` followed by a digit.
fn looks_numeric(word: &str) -> bool {
    let digits = word.strip_prefix('-').unwrap_or(word);
    digits.as_bytes().first().map_or(false, u8::is_ascii_digit)
}

/// Decimal with optional sign, or `0x` hexadecimal (bit pattern, may wrap
/// negative).
fn parse_number(word: &str) -> Option<i32> {
    if let Some(hex) = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).ok().map(|n| n as i32);
    }
    if !looks_numeric(word) {
        return None;
    }
    word.parse::<i32>().ok()
}
