//! # SerialMonitor
//!
//! Interactive command monitor for small microcontrollers.
//!
//! ## Architecture
//!
//! Everything flows as tokens from one fixed pool:
//! - [`Console`] turns raw bytes into lines (editing, history, arrow keys)
//! - [`console::eval`] tokenizes a line, substitutes registers, runs nested
//!   `!"..."` lines, then dispatches the command
//! - [`TokenPool`] is the only storage for values; when it runs dry the
//!   current line is abandoned, never the session
//!
//! No heap, no threads, no persistence. All state lives in a
//! [`console::Session`] and resets on restart.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod logging;
pub mod token;

pub use config::{Capabilities, KeyMap, MonitorConfig};
pub use console::{Console, LineOutcome, MonitorError, Session};
pub use logging::{LogLevel, LogStream};
pub use token::{NumberBase, Token, TokenHandle, TokenKind, TokenPool};
