//! Module: config
//!
//! Purpose: Runtime configuration for the monitor.
//!
//! Architecture:
//! - Cargo features (`registers`, `math`, `exit`, `hosted`) only seed the
//!   defaults in [`Capabilities::from_features`]
//! - [`Capabilities`] is consulted when the command table and tokenizer are built
//! - [`KeyMap`] holds the line-ending and control-key convention
//! - [`MonitorConfig`] bundles everything `Console::new` needs
//!
//! Nothing here is persisted; all state resets on restart.

pub mod keys;

pub use keys::KeyMap;

use crate::logging::LogLevel;

/// Optional parts of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Register store plus `set`/`get`, `$x` substitution and register tokens.
    pub registers: bool,
    /// `add`, `sub` and `mul`.
    pub math: bool,
    /// The `exit` keyword.
    pub exit: bool,
    /// Large-system line convention instead of the MCU one.
    pub hosted: bool,
}

impl Capabilities {
    /// Everything enabled, hosted convention.
    pub const fn all() -> Self {
        Self {
            registers: true,
            math: true,
            exit: true,
            hosted: true,
        }
    }

    /// Smallest build: prompt, hex, echo and help only, MCU convention.
    pub const fn minimal() -> Self {
        Self {
            registers: false,
            math: false,
            exit: false,
            hosted: false,
        }
    }

    /// Defaults selected by Cargo features.
    pub const fn from_features() -> Self {
        Self {
            registers: cfg!(feature = "registers"),
            math: cfg!(feature = "math"),
            exit: cfg!(feature = "exit"),
            hosted: cfg!(feature = "hosted"),
        }
    }

    /// Line convention matching `hosted`.
    pub const fn key_map(&self) -> KeyMap {
        if self.hosted {
            KeyMap::HOSTED
        } else {
            KeyMap::EMBEDDED
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::from_features()
    }
}

/// Default prompt text (a space is always emitted after it).
pub const DEFAULT_PROMPT: &str = ">";

/// Session configuration.
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    pub capabilities: Capabilities,
    /// Threshold of the session's diagnostic log.
    pub log_level: LogLevel,
    /// Initial prompt.
    pub prompt: &'static str,
}

impl MonitorConfig {
    /// Config with the given capabilities and defaults for the rest.
    pub const fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            log_level: LogLevel::Info,
            prompt: DEFAULT_PROMPT,
        }
    }

    pub const fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new(Capabilities::default())
    }
}
