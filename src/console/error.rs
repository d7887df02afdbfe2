//! Monitor error types

use crate::token::PoolError;

/// Monitor error with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError {
    /// E01: Wrong argument count or type
    ArgumentError,
    /// E02: Unknown command
    CommandNotFound,
    /// E03: Register id outside the supported letters
    RegisterOutOfRange(char),
    /// E04: Register never set
    RegisterUndefined(char),
    /// E05: Token pool full
    ResourceExhausted,
    /// E06: Nested `!"..."` evaluation too deep
    NestingTooDeep,
    /// E07: Handle to a released token
    StaleToken,
}

impl MonitorError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArgumentError => "E01",
            Self::CommandNotFound => "E02",
            Self::RegisterOutOfRange(_) => "E03",
            Self::RegisterUndefined(_) => "E04",
            Self::ResourceExhausted => "E05",
            Self::NestingTooDeep => "E06",
            Self::StaleToken => "E07",
        }
    }

    /// Get error message (without the register letter)
    pub fn message(&self) -> &'static str {
        match self {
            Self::ArgumentError => "Argument Error",
            Self::CommandNotFound => "Command Not Found",
            Self::RegisterOutOfRange(_) => "out of range",
            Self::RegisterUndefined(_) => "undefined",
            Self::ResourceExhausted => "Token pool empty",
            Self::NestingTooDeep => "Nesting too deep",
            Self::StaleToken => "Stale token",
        }
    }
}

impl core::fmt::Display for MonitorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RegisterOutOfRange(c) | Self::RegisterUndefined(c) => {
                write!(f, "Register '{}' {}", c, self.message())
            }
            _ => f.write_str(self.message()),
        }
    }
}

impl From<PoolError> for MonitorError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::Exhausted => Self::ResourceExhausted,
            PoolError::DoubleRelease { .. }
            | PoolError::StaleHandle { .. }
            | PoolError::SentinelRelease => Self::StaleToken,
        }
    }
}

/// Write a user-visible diagnostic line: `# <error> #`.
pub fn write_diagnostic(
    out: &mut dyn core::fmt::Write,
    err: &MonitorError,
    eol: &str,
) -> core::fmt::Result {
    write!(out, "# {} #{}", err, eol)
}
