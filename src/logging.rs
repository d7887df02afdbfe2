//! Diagnostic log for the monitor.
//!
//! The output channel belongs to the user: it only ever carries echo, results
//! and `# ... #` diagnostics. Everything an engineer needs to debug the monitor
//! itself (token traffic, dispatch, pool faults) goes into a [`LogStream`]
//! owned by the session and drained by the binary when it has time.
//!
//! ```text
//! Session                 LogStream              Binary
//! ───────                 ─────────              ──────
//!
//! mon_log!() ──────────▶ [L0][L1][L2] ──────▶ stderr / UART
//! no alloc                fixed queue           between bytes
//! never blocks            drops when full
//! ```
//!
//! There is no clock on the smallest targets, so entries are stamped with a
//! sequence number instead of a timestamp.

use core::fmt::{self, Write};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 96;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Bounded log message text.
pub type LogMessage = heapless::String<MAX_MSG_LEN>;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// A single log entry.
#[derive(Clone, Debug)]
pub struct LogEntry {
    /// Sequence number; gaps mean dropped messages.
    pub seq: u32,
    pub level: LogLevel,
    pub msg: LogMessage,
}

impl LogEntry {
    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:6}] {}: {}", self.seq, self.level.as_str(), self.msg)
    }
}

/// Fixed queue of log entries.
///
/// Single owner, so no atomics: the session pushes, the binary drains between
/// input bytes. Push never blocks; when the queue is full the message is
/// dropped and counted.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: heapless::Deque<LogEntry, N>,
    seq: u32,
    dropped: u32,
    threshold: LogLevel,
}

impl<const N: usize> LogStream<N> {
    /// Empty stream keeping `Info` and more severe.
    pub const fn new() -> Self {
        Self::with_threshold(LogLevel::Info)
    }

    pub const fn with_threshold(threshold: LogLevel) -> Self {
        Self {
            entries: heapless::Deque::new(),
            seq: 0,
            dropped: 0,
            threshold,
        }
    }

    /// Whether a message at `level` would be kept.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.threshold
    }

    /// Queue a message, truncated to [`MAX_MSG_LEN`].
    ///
    /// Returns `false` if it was filtered out or dropped (queue full).
    pub fn push(&mut self, level: LogLevel, msg: &str) -> bool {
        if !self.enabled(level) {
            return false;
        }

        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);

        let entry = LogEntry {
            seq,
            level,
            msg: crate::token::truncated(msg),
        };
        if self.entries.push_back(entry).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            return false;
        }
        true
    }

    /// Oldest queued entry, if any.
    pub fn drain(&mut self) -> Option<LogEntry> {
        self.entries.pop_front()
    }

    /// Messages lost to a full queue since the last reset.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    #[inline]
    pub fn reset_dropped(&mut self) {
        self.dropped = 0;
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `args` into a message, cutting it at [`MAX_MSG_LEN`] bytes.
pub fn format_message(args: fmt::Arguments<'_>) -> LogMessage {
    struct Truncating(LogMessage);

    impl Write for Truncating {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            for c in s.chars() {
                if self.0.push(c).is_err() {
                    break;
                }
            }
            Ok(())
        }
    }

    let mut w = Truncating(LogMessage::new());
    let _ = w.write_fmt(args);
    w.0
}

/// Log macro.
///
/// Formatting is skipped entirely when the stream filters the level out.
///
/// # Example
///
/// ```ignore
/// mon_log!(LogLevel::Debug, session.log, "dispatch {} argc={}", name, argc);
/// ```
#[macro_export]
macro_rules! mon_log {
    ($level:expr, $stream:expr, $($arg:tt)*) => {{
        let level = $level;
        if $stream.enabled(level) {
            let msg = $crate::logging::format_message(format_args!($($arg)*));
            $stream.push(level, &msg);
        }
    }};
}

/// Error log.
#[macro_export]
macro_rules! mon_error {
    ($stream:expr, $($arg:tt)*) => {
        $crate::mon_log!($crate::logging::LogLevel::Error, $stream, $($arg)*)
    };
}

/// Warning log.
#[macro_export]
macro_rules! mon_warn {
    ($stream:expr, $($arg:tt)*) => {
        $crate::mon_log!($crate::logging::LogLevel::Warn, $stream, $($arg)*)
    };
}

/// Debug log.
#[macro_export]
macro_rules! mon_debug {
    ($stream:expr, $($arg:tt)*) => {
        $crate::mon_log!($crate::logging::LogLevel::Debug, $stream, $($arg)*)
    };
}

/// Trace log (maximum verbosity).
#[macro_export]
macro_rules! mon_trace {
    ($stream:expr, $($arg:tt)*) => {
        $crate::mon_log!($crate::logging::LogLevel::Trace, $stream, $($arg)*)
    };
}
