//! Serial command monitor
//!
//! Bytes in, one line at a time: the [`Console`] edits and recalls lines,
//! [`eval`] tokenizes and runs them against the [`CommandTable`], and all
//! values travel as pooled tokens owned by the [`Session`].
//! Zero heap allocation - all fixed-capacity buffers.

pub mod commands;
#[allow(clippy::module_inception)]
pub mod console;
pub mod error;
pub mod escape;
pub mod eval;
pub mod history;
pub mod lexer;
pub mod line_buffer;
pub mod registers;
pub mod session;

pub use commands::{dispatch, CommandDescriptor, CommandTable, ParamType, Signature, COMMANDS};
pub use console::{Console, LineOutcome, VERSION};
pub use error::MonitorError;
pub use escape::{EscapeDecoder, Key};
pub use eval::{eval, eval_tokens, MAX_ARGS, MAX_NESTING};
pub use history::{Browse, History};
pub use lexer::{Lexer, Tokenizer};
pub use line_buffer::LineBuffer;
pub use registers::RegisterStore;
pub use session::Session;
