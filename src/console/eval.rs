//! Command line evaluation
//!
//! Pulls tokens from a [`Tokenizer`], resolves `$x` register reads, runs
//! `!"..."` strings as nested command lines, and hands the collected tokens
//! to the dispatcher. Every token this module takes from the pool is back in
//! the pool when an evaluation returns, whatever the outcome; only the result
//! token survives, and it belongs to the caller.

use core::fmt::Write;

use super::commands::dispatch;
use super::error::MonitorError;
use super::lexer::{Lexer, Tokenizer};
use super::session::Session;
use crate::token::{Token, TokenHandle, TokenText};
use crate::{mon_trace, mon_warn};

/// Most tokens a single command line may accumulate (name included).
pub const MAX_ARGS: usize = 16;

/// Deepest `!"..."` nesting allowed below the top-level line.
pub const MAX_NESTING: usize = 4;

type Pending = heapless::Vec<TokenHandle, MAX_ARGS>;

/// How token collection ended.
enum Collected {
    /// End of input reached; `overflow` is set if tokens were dropped for
    /// lack of room.
    Command { overflow: bool },
    Exit,
}

/// Evaluate one command line.
///
/// Returns `Ok(Some(result))` for a completed command (the caller must
/// release the result), `Ok(None)` when `exit` was requested, and `Err` when
/// the evaluation had to be abandoned (pool exhausted, nesting too deep).
pub fn eval(session: &mut Session, line: &str, out: &mut dyn Write) -> Result<Option<TokenHandle>, MonitorError> {
    eval_at_depth(session, line, 0, out)
}

/// Evaluate tokens from any tokenizer at the given nesting depth.
pub fn eval_tokens(
    session: &mut Session,
    tokenizer: &mut dyn Tokenizer,
    depth: usize,
    out: &mut dyn Write,
) -> Result<Option<TokenHandle>, MonitorError> {
    let mut pending = Pending::new();

    let outcome = match collect(session, tokenizer, depth, &mut pending, out) {
        Ok(Collected::Command { overflow: false }) => dispatch(session, &pending, out).map(Some),
        Ok(Collected::Command { overflow: true }) => {
            let err = MonitorError::ArgumentError;
            let _ = super::error::write_diagnostic(out, &err, session.eol());
            session.allocate("eval", Token::error(err.message())).map(Some)
        }
        Ok(Collected::Exit) => {
            session.request_exit();
            Ok(None)
        }
        Err(err) => Err(err),
    };

    for &handle in pending.iter() {
        session.release(handle);
    }
    outcome
}

fn eval_at_depth(session: &mut Session, line: &str, depth: usize, out: &mut dyn Write) -> Result<Option<TokenHandle>, MonitorError> {
    mon_trace!(session.log, "eval[{}] \"{}\"", depth, line);
    let caps = *session.capabilities();
    let mut lexer = Lexer::new(line, &caps);
    eval_tokens(session, &mut lexer, depth, out)
}

/// Pull tokens until end of input or exit, leaving the owned ones in
/// `pending`.
fn collect(
    session: &mut Session,
    tokenizer: &mut dyn Tokenizer,
    depth: usize,
    pending: &mut Pending,
    out: &mut dyn Write,
) -> Result<Collected, MonitorError> {
    let mut execute_next = false;
    let mut overflow = false;

    loop {
        let token = tokenizer.next_token();
        mon_trace!(session.log, "lexed {}", token.describe());

        let mut handle = match token {
            Token::Exit => return Ok(Collected::Exit),
            Token::EndOfInput => return Ok(Collected::Command { overflow }),
            Token::Execute => {
                execute_next = true;
                continue;
            }
            Token::RegisterGet(id) => {
                let value = session.read_register(id, out);
                session.duplicate(value, "eval")?
            }
            other => session.allocate("lexer", other)?,
        };

        if core::mem::take(&mut execute_next) {
            let line: Option<TokenText> = match session.token(handle)? {
                Token::String(text) => Some(text.clone()),
                _ => None,
            };
            if let Some(text) = line {
                session.release(handle);
                handle = match nested(session, &text, depth, out)? {
                    Some(result) => result,
                    None => return Ok(Collected::Exit),
                };
            }
        }

        if matches!(session.token(handle)?, Token::Empty) {
            session.release(handle);
            continue;
        }

        if let Err(surplus) = pending.push(handle) {
            session.release(surplus);
            overflow = true;
        }
    }
}

/// Run `text` as a command line one level deeper.
fn nested(session: &mut Session, text: &str, depth: usize, out: &mut dyn Write) -> Result<Option<TokenHandle>, MonitorError> {
    if depth >= MAX_NESTING {
        mon_warn!(session.log, "nesting limit {} reached", MAX_NESTING);
        return Err(MonitorError::NestingTooDeep);
    }
    eval_at_depth(session, text, depth + 1, out)
}
