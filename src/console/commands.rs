//! Command table, argument checking and handlers
//!
//! The descriptor table is static; [`CommandTable`] is the subset enabled by
//! the session's capabilities, in declaration order (also the `help` order).

use core::fmt::Write;

use super::error::{write_diagnostic, MonitorError};
use super::session::Session;
use crate::config::Capabilities;
use crate::mon_debug;
use crate::token::{NumberBase, Token, TokenHandle, TokenKind};

/// Expected type of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// String, number or register name (`s`)
    Text,
    /// Register name (`c`)
    Register,
    /// Number (`d`)
    Number,
}

impl ParamType {
    /// Letter used in the help listing.
    pub fn code(self) -> char {
        match self {
            Self::Text => 's',
            Self::Register => 'c',
            Self::Number => 'd',
        }
    }

    /// Whether `token` is acceptable in this position.
    pub fn accepts(self, token: &Token, registers: bool) -> bool {
        match (self, token.kind()) {
            (Self::Text, TokenKind::String | TokenKind::Number) => true,
            (Self::Text | Self::Register, TokenKind::Register) => registers,
            (Self::Number, TokenKind::Number) => true,
            _ => false,
        }
    }
}

/// Argument signature: fixed list, optionally with the last type repeating.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub params: &'static [ParamType],
    /// Last type may repeat for any number of extra arguments.
    pub repeat: bool,
}

impl Signature {
    pub const fn fixed(params: &'static [ParamType]) -> Self {
        Self { params, repeat: false }
    }

    pub const fn repeating(params: &'static [ParamType]) -> Self {
        Self { params, repeat: true }
    }

    /// Whether `count` arguments is a valid arity.
    pub fn accepts_count(&self, count: usize) -> bool {
        if self.repeat {
            count >= self.params.len()
        } else {
            count == self.params.len()
        }
    }

    /// Expected type at argument position `index`.
    pub fn type_at(&self, index: usize) -> Option<ParamType> {
        match self.params.get(index) {
            Some(&t) => Some(t),
            None if self.repeat => self.params.last().copied(),
            None => None,
        }
    }

    /// Write the signature codes, e.g. `cs` or `s+`.
    pub fn write_codes(&self, out: &mut dyn Write) -> core::fmt::Result {
        for p in self.params {
            out.write_char(p.code())?;
        }
        if self.repeat {
            out.write_char('+')?;
        }
        Ok(())
    }
}

/// Which capability a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Core,
    Registers,
    Math,
}

impl Feature {
    pub fn enabled(self, caps: &Capabilities) -> bool {
        match self {
            Self::Core => true,
            Self::Registers => caps.registers,
            Self::Math => caps.math,
        }
    }
}

/// Command handler. Arguments are already validated and stay owned by the
/// caller; the returned token belongs to the caller too.
pub type Handler = fn(&mut Session, &[TokenHandle], &mut dyn Write) -> Result<TokenHandle, MonitorError>;

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub signature: Signature,
    pub brief: &'static str,
    pub feature: Feature,
    pub handler: Handler,
}

use ParamType::{Number as D, Register as C, Text as S};

/// All commands, in listing order
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "prompt", signature: Signature::fixed(&[S]), brief: "Select the prompt for input", feature: Feature::Core, handler: cmd_prompt },
    CommandDescriptor { name: "set", signature: Signature::fixed(&[C, S]), brief: "Set register to string", feature: Feature::Registers, handler: cmd_set },
    CommandDescriptor { name: "get", signature: Signature::fixed(&[C]), brief: "Display register", feature: Feature::Registers, handler: cmd_get },
    CommandDescriptor { name: "add", signature: Signature::fixed(&[D, D]), brief: "Add two numbers", feature: Feature::Math, handler: cmd_add },
    CommandDescriptor { name: "sub", signature: Signature::fixed(&[D, D]), brief: "Subtract two numbers", feature: Feature::Math, handler: cmd_sub },
    CommandDescriptor { name: "mul", signature: Signature::fixed(&[D, D]), brief: "Multiply two numbers", feature: Feature::Math, handler: cmd_mul },
    CommandDescriptor { name: "hex", signature: Signature::fixed(&[]), brief: "Toggle output base", feature: Feature::Core, handler: cmd_hex },
    CommandDescriptor { name: "echo", signature: Signature::repeating(&[S]), brief: "Display parameter", feature: Feature::Core, handler: cmd_echo },
    CommandDescriptor { name: "help", signature: Signature::fixed(&[]), brief: "Display this help", feature: Feature::Core, handler: cmd_help },
];

/// Upper bound on enabled commands.
pub const MAX_COMMANDS: usize = 16;

/// Commands enabled for one session.
pub struct CommandTable {
    entries: heapless::Vec<&'static CommandDescriptor, MAX_COMMANDS>,
    exit: bool,
}

impl CommandTable {
    /// Pick the commands `caps` allows, keeping declaration order
    pub fn new(caps: &Capabilities) -> Self {
        let mut entries = heapless::Vec::new();
        for cmd in COMMANDS.iter().filter(|c| c.feature.enabled(caps)) {
            // COMMANDS is shorter than MAX_COMMANDS
            let _ = entries.push(cmd);
        }
        Self { entries, exit: caps.exit }
    }

    /// First command with exactly this name.
    pub fn find(&self, name: &str) -> Option<&'static CommandDescriptor> {
        self.entries.iter().copied().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static CommandDescriptor> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `exit` is listed in help.
    pub fn lists_exit(&self) -> bool {
        self.exit
    }
}

/// Run a command line already split into tokens.
///
/// `tokens[0]` names the command, the rest are its arguments. Unknown
/// commands and bad arguments print a diagnostic and yield an Error token.
/// Only pool trouble is returned as `Err`.
pub fn dispatch(session: &mut Session, tokens: &[TokenHandle], out: &mut dyn Write) -> Result<TokenHandle, MonitorError> {
    let Some((&name_token, args)) = tokens.split_first() else {
        return session.allocate("empty command", Token::Empty);
    };

    let name = session.text(name_token)?;
    mon_debug!(session.log, "dispatch {} argc={}", name, args.len());

    let Some(cmd) = session.commands().find(&name) else {
        return reject(session, MonitorError::CommandNotFound, out);
    };

    if !arguments_valid(session, &cmd.signature, args)? {
        return reject(session, MonitorError::ArgumentError, out);
    }

    (cmd.handler)(session, args, out)
}

fn arguments_valid(session: &Session, sig: &Signature, args: &[TokenHandle]) -> Result<bool, MonitorError> {
    if !sig.accepts_count(args.len()) {
        return Ok(false);
    }
    let registers = session.capabilities().registers;
    for (i, &arg) in args.iter().enumerate() {
        let token = session.token(arg)?;
        match sig.type_at(i) {
            Some(t) if t.accepts(token, registers) => {}
            _ => return Ok(false),
        }
    }
    Ok(true)
}

fn reject(session: &mut Session, err: MonitorError, out: &mut dyn Write) -> Result<TokenHandle, MonitorError> {
    let _ = write_diagnostic(out, &err, session.eol());
    session.allocate("command", Token::error(err.message()))
}

fn empty(session: &mut Session, owner: &'static str) -> Result<TokenHandle, MonitorError> {
    session.allocate(owner, Token::Empty)
}

fn register_arg(session: &Session, arg: TokenHandle) -> Result<char, MonitorError> {
    match session.token(arg)? {
        Token::Register(id) => Ok(*id),
        _ => Err(MonitorError::ArgumentError),
    }
}

fn number_args(session: &Session, args: &[TokenHandle]) -> Result<(i32, i32), MonitorError> {
    match (session.token(args[0])?, session.token(args[1])?) {
        (Token::Number(a), Token::Number(b)) => Ok((*a, *b)),
        _ => Err(MonitorError::ArgumentError),
    }
}

// --- Command Implementations ---

fn cmd_prompt(session: &mut Session, args: &[TokenHandle], _out: &mut dyn Write) -> Result<TokenHandle, MonitorError> {
    let text = session.text(args[0])?;
    session.set_prompt(&text);
    empty(session, "cmd_prompt")
}

fn cmd_set(session: &mut Session, args: &[TokenHandle], out: &mut dyn Write) -> Result<TokenHandle, MonitorError> {
    let id = register_arg(session, args[0])?;
    session.set_register(id, args[1], out)?;
    empty(session, "cmd_set")
}

fn cmd_get(session: &mut Session, args: &[TokenHandle], out: &mut dyn Write) -> Result<TokenHandle, MonitorError> {
    let id = register_arg(session, args[0])?;
    let value = session.read_register(id, out);
    session.duplicate(value, "cmd_get")
}

fn cmd_add(session: &mut Session, args: &[TokenHandle], _out: &mut dyn Write) -> Result<TokenHandle, MonitorError> {
    let (a, b) = number_args(session, args)?;
    session.allocate("cmd_add", Token::Number(a.wrapping_add(b)))
}

fn cmd_sub(session: &mut Session, args: &[TokenHandle], _out: &mut dyn Write) -> Result<TokenHandle, MonitorError> {
    let (a, b) = number_args(session, args)?;
    session.allocate("cmd_sub", Token::Number(a.wrapping_sub(b)))
}

fn cmd_mul(session: &mut Session, args: &[TokenHandle], _out: &mut dyn Write) -> Result<TokenHandle, MonitorError> {
    let (a, b) = number_args(session, args)?;
    session.allocate("cmd_mul", Token::Number(a.wrapping_mul(b)))
}

fn cmd_hex(session: &mut Session, _args: &[TokenHandle], out: &mut dyn Write) -> Result<TokenHandle, MonitorError> {
    let msg = match session.toggle_number_base() {
        NumberBase::Decimal => "output decimal",
        NumberBase::Hex => "output hexadecimal",
    };
    let _ = write!(out, "{}{}", msg, session.eol());
    empty(session, "cmd_hex")
}

fn cmd_echo(session: &mut Session, args: &[TokenHandle], out: &mut dyn Write) -> Result<TokenHandle, MonitorError> {
    let Some((&last, leading)) = args.split_last() else {
        return Err(MonitorError::ArgumentError);
    };
    let base = session.number_base();
    for &arg in leading {
        let _ = session.token(arg)?.write_text(base, out);
        let _ = out.write_str(session.eol());
    }
    session.duplicate(last, "cmd_echo")
}

fn cmd_help(session: &mut Session, _args: &[TokenHandle], out: &mut dyn Write) -> Result<TokenHandle, MonitorError> {
    let eol = session.eol();
    let _ = write!(out, "Available Commands:{}", eol);
    for cmd in session.commands().iter() {
        let mut label: heapless::String<24> = heapless::String::new();
        let _ = label.push_str(cmd.name);
        let _ = label.push('(');
        let _ = cmd.signature.write_codes(&mut label);
        let _ = label.push(')');
        let _ = write!(out, "{:>14} - {}{}", label.as_str(), cmd.brief, eol);
    }
    if session.commands().lists_exit() {
        let _ = write!(out, "{:>14} - {}{}", "exit()", "Exit monitor", eol);
    }
    empty(session, "cmd_help")
}
