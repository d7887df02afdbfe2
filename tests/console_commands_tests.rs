//! Command dispatch tests

use serial_monitor::console::commands::{dispatch, CommandTable, ParamType, Signature, COMMANDS};
use serial_monitor::console::{MonitorError, Session};
use serial_monitor::{Capabilities, MonitorConfig, NumberBase, Token, TokenHandle};

fn session_with(caps: Capabilities) -> Session {
    Session::new(&MonitorConfig::new(caps))
}

fn session() -> Session {
    session_with(Capabilities::all())
}

fn alloc(session: &mut Session, items: &[Token]) -> Vec<TokenHandle> {
    items
        .iter()
        .map(|t| session.allocate("test", t.clone()).unwrap())
        .collect()
}

/// Dispatch, then return the result value and release everything.
fn run(session: &mut Session, items: &[Token], out: &mut TestOutput) -> Token {
    let args = alloc(session, items);
    let result = dispatch(session, &args, out).unwrap();
    let token = session.token(result).unwrap().clone();
    session.release(result);
    for h in args {
        session.release(h);
    }
    token
}

#[test]
fn test_command_registry_has_all_commands() {
    let expected = ["prompt", "set", "get", "add", "sub", "mul", "hex", "echo", "help"];

    for name in expected {
        assert!(
            COMMANDS.iter().any(|c| c.name == name),
            "Command '{}' should be in registry",
            name
        );
    }
}

#[test]
fn test_table_follows_capabilities() {
    let all = CommandTable::new(&Capabilities::all());
    assert_eq!(all.len(), COMMANDS.len());

    let minimal = CommandTable::new(&Capabilities::minimal());
    let names: Vec<_> = minimal.iter().map(|c| c.name).collect();
    assert_eq!(names, ["prompt", "hex", "echo", "help"]);
    assert!(minimal.find("add").is_none());
}

#[test]
fn test_signature_arity() {
    let fixed = Signature::fixed(&[ParamType::Number, ParamType::Number]);
    assert!(fixed.accepts_count(2));
    assert!(!fixed.accepts_count(1));
    assert!(!fixed.accepts_count(3));

    let repeating = Signature::repeating(&[ParamType::Text]);
    assert!(!repeating.accepts_count(0));
    assert!(repeating.accepts_count(1));
    assert!(repeating.accepts_count(9));
    assert_eq!(repeating.type_at(5), Some(ParamType::Text));
    assert_eq!(fixed.type_at(2), None);
}

#[test]
fn test_execute_unknown_command() {
    let mut s = session();
    let mut out = TestOutput::new();

    let result = run(&mut s, &[Token::string("foobar")], &mut out);

    assert_eq!(result, Token::error("Command Not Found"));
    assert_eq!(out.as_str(), "# Command Not Found #\n");
}

#[test]
fn test_name_match_is_case_sensitive() {
    let mut s = session();
    let mut out = TestOutput::new();

    let result = run(&mut s, &[Token::string("HELP")], &mut out);

    assert_eq!(result.kind(), serial_monitor::TokenKind::Error);
}

#[test]
fn test_wrong_arity_is_argument_error() {
    let mut s = session();
    let mut out = TestOutput::new();

    let result = run(&mut s, &[Token::string("add"), Token::Number(3)], &mut out);

    assert_eq!(result, Token::error("Argument Error"));
    assert_eq!(out.as_str(), "# Argument Error #\n");
}

#[test]
fn test_wrong_type_is_argument_error() {
    let mut s = session();
    let mut out = TestOutput::new();

    let result = run(
        &mut s,
        &[Token::string("add"), Token::string("x"), Token::Number(5)],
        &mut out,
    );
    assert_eq!(result, Token::error("Argument Error"));

    // set wants a register name first, not a string
    let result = run(
        &mut s,
        &[Token::string("set"), Token::string("a"), Token::Number(5)],
        &mut out,
    );
    assert_eq!(result, Token::error("Argument Error"));
}

#[test]
fn test_empty_command_line() {
    let mut s = session();
    let mut out = TestOutput::new();

    assert_eq!(run(&mut s, &[], &mut out), Token::Empty);
    assert_eq!(out.as_str(), "");
}

#[test]
fn test_math() {
    let mut s = session();
    let mut out = TestOutput::new();

    let add = run(&mut s, &[Token::string("add"), Token::Number(3), Token::Number(5)], &mut out);
    let sub = run(&mut s, &[Token::string("sub"), Token::Number(10), Token::Number(4)], &mut out);
    let mul = run(&mut s, &[Token::string("mul"), Token::Number(3), Token::Number(4)], &mut out);
    let wrap = run(&mut s, &[Token::string("add"), Token::Number(i32::MAX), Token::Number(1)], &mut out);

    assert_eq!(add, Token::Number(8));
    assert_eq!(sub, Token::Number(6));
    assert_eq!(mul, Token::Number(12));
    assert_eq!(wrap, Token::Number(i32::MIN));
}

#[test]
fn test_echo_prints_all_but_last() {
    let mut s = session();
    let mut out = TestOutput::new();

    let result = run(
        &mut s,
        &[Token::string("echo"), Token::string("a"), Token::Number(2), Token::string("c")],
        &mut out,
    );

    assert_eq!(out.as_str(), "a\n2\n");
    assert_eq!(result, Token::string("c"));
}

#[test]
fn test_hex_toggles_number_base() {
    let mut s = session();
    let mut out = TestOutput::new();

    assert_eq!(run(&mut s, &[Token::string("hex")], &mut out), Token::Empty);
    assert_eq!(s.number_base(), NumberBase::Hex);
    assert_eq!(run(&mut s, &[Token::string("hex")], &mut out), Token::Empty);
    assert_eq!(s.number_base(), NumberBase::Decimal);

    assert_eq!(out.as_str(), "output hexadecimal\noutput decimal\n");
}

#[test]
fn test_prompt_is_truncated() {
    let mut s = session();
    let mut out = TestOutput::new();

    run(&mut s, &[Token::string("prompt"), Token::string("mon")], &mut out);
    assert_eq!(s.prompt(), "mon");

    run(&mut s, &[Token::string("prompt"), Token::string("abcdefghijklmnopqrstuvwxyz")], &mut out);
    assert_eq!(s.prompt(), "abcdefghijklmnopqrs");
}

#[test]
fn test_help_listing_minimal() {
    let caps = Capabilities {
        hosted: true,
        ..Capabilities::minimal()
    };
    let mut s = session_with(caps);
    let mut out = TestOutput::new();

    run(&mut s, &[Token::string("help")], &mut out);

    assert_eq!(
        out.as_str(),
        "Available Commands:\n\
         \x20    prompt(s) - Select the prompt for input\n\
         \x20        hex() - Toggle output base\n\
         \x20     echo(s+) - Display parameter\n\
         \x20       help() - Display this help\n"
    );
}

#[test]
fn test_help_listing_full() {
    let mut s = session();
    let mut out = TestOutput::new();

    run(&mut s, &[Token::string("help")], &mut out);

    assert!(out.contains("       set(cs) - Set register to string\n"));
    assert!(out.contains("       add(dd) - Add two numbers\n"));
    assert!(out.as_str().ends_with("        exit() - Exit monitor\n"));
}

#[test]
fn test_dispatch_leaves_arguments_to_caller() {
    let mut s = session();
    let mut out = TestOutput::new();

    let args = alloc(&mut s, &[Token::string("echo"), Token::string("x")]);
    let result = dispatch(&mut s, &args, &mut out).unwrap();

    // both arguments plus an independent result
    assert_eq!(s.pool().live(), 3);
    assert_ne!(result, args[1]);

    s.release(result);
    assert_eq!(s.token(args[1]).unwrap(), &Token::string("x"));
}

#[test]
fn test_register_commands_absent_without_registers() {
    let mut s = session_with(Capabilities {
        registers: false,
        ..Capabilities::all()
    });
    let mut out = TestOutput::new();

    let result = run(&mut s, &[Token::string("get"), Token::Register('a')], &mut out);

    assert_eq!(result, Token::error(MonitorError::CommandNotFound.message()));
}

// Test output buffer
struct TestOutput {
    buf: [u8; 1024],
    len: usize,
}

impl TestOutput {
    fn new() -> Self {
        Self { buf: [0u8; 1024], len: 0 }
    }

    fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    fn contains(&self, s: &str) -> bool {
        self.as_str().contains(s)
    }
}

impl core::fmt::Write for TestOutput {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let available = self.buf.len() - self.len;
        let to_copy = bytes.len().min(available);
        self.buf[self.len..self.len + to_copy].copy_from_slice(&bytes[..to_copy]);
        self.len += to_copy;
        Ok(())
    }
}
