//! Command line evaluation tests

use std::collections::VecDeque;

use serial_monitor::console::{eval, eval_tokens, MonitorError, Tokenizer, MAX_ARGS};
use serial_monitor::{Capabilities, MonitorConfig, Session, Token};

fn session() -> Session {
    Session::new(&MonitorConfig::new(Capabilities::all()))
}

/// Evaluate a line; return the result value (released) and the output.
fn run(session: &mut Session, line: &str) -> (Option<Token>, String) {
    let mut out = String::new();
    let result = eval(session, line, &mut out).unwrap();
    let token = result.map(|h| {
        let token = session.token(h).unwrap().clone();
        session.release(h);
        token
    });
    (token, out)
}

fn value(session: &mut Session, line: &str) -> Token {
    run(session, line).0.expect("line requested exit")
}

/// Tokenizer replaying a fixed token list.
struct Script(VecDeque<Token>);

impl Tokenizer for Script {
    fn next_token(&mut self) -> Token {
        self.0.pop_front().unwrap_or(Token::EndOfInput)
    }
}

#[test]
fn test_echo() {
    let mut s = session();
    let (result, out) = run(&mut s, "echo hello");
    assert_eq!(result, Some(Token::string("hello")));
    assert_eq!(out, "");
}

#[test]
fn test_arithmetic() {
    let mut s = session();
    assert_eq!(value(&mut s, "add 3 5"), Token::Number(8));
    assert_eq!(value(&mut s, "sub 10 4"), Token::Number(6));
    assert_eq!(value(&mut s, "mul 3, 4"), Token::Number(12));
    assert_eq!(value(&mut s, "add(0x10, -1)"), Token::Number(15));
}

#[test]
fn test_set_then_get() {
    let mut s = session();
    assert_eq!(value(&mut s, "set a 5"), Token::Empty);
    assert_eq!(value(&mut s, "get a"), Token::Number(5));
    assert_eq!(s.pool().live(), 1);
}

#[test]
fn test_register_substitution() {
    let mut s = session();
    value(&mut s, "set b 4");
    assert_eq!(value(&mut s, "add $b 1"), Token::Number(5));
    assert_eq!(value(&mut s, "echo $b"), Token::Number(4));
}

#[test]
fn test_nested_evaluation() {
    let mut s = session();
    value(&mut s, "set a !\"add 3 5\"");
    assert_eq!(value(&mut s, "get a"), Token::Number(8));

    value(&mut s, "set a !\"add $a 1\"");
    assert_eq!(value(&mut s, "get a"), Token::Number(9));
    assert_eq!(s.pool().live(), 1);
}

#[test]
fn test_execute_marker_before_non_string_is_ignored() {
    let mut s = session();
    assert_eq!(value(&mut s, "echo ! 5"), Token::Number(5));
}

#[test]
fn test_unknown_command() {
    let mut s = session();
    let (result, out) = run(&mut s, "foo");
    assert_eq!(result, Some(Token::error("Command Not Found")));
    assert_eq!(out, "# Command Not Found #\n");
}

#[test]
fn test_argument_error() {
    let mut s = session();
    let (result, out) = run(&mut s, "add 3");
    assert_eq!(result, Some(Token::error("Argument Error")));
    assert_eq!(out, "# Argument Error #\n");
}

#[test]
fn test_get_out_of_range() {
    let mut s = session();
    let (result, out) = run(&mut s, "get z");
    assert_eq!(result, Some(Token::Empty));
    assert_eq!(out, "# Register 'z' out of range #\n");
    assert_eq!(s.pool().live(), 0);
}

#[test]
fn test_undefined_register_read() {
    let mut s = session();
    let (result, out) = run(&mut s, "echo xy $c");
    // the empty value is dropped, leaving echo with one argument
    assert_eq!(result, Some(Token::string("xy")));
    assert_eq!(out, "# Register 'c' undefined #\n");
}

#[test]
fn test_too_many_arguments() {
    let mut s = session();
    let line = "echo 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16";
    let (result, out) = run(&mut s, line);

    assert_eq!(line.split(' ').count(), MAX_ARGS + 1);
    assert_eq!(result, Some(Token::error("Argument Error")));
    assert_eq!(out, "# Argument Error #\n");
    assert_eq!(s.pool().live(), 0);
}

#[test]
fn test_nesting_limit() {
    let mut s = session();
    value(&mut s, "set a \"echo !$a\"");

    let mut out = String::new();
    let result = eval(&mut s, "echo !$a", &mut out);

    assert_eq!(result, Err(MonitorError::NestingTooDeep));
    assert_eq!(s.pool().live(), 1);
}

#[test]
fn test_pool_exhaustion_recovers() {
    let mut s = session();
    for id in 'a'..='h' {
        value(&mut s, &format!("set {} {}", id, 1));
    }

    let mut out = String::new();
    let result = eval(&mut s, "echo 1 2 3 4 5 6 7 8 9 1 2 3", &mut out);
    assert_eq!(result, Err(MonitorError::ResourceExhausted));
    assert_eq!(s.pool().live(), 8);

    // the session carries on
    assert_eq!(value(&mut s, "add $a $h"), Token::Number(2));
    assert_eq!(s.pool().live(), 8);
}

#[test]
fn test_exit() {
    let mut s = session();
    let (result, _) = run(&mut s, "exit");
    assert_eq!(result, None);
    assert!(s.exit_requested());
    assert_eq!(s.pool().live(), 0);
}

#[test]
fn test_exit_inside_nested_line() {
    let mut s = session();
    let (result, _) = run(&mut s, "echo a !\"exit\"");
    assert_eq!(result, None);
    assert!(s.exit_requested());
    assert_eq!(s.pool().live(), 0);
}

#[test]
fn test_exit_disabled_is_a_command_name() {
    let mut s = Session::new(&MonitorConfig::new(Capabilities {
        exit: false,
        ..Capabilities::all()
    }));
    let (result, out) = run(&mut s, "exit");
    assert_eq!(result, Some(Token::error("Command Not Found")));
    assert_eq!(out, "# Command Not Found #\n");
    assert!(!s.exit_requested());
}

#[test]
fn test_empty_line() {
    let mut s = session();
    let (result, out) = run(&mut s, "  , ");
    assert_eq!(result, Some(Token::Empty));
    assert_eq!(out, "");
}

#[test]
fn test_custom_tokenizer_drops_empty_tokens() {
    let mut s = session();
    let mut script = Script(VecDeque::from([
        Token::string("add"),
        Token::Number(1),
        Token::Empty,
        Token::Number(2),
    ]));
    let mut out = String::new();

    let result = eval_tokens(&mut s, &mut script, 0, &mut out).unwrap().unwrap();

    assert_eq!(s.token(result).unwrap(), &Token::Number(3));
    s.release(result);
    assert_eq!(s.pool().live(), 0);
}

#[test]
fn test_no_leaks_across_a_session() {
    let mut s = session();
    let lines = [
        "set a hello",
        "echo $a $a",
        "set b !\"mul 6 7\"",
        "get b",
        "foo bar",
        "add 1",
        "get q",
        "echo \"unterminated",
        "hex",
        "prompt mon",
    ];
    for line in lines {
        run(&mut s, line);
    }
    assert_eq!(s.pool().live(), 2);
    assert!(s.pool().peak() <= s.pool().capacity());
}
