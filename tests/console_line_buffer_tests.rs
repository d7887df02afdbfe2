//! Line buffer tests

use serial_monitor::console::line_buffer::{LineBuffer, LINE_SIZE};

fn filled(text: &str) -> LineBuffer {
    let mut buf = LineBuffer::new();
    for b in text.bytes() {
        buf.push(b);
    }
    buf
}

#[test]
fn test_line_buffer_push() {
    let mut buf = LineBuffer::new();

    buf.push(b'h');
    buf.push(b'e');
    buf.push(b'l');
    buf.push(b'p');

    assert_eq!(buf.as_str(), "help");
}

#[test]
fn test_line_buffer_backspace() {
    let mut buf = filled("help");

    buf.backspace();
    buf.backspace();

    assert_eq!(buf.as_str(), "he");
}

#[test]
fn test_line_buffer_backspace_empty() {
    let mut buf = LineBuffer::new();

    buf.backspace(); // should not panic
    assert_eq!(buf.as_str(), "");
}

#[test]
fn test_line_buffer_clear() {
    let mut buf = filled("help");

    buf.clear();

    assert_eq!(buf.as_str(), "");
    assert!(buf.is_empty());
}

#[test]
fn test_line_buffer_overflow() {
    let mut buf = LineBuffer::new();

    // Push 40 characters into a 30 byte line
    let accepted = (0..40u8).filter(|i| buf.push(b'a' + (i % 26))).count();

    assert_eq!(accepted, LINE_SIZE);
    assert_eq!(buf.len(), LINE_SIZE);
    assert!(!buf.push(b'z'));
}

#[test]
fn test_line_buffer_refuses_non_ascii() {
    let mut buf = filled("echo hi ");

    assert!(!buf.push(0xC3));
    assert!(!buf.push(0x80));
    assert!(!buf.push(0xFF));

    assert_eq!(buf.as_str(), "echo hi ");
    assert_eq!(buf.len(), 8);
}
