//! Numeric literal scanning.
//!
//! Values are stored as text with `_` separators stripped, never evaluated
//! into a host numeric type - overflow, rounding, and base conversion are a
//! later stage's problem, not the lexer's.

use weave_util::diagnostic::{DiagnosticSink, Level};

use super::char_at;
use crate::arena::LexerArena;
use crate::cursor::Cursor;
use crate::token::{FloatLiteral, FloatSuffix, IntegerLiteral, IntegerSuffix, LiteralPayload, Radix, TokenKind};
use crate::unicode::{is_digit_in_base, is_ident_continue};

use super::Scanned;

struct DigitRun {
    value: String,
    had_digits: bool,
}

/// Consume a run of digits (per `is_digit`) and `_` separators, reporting a
/// leading or trailing separator immediately adjacent to the run's own
/// boundary. Reused for the integer part, the fractional part, and the
/// exponent digits - each is its own boundary, which is how "not adjacent to
/// the radix prefix, decimal point, or exponent sign" falls out for free.
fn scan_digit_run(cursor: &mut Cursor, sink: &mut DiagnosticSink, is_digit: impl Fn(char) -> bool) -> DigitRun {
    let start = cursor.position();
    let mut raw = String::new();
    loop {
        if cursor.is_valid() && is_digit(cursor.peek()) {
            raw.push(cursor.peek());
            cursor.advance();
        } else if cursor.is_valid() && cursor.peek() == '_' {
            raw.push('_');
            cursor.advance();
        } else {
            break;
        }
    }
    let span = cursor.get_span_to_current(start);
    if raw.starts_with('_') {
        sink.emit(Level::Error, "numeric separator cannot start a digit run", span);
    }
    if raw.len() > 1 && raw.ends_with('_') {
        sink.emit(Level::Error, "numeric separator cannot end a digit run", span);
    }
    let had_digits = raw.chars().any(|c| c != '_');
    let value: String = raw.chars().filter(|&c| c != '_').collect();
    DigitRun { value, had_digits }
}

/// Consume a run of ASCII digits that are not valid in `radix` (e.g. `2` in
/// a binary literal) and report it once, so a typo doesn't silently become
/// part of the type suffix instead.
fn reject_invalid_digits(cursor: &mut Cursor, sink: &mut DiagnosticSink, radix_name: &str, is_digit: impl Fn(char) -> bool) {
    let start = cursor.position();
    let mut any = false;
    while cursor.is_valid() && cursor.peek().is_ascii_digit() && !is_digit(cursor.peek()) {
        any = true;
        cursor.advance();
    }
    if any {
        sink.emit(Level::Error, format!("digit not allowed in a {radix_name} literal"), cursor.get_span_to_current(start));
    }
}

fn scan_exponent(cursor: &mut Cursor, sink: &mut DiagnosticSink, marker_name: &str) -> String {
    let start = cursor.position();
    let mut text = String::new();
    text.push(cursor.peek());
    cursor.advance();
    if matches!(cursor.peek(), '+' | '-') {
        text.push(cursor.peek());
        cursor.advance();
    }
    let digits = scan_digit_run(cursor, sink, |c| c.is_ascii_digit());
    if !digits.had_digits {
        sink.emit(Level::Error, format!("{marker_name} has no digits"), cursor.get_span_to_current(start));
    }
    text.push_str(&digits.value);
    text
}

/// Scan one integer or float literal, starting at the first digit of the
/// lexeme. Promotion from `IntegerLiteral` to `FloatLiteral` happens on a
/// fractional part or an exponent.
pub(crate) fn scan_number<'a>(cursor: &mut Cursor<'a>, arena: &'a LexerArena, sink: &mut DiagnosticSink) -> Scanned<'a> {
    let lexeme_start = cursor.position();
    let mut radix = Radix::Default;

    if cursor.peek() == '0' {
        match char_at(cursor, 1) {
            Some('b') => {
                cursor.advance();
                cursor.advance();
                radix = Radix::Binary;
            }
            Some('o') => {
                cursor.advance();
                cursor.advance();
                radix = Radix::Octal;
            }
            Some('x') => {
                cursor.advance();
                cursor.advance();
                radix = Radix::Hexadecimal;
            }
            _ => {}
        }
    }

    let radix_digit = |c: char| match radix {
        Radix::Binary => is_digit_in_base(c, 2),
        Radix::Octal => is_digit_in_base(c, 8),
        Radix::Hexadecimal => is_digit_in_base(c, 16),
        Radix::Default | Radix::Decimal => c.is_ascii_digit(),
    };

    let main = scan_digit_run(cursor, sink, radix_digit);
    if !main.had_digits {
        sink.emit(Level::Error, "numeric literal has no digits", cursor.get_span_to_current(lexeme_start));
    }

    match radix {
        Radix::Binary => reject_invalid_digits(cursor, sink, "binary", |c| is_digit_in_base(c, 2)),
        Radix::Octal => reject_invalid_digits(cursor, sink, "octal", |c| is_digit_in_base(c, 8)),
        _ => {}
    }

    let mut value = main.value;
    let mut is_float = false;

    if matches!(radix, Radix::Default | Radix::Decimal) {
        if cursor.peek() == '.' && char_at(cursor, 1).map(|c| c.is_ascii_digit()).unwrap_or(false) {
            cursor.advance();
            value.push('.');
            is_float = true;
            let frac = scan_digit_run(cursor, sink, |c| c.is_ascii_digit());
            value.push_str(&frac.value);
        }
        if matches!(cursor.peek(), 'e' | 'E') {
            is_float = true;
            value.push_str(&scan_exponent(cursor, sink, "exponent"));
        }
    } else if radix == Radix::Hexadecimal && matches!(cursor.peek(), 'p' | 'P') {
        is_float = true;
        value.push_str(&scan_exponent(cursor, sink, "binary exponent"));
    }

    let suffix_start = cursor.position();
    cursor.skip_if(is_ident_continue);
    let suffix_text = &cursor.source()[suffix_start.as_usize()..cursor.position().as_usize()];
    let value = arena.alloc_str(&value);

    if is_float {
        let suffix = FloatSuffix::from_str(suffix_text).unwrap_or_else(|| {
            sink.emit(Level::Error, format!("unknown float suffix `{suffix_text}`"), cursor.get_span_to_current(suffix_start));
            FloatSuffix::Default
        });
        Scanned { kind: TokenKind::FloatLiteral, payload: Some(LiteralPayload::Float(FloatLiteral { radix, suffix, value })) }
    } else {
        let suffix = IntegerSuffix::from_str(suffix_text).unwrap_or_else(|| {
            sink.emit(Level::Error, format!("unknown integer suffix `{suffix_text}`"), cursor.get_span_to_current(suffix_start));
            IntegerSuffix::Default
        });
        Scanned { kind: TokenKind::IntegerLiteral, payload: Some(LiteralPayload::Integer(IntegerLiteral { radix, suffix, value })) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_util::diagnostic::DiagnosticSink;

    fn scan(src: &str) -> (Scanned<'_>, DiagnosticSink) {
        let arena = Box::leak(Box::new(LexerArena::new()));
        let mut cursor = Cursor::new(src);
        let mut sink = DiagnosticSink::new();
        let scanned = scan_number(&mut cursor, arena, &mut sink);
        (scanned, sink)
    }

    #[test]
    fn plain_integer() {
        let (scanned, sink) = scan("1234");
        assert_eq!(scanned.kind, TokenKind::IntegerLiteral);
        assert!(!sink.has_errors());
        match scanned.payload {
            Some(LiteralPayload::Integer(lit)) => {
                assert_eq!(lit.radix, Radix::Default);
                assert_eq!(lit.value, "1234");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn separators_are_stripped() {
        let (scanned, sink) = scan("1_000_000");
        assert!(!sink.has_errors());
        match scanned.payload {
            Some(LiteralPayload::Integer(lit)) => assert_eq!(lit.value, "1000000"),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn leading_separator_in_digit_run_is_reported() {
        let (_, sink) = scan("0x_ff");
        assert!(sink.has_errors());
    }

    #[test]
    fn hex_with_suffix() {
        let (scanned, sink) = scan("0xDEADu32");
        assert!(!sink.has_errors());
        match scanned.payload {
            Some(LiteralPayload::Integer(lit)) => {
                assert_eq!(lit.radix, Radix::Hexadecimal);
                assert_eq!(lit.suffix, IntegerSuffix::U32);
                assert_eq!(lit.value, "DEAD");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn hex_with_separator_and_u64_suffix() {
        let (scanned, sink) = scan("0xBEEF_BABEu64");
        assert!(!sink.has_errors());
        assert_eq!(scanned.kind, TokenKind::IntegerLiteral);
        match scanned.payload {
            Some(LiteralPayload::Integer(lit)) => {
                assert_eq!(lit.radix, Radix::Hexadecimal);
                assert_eq!(lit.suffix, IntegerSuffix::U64);
                assert_eq!(lit.value, "BEEFBABE");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn fractional_part_promotes_to_float() {
        let (scanned, sink) = scan("21.37f32");
        assert!(!sink.has_errors());
        assert_eq!(scanned.kind, TokenKind::FloatLiteral);
        match scanned.payload {
            Some(LiteralPayload::Float(lit)) => {
                assert_eq!(lit.value, "21.37");
                assert_eq!(lit.suffix, FloatSuffix::F32);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn dot_not_followed_by_digit_is_not_a_fraction() {
        let (scanned, _) = scan("1.foo");
        assert_eq!(scanned.kind, TokenKind::IntegerLiteral);
    }

    #[test]
    fn decimal_exponent() {
        let (scanned, sink) = scan("1e10");
        assert!(!sink.has_errors());
        assert_eq!(scanned.kind, TokenKind::FloatLiteral);
        match scanned.payload {
            Some(LiteralPayload::Float(lit)) => assert_eq!(lit.value, "1e10"),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn signed_exponent() {
        let (scanned, sink) = scan("1.5e-3");
        assert!(!sink.has_errors());
        match scanned.payload {
            Some(LiteralPayload::Float(lit)) => assert_eq!(lit.value, "1.5e-3"),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn hex_binary_exponent() {
        let (scanned, sink) = scan("0x1p4");
        assert!(!sink.has_errors());
        assert_eq!(scanned.kind, TokenKind::FloatLiteral);
        match scanned.payload {
            Some(LiteralPayload::Float(lit)) => {
                assert_eq!(lit.radix, Radix::Hexadecimal);
                assert_eq!(lit.value, "1p4");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn invalid_digit_for_radix_is_reported() {
        let (_, sink) = scan("0b2");
        assert!(sink.has_errors());
    }

    #[test]
    fn unknown_suffix_falls_back_to_default_and_reports() {
        let (scanned, sink) = scan("42bogus");
        assert!(sink.has_errors());
        match scanned.payload {
            Some(LiteralPayload::Integer(lit)) => assert_eq!(lit.suffix, IntegerSuffix::Default),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn missing_digits_is_reported() {
        let (_, sink) = scan("0x");
        assert!(sink.has_errors());
    }
}
