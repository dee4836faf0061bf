//! A small UTF-8 codec used by the source cursor and diagnostic renderer.
//!
//! Unlike [`str::from_utf8`], this codec decodes one scalar at a time and
//! reports exactly where it stopped, which is what a cursor that must keep
//! scanning after an illegal byte sequence needs. Illegal input decodes to
//! `U+FFFD` (one replacement per maximal invalid subsequence, following the
//! WHATWG/Unicode recommendation) rather than aborting the whole buffer.

/// Outcome of a single decode or encode step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecResult {
    /// A scalar value was produced (or consumed) successfully.
    Success,
    /// The source bytes do not form a valid encoding; the codec substituted
    /// `U+FFFD` and advanced past the maximal invalid subsequence.
    SourceIllegal,
    /// The source ran out of bytes mid-sequence.
    SourceExhausted,
    /// The destination buffer has no room for the produced bytes.
    TargetExhausted,
}

/// The Unicode replacement character, substituted for illegal input.
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Result of [`decode`]: the decoded scalar (or replacement character), how
/// many source bytes were consumed, and the outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub ch: char,
    pub consumed: usize,
    pub result: CodecResult,
}

/// Decode one scalar value from the front of `bytes`.
///
/// Returns `None` only when `bytes` is empty (nothing to decode, not an
/// error). A non-empty but truncated multi-byte sequence at the end of the
/// buffer yields `CodecResult::SourceExhausted` with the replacement
/// character and `consumed == bytes.len()`.
///
/// # Examples
///
/// ```
/// use weave_util::utf8::{decode, CodecResult};
///
/// let d = decode("A".as_bytes()).unwrap();
/// assert_eq!(d.ch, 'A');
/// assert_eq!(d.consumed, 1);
/// assert_eq!(d.result, CodecResult::Success);
/// ```
pub fn decode(bytes: &[u8]) -> Option<Decoded> {
    let &first = bytes.first()?;

    let width = utf8_sequence_width(first);
    let width = match width {
        Some(w) => w,
        None => {
            return Some(Decoded {
                ch: REPLACEMENT_CHARACTER,
                consumed: 1,
                result: CodecResult::SourceIllegal,
            })
        }
    };

    if width == 1 {
        return Some(Decoded { ch: first as char, consumed: 1, result: CodecResult::Success });
    }

    if bytes.len() < width {
        return Some(Decoded {
            ch: REPLACEMENT_CHARACTER,
            consumed: bytes.len(),
            result: CodecResult::SourceExhausted,
        });
    }

    let seq = &bytes[..width];
    for &cont in &seq[1..] {
        if cont & 0xC0 != 0x80 {
            return Some(Decoded {
                ch: REPLACEMENT_CHARACTER,
                consumed: 1,
                result: CodecResult::SourceIllegal,
            });
        }
    }

    let scalar = match width {
        2 => (u32::from(seq[0] & 0x1F) << 6) | u32::from(seq[1] & 0x3F),
        3 => {
            (u32::from(seq[0] & 0x0F) << 12)
                | (u32::from(seq[1] & 0x3F) << 6)
                | u32::from(seq[2] & 0x3F)
        }
        4 => {
            (u32::from(seq[0] & 0x07) << 18)
                | (u32::from(seq[1] & 0x3F) << 12)
                | (u32::from(seq[2] & 0x3F) << 6)
                | u32::from(seq[3] & 0x3F)
        }
        _ => unreachable!("utf8_sequence_width only returns 1..=4"),
    };

    match char::from_u32(scalar) {
        Some(ch) if is_overlong(scalar, width) => {
            let _ = ch;
            Some(Decoded {
                ch: REPLACEMENT_CHARACTER,
                consumed: 1,
                result: CodecResult::SourceIllegal,
            })
        }
        Some(ch) => Some(Decoded { ch, consumed: width, result: CodecResult::Success }),
        None => Some(Decoded {
            ch: REPLACEMENT_CHARACTER,
            consumed: 1,
            result: CodecResult::SourceIllegal,
        }),
    }
}

fn is_overlong(scalar: u32, width: usize) -> bool {
    match width {
        2 => scalar < 0x80,
        3 => scalar < 0x800,
        4 => scalar < 0x10000,
        _ => false,
    }
}

fn utf8_sequence_width(lead: u8) -> Option<usize> {
    if lead & 0x80 == 0 {
        Some(1)
    } else if lead & 0xE0 == 0xC0 {
        // 0xC0 and 0xC1 can only encode overlong sequences; reject the lead
        // byte outright rather than decoding an illegal scalar.
        if lead == 0xC0 || lead == 0xC1 {
            None
        } else {
            Some(2)
        }
    } else if lead & 0xF0 == 0xE0 {
        Some(3)
    } else if lead & 0xF8 == 0xF0 {
        Some(4)
    } else {
        None
    }
}

/// Encode `ch` into `out`, returning the codec result.
///
/// `U+0000` is encoded as the two-byte modified-UTF-8 sequence `C0 80`
/// instead of the single null byte standard UTF-8 would use. This lets
/// encoded source text travel through null-terminated host APIs without
/// truncating; [`decode`] does not accept this form back (a `0xC0` lead byte
/// is rejected as illegal), so the quirk is encoder-only and not a round-trip
/// guarantee.
///
/// # Examples
///
/// ```
/// use weave_util::utf8::{encode, CodecResult};
///
/// let mut buf = [0u8; 4];
/// let (result, len) = encode('\u{0}', &mut buf);
/// assert_eq!(result, CodecResult::Success);
/// assert_eq!(&buf[..len], &[0xC0, 0x80]);
/// ```
pub fn encode(ch: char, out: &mut [u8]) -> (CodecResult, usize) {
    if ch == '\u{0}' {
        if out.len() < 2 {
            return (CodecResult::TargetExhausted, 0);
        }
        out[0] = 0xC0;
        out[1] = 0x80;
        return (CodecResult::Success, 2);
    }

    let needed = ch.len_utf8();
    if out.len() < needed {
        return (CodecResult::TargetExhausted, 0);
    }
    let written = ch.encode_utf8(out).len();
    (CodecResult::Success, written)
}

/// Walk `bytes` end to end and report whether every sequence in it decodes
/// as [`CodecResult::Success`].
///
/// # Examples
///
/// ```
/// use weave_util::utf8::validate_string;
///
/// assert!(validate_string("héllo".as_bytes()));
/// assert!(!validate_string(&[0x68, 0xFF, 0x6C]));
/// ```
pub fn validate_string(bytes: &[u8]) -> bool {
    let mut rest = bytes;
    while !rest.is_empty() {
        match decode(rest) {
            Some(Decoded { result: CodecResult::Success, consumed, .. }) => {
                rest = &rest[consumed..];
            }
            _ => return false,
        }
    }
    true
}
