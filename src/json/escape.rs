//! String literal escape codec.
//!
//! [`unescape`] turns the raw body of a string literal into the logical
//! string; [`escape`] does the reverse for the serializer.
//!
//! Escaping, in priority order:
//!
//! 1. `"` `/` `\` and backspace, form feed, newline, carriage return, tab map
//!    to their two-character escapes. The solidus is escaped even though
//!    RFC 8259 makes it optional.
//! 2. Any other code point up to `U+001F` becomes `\u00XX`.
//! 3. Scalar values outside the Basic Multilingual Plane become a
//!    `\uD8XX\uDCXX` surrogate pair.
//! 4. Everything else is emitted as is.
//!
//! Hex digits are always uppercase on output and accepted in either case on
//! input. `\/` and a bare `/` both unescape to `/`.

use std::fmt::Write;

use crate::error::{EscapeError, EscapeErrorKind};

/// Escape `s` into a new string (without surrounding quotes).
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    escape_into(s, &mut out);
    out
}

/// Append the escaped form of `s` to `out` (without surrounding quotes).
pub fn escape_into(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '/' => out.push_str("\\/"),
            '\\' => out.push_str("\\\\"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) <= 0x1F => push_unit(out, c as u32),
            c if (c as u32) >= 0x1_0000 => {
                let v = c as u32 - 0x1_0000;
                push_unit(out, 0xD800 + (v >> 10));
                push_unit(out, 0xDC00 + (v & 0x3FF));
            }
            c => out.push(c),
        }
    }
}

fn push_unit(out: &mut String, unit: u32) {
    // Writing to a String cannot fail
    let _ = write!(out, "\\u{unit:04X}");
}

/// Decode the escapes in a string literal body.
///
/// Surrogate pairs written as two adjacent `\u` escapes are recombined into
/// one scalar value; a surrogate without its partner is an error.
pub fn unescape(s: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().enumerate();

    while let Some((index, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let fail = |kind| EscapeError { kind, index };
        let (_, escaped) = chars
            .next()
            .ok_or_else(|| fail(EscapeErrorKind::DanglingBackslash))?;
        let decoded = match escaped {
            '"' => '"',
            '/' => '/',
            '\\' => '\\',
            'b' => '\x08',
            'f' => '\x0C',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                let unit = read_hex4(&mut chars).map_err(fail)?;
                match unit {
                    0xD800..=0xDBFF => {
                        let low = read_low_surrogate(&mut chars)
                            .ok_or_else(|| fail(EscapeErrorKind::UnpairedSurrogate(unit)))?;
                        let scalar = 0x1_0000
                            + ((u32::from(unit) - 0xD800) << 10)
                            + (u32::from(low) - 0xDC00);
                        char::from_u32(scalar)
                            .ok_or_else(|| fail(EscapeErrorKind::UnpairedSurrogate(unit)))?
                    }
                    0xDC00..=0xDFFF => return Err(fail(EscapeErrorKind::UnpairedSurrogate(unit))),
                    _ => char::from_u32(u32::from(unit))
                        .ok_or_else(|| fail(EscapeErrorKind::UnpairedSurrogate(unit)))?,
                }
            }
            other => return Err(fail(EscapeErrorKind::UnknownEscape(other))),
        };
        out.push(decoded);
    }

    Ok(out)
}

/// Read exactly four hex digits after `\u`.
fn read_hex4<I>(chars: &mut I) -> Result<u16, EscapeErrorKind>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut seen = String::with_capacity(4);
    let mut value: u16 = 0;
    for _ in 0..4 {
        let Some((_, c)) = chars.next() else {
            return Err(EscapeErrorKind::MalformedUnicode(seen));
        };
        seen.push(c);
        let Some(digit) = c.to_digit(16) else {
            return Err(EscapeErrorKind::MalformedUnicode(seen));
        };
        value = (value << 4) | digit as u16;
    }
    Ok(value)
}

/// Consume a `\uDC00`-`\uDFFF` escape if one comes next.
fn read_low_surrogate<I>(chars: &mut I) -> Option<u16>
where
    I: Iterator<Item = (usize, char)> + Clone,
{
    // Look ahead on a copy so a non-surrogate escape is left for the caller
    let mut ahead = chars.clone();
    if ahead.next()?.1 != '\\' || ahead.next()?.1 != 'u' {
        return None;
    }
    let low = read_hex4(&mut ahead).ok()?;
    if !(0xDC00..=0xDFFF).contains(&low) {
        return None;
    }
    *chars = ahead;
    Some(low)
}
