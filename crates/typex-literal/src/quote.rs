//! Double-quoted string literals as the host language prints struct tags.

use std::fmt::Write as _;

/// Quote `s` using the host's escape rules.
///
/// Printable characters are kept as-is; the usual single-letter escapes are
/// used where they exist and `\xNN` / `\uNNNN` / `\UNNNNNNNN` otherwise.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            c if (c as u32) < 0x80 && c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() && (c as u32) <= 0xffff => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\U{:08x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Reverse of [`quote`]; also accepts back-quoted raw strings.
pub fn unquote(s: &str) -> Result<String, String> {
    if s.len() >= 2 && s.starts_with('`') && s.ends_with('`') {
        let raw = &s[1..s.len() - 1];
        if raw.contains('`') {
            return Err("back quote inside raw string".into());
        }
        return Ok(raw.replace('\r', ""));
    }
    let body = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| format!("{:?} is not a quoted string", s))?;

    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((at, c)) = chars.next() {
        match c {
            '"' => return Err(format!("unescaped quote at offset {}", at)),
            '\n' => return Err("newline in quoted string".into()),
            '\\' => {}
            c => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                continue;
            }
        }
        let Some((_, esc)) = chars.next() else {
            return Err("trailing backslash".into());
        };
        let simple = match esc {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0c),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0b),
            '\\' => Some(b'\\'),
            '"' => Some(b'"'),
            '\'' => Some(b'\''),
            _ => None,
        };
        if let Some(byte) = simple {
            out.push(byte);
            continue;
        }
        match esc {
            'x' => {
                let v = take_digits(&mut chars, 2, 16)?;
                out.push(v as u8);
            }
            '0'..='7' => {
                let rest = take_digits(&mut chars, 2, 8)?;
                let v = (esc as u32 - '0' as u32) * 64 + rest;
                if v > 0xff {
                    return Err(format!("octal escape \\{:o} out of range", v));
                }
                out.push(v as u8);
            }
            'u' | 'U' => {
                let width = if esc == 'u' { 4 } else { 8 };
                let v = take_digits(&mut chars, width, 16)?;
                let c = char::from_u32(v).ok_or_else(|| format!("invalid code point {:#x}", v))?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            other => return Err(format!("unknown escape \\{}", other)),
        }
    }
    String::from_utf8(out).map_err(|e| format!("escaped bytes are not utf-8: {}", e))
}

fn take_digits(chars: &mut std::str::CharIndices<'_>, n: usize, radix: u32) -> Result<u32, String> {
    let mut v = 0u32;
    for _ in 0..n {
        let d = chars
            .next()
            .and_then(|(_, c)| c.to_digit(radix))
            .ok_or_else(|| format!("expected {} base-{} digits", n, radix))?;
        v = v * radix + d;
    }
    Ok(v)
}
