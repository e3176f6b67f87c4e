//! Low-level scanners for canonical type ids.
//!
//! Type ids nest three bracket kinds and may embed quoted struct tags whose
//! text contains brackets, quotes and separators of its own. Every scanner
//! here skips quoted spans (honoring backslash escapes) and tracks bracket
//! depth before treating a character as structural.

use typex_types::{Error, Result};

use crate::quote::unquote;

/// A balanced bracket span inside an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracketed<'a> {
    /// Text strictly between the brackets.
    pub inner: &'a str,
    /// Byte offset of the opening bracket.
    pub open: usize,
    /// Byte offset of the matching closing bracket.
    pub close: usize,
}

fn closer(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Find the first balanced `open` pair in `id`.
///
/// Returns `Ok(None)` when `id` has no `open` bracket outside quotes.
pub fn bracketed(id: &str, open: char) -> Result<Option<Bracketed<'_>>> {
    let close = closer(open)
        .ok_or_else(|| Error::malformed(id, format!("invalid bracket {:?}", open)))?;

    let bytes = id.as_bytes();
    let (mut start, mut depth, mut quoted) = (None, 0usize, false);
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            '\\' => i += 1,
            '"' => quoted = !quoted,
            _ if quoted => {}
            _ if c == open => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            _ if c == close => {
                let Some(open_at) = start.filter(|_| depth > 0) else {
                    return Err(Error::malformed(id, format!("unbalanced {:?}", close)));
                };
                depth -= 1;
                if depth == 0 {
                    return Ok(Some(Bracketed {
                        inner: &id[open_at + 1..i],
                        open: open_at,
                        close: i,
                    }));
                }
            }
            _ => {}
        }
        i += 1;
    }
    match start {
        Some(_) => Err(Error::malformed(id, format!("unbalanced {:?}", open))),
        None => Ok(None),
    }
}

/// Split `id` on `sep`, ignoring separators nested inside any bracket kind or
/// inside a quoted span. Parts are trimmed.
///
/// `sep` must be one of `,` `;` or space. With `,` and `;` an empty part is
/// malformed; with space, runs of spaces are collapsed.
pub fn separate(id: &str, sep: char) -> Result<Vec<&str>> {
    if !matches!(sep, ',' | ';' | ' ') {
        return Err(Error::malformed(id, format!("invalid separator {:?}", sep)));
    }
    let mut parts = Vec::new();
    if id.trim().is_empty() {
        return Ok(parts);
    }

    let bytes = id.as_bytes();
    let (mut paren, mut square, mut curly) = (0i32, 0i32, 0i32);
    let mut quoted = false;
    let mut part_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            '\\' => i += 1,
            '"' => quoted = !quoted,
            _ if quoted => {}
            '(' => paren += 1,
            ')' => paren -= 1,
            '[' => square += 1,
            ']' => square -= 1,
            '{' => curly += 1,
            '}' => curly -= 1,
            _ if c == sep && paren == 0 && square == 0 && curly == 0 => {
                push_part(&mut parts, id, &id[part_start..i], sep)?;
                part_start = i + 1;
            }
            _ => {}
        }
        if paren < 0 || square < 0 || curly < 0 {
            return Err(Error::malformed(id, format!("unbalanced {:?}", c)));
        }
        i += 1;
    }
    if quoted {
        return Err(Error::malformed(id, "unterminated quoted string"));
    }
    if paren != 0 || square != 0 || curly != 0 {
        return Err(Error::malformed(id, "unclosed bracket"));
    }
    push_part(&mut parts, id, &id[part_start.min(id.len())..], sep)?;
    Ok(parts)
}

fn push_part<'a>(parts: &mut Vec<&'a str>, id: &str, part: &'a str, sep: char) -> Result<()> {
    let part = part.trim();
    if part.is_empty() {
        if sep == ' ' {
            return Ok(());
        }
        return Err(Error::malformed(id, format!("empty element between {:?}", sep)));
    }
    parts.push(part);
    Ok(())
}

/// The pieces of one struct field entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldParts<'a> {
    /// Declared name, or the promoted name given by `Name = Type`.
    /// `None` for a plain embedded field.
    pub name: Option<&'a str>,
    pub ty: &'a str,
    pub tag: String,
    pub embedded: bool,
}

/// Split a struct field entry into name, type text and tag.
///
/// Accepted shapes:
/// - `Type` (embedded)
/// - `Name Type`
/// - `Name = Type` (embedded instantiated generic, promoted as `Name`)
/// - any of the above followed by a quoted tag
///
/// A package-qualified field name (`path/to/pkg.name`) is reduced to `name`.
pub fn field_info(f: &str) -> Result<FieldParts<'_>> {
    let f = f.trim();
    let (rest, tag) = match trailing_quoted(f) {
        Some(open) => {
            let tag = unquote(&f[open..]).map_err(|reason| Error::malformed(f, reason))?;
            (f[..open].trim_end(), tag)
        }
        None => (f, String::new()),
    };

    let parts = separate(rest, ' ')?;
    let (name, ty, embedded) = match parts.as_slice() {
        [] => return Err(Error::malformed(f, "empty field")),
        [ty] => (None, *ty, true),
        [name, "=", ty] => (Some(*name), *ty, true),
        [name, ..] => {
            let ty = rest[name.len()..].trim();
            (Some(*name), ty, false)
        }
    };
    let name = name.map(|n| match n.rfind('.') {
        Some(idx) => &n[idx + 1..],
        None => n,
    });
    if name.is_some_and(str::is_empty) {
        return Err(Error::malformed(f, "empty field name"));
    }
    Ok(FieldParts {
        name,
        ty,
        tag,
        embedded,
    })
}

/// Offset of the opening quote when `f` ends with a complete quoted span.
fn trailing_quoted(f: &str) -> Option<usize> {
    if !f.ends_with('"') {
        return None;
    }
    let bytes = f.as_bytes();
    let (mut quoted, mut open, mut last) = (false, 0, None);
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if quoted => i += 1,
            b'"' if quoted => {
                quoted = false;
                last = Some((open, i));
            }
            b'"' => {
                quoted = true;
                open = i;
            }
            _ => {}
        }
        i += 1;
    }
    match last {
        Some((open, close)) if close == bytes.len() - 1 && !quoted => Some(open),
        _ => None,
    }
}
