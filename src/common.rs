//! Byte-level scanners shared by the toolchain around the parser:
//! numeric-prefix recognition, CSS dimension splitting, media-type
//! and `data:` URI parsing, and HTML entity substitution.

use base64::{engine::general_purpose::STANDARD, Engine};
use bstr::{BStr, ByteSlice};
use std::borrow::Cow;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataUriError {
    #[error("not a data URI")]
    BadDataUri,
    #[error("invalid base64 payload")]
    Base64(#[from] base64::DecodeError),
}

/// Length of the longest prefix of `b` that forms a numeric literal:
/// an optional sign, integer and/or fractional digits, and an
/// exponent only when it has digits of its own. A bare trailing dot
/// is not part of the number.
pub fn number(b: &[u8]) -> usize {
    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let mut digits = false;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
        digits = true;
    }
    if i + 1 < b.len() && b[i] == b'.' && b[i + 1].is_ascii_digit() {
        i += 2;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        digits = true;
    }
    if !digits {
        return 0;
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let exponent = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if exponent < j {
            i = j;
        }
    }
    i
}

/// Splits a CSS-style dimension into the lengths of its numeric
/// prefix and its unit (`%` or a run of letters).
pub fn dimension(b: &[u8]) -> (usize, usize) {
    let num = number(b);
    if num == 0 {
        return (0, 0);
    }
    if num < b.len() && b[num] == b'%' {
        return (num, 1);
    }
    let mut unit = 0;
    while num + unit < b.len() && b[num + unit].is_ascii_alphabetic() {
        unit += 1;
    }
    (num, unit)
}

/// Parses an RFC 2045 media type with parameters. Surrounding blanks
/// are trimmed, parameter values may be empty, and anything after the
/// type that is not a `;` parameter list is ignored.
pub fn mediatype(b: &[u8]) -> (&[u8], Vec<(&BStr, &BStr)>) {
    let mut i = 0;
    while i < b.len() && b[i] == b' ' {
        i += 1;
    }
    let start = i;
    while i < b.len() && b[i] != b' ' && b[i] != b';' {
        i += 1;
    }
    let mimetype = &b[start..i];

    let mut params = Vec::new();
    loop {
        while i < b.len() && b[i] == b' ' {
            i += 1;
        }
        if i == b.len() || b[i] != b';' {
            break;
        }
        i += 1;
        while i < b.len() && b[i] == b' ' {
            i += 1;
        }
        let key_start = i;
        while i < b.len() && !matches!(b[i], b' ' | b'=' | b';') {
            i += 1;
        }
        let key = &b[key_start..i];
        while i < b.len() && b[i] == b' ' {
            i += 1;
        }
        let value = if i < b.len() && b[i] == b'=' {
            i += 1;
            while i < b.len() && b[i] == b' ' {
                i += 1;
            }
            let value_start = i;
            while i < b.len() && b[i] != b';' {
                i += 1;
            }
            let mut end = i;
            while value_start < end && b[end - 1] == b' ' {
                end -= 1;
            }
            &b[value_start..end]
        } else {
            &b[..0]
        };
        params.push((key.as_bstr(), value.as_bstr()));
    }
    (mimetype, params)
}

/// Parses a `data:` URI into its media type and payload. The media
/// type defaults to `text/plain`; a `;base64` flag decodes the
/// payload with the standard alphabet.
pub fn data_uri(b: &[u8]) -> Result<(Cow<'_, [u8]>, Cow<'_, [u8]>), DataUriError> {
    let rest = b.strip_prefix(b"data:").ok_or(DataUriError::BadDataUri)?;
    let comma = rest.find_byte(b',').ok_or(DataUriError::BadDataUri)?;
    let meta = &rest[..comma];
    let payload = &rest[comma + 1..];

    let mut in_base64 = false;
    let mut mimetype: &[u8] = b"";
    for (i, segment) in meta.split(|&ch| ch == b';').enumerate() {
        if segment == b"base64" {
            in_base64 = true;
        } else if i == 0 {
            mimetype = segment;
        }
    }
    let mimetype: Cow<'_, [u8]> = if mimetype.is_empty() {
        Cow::Borrowed(&b"text/plain"[..])
    } else {
        Cow::Borrowed(mimetype)
    };
    let data = if in_base64 {
        Cow::Owned(STANDARD.decode(payload)?)
    } else {
        Cow::Borrowed(payload)
    };
    Ok((mimetype, data))
}

// `CounterClockwiseContourIntegral` is the longest entity name in the
// HTML specification.
const MAX_ENTITY_LENGTH: usize = 31;

/// Replaces `&name;`, `&#NNN;` and `&#xHH;` references using the
/// forward map, re-escaping any produced byte present in the reverse
/// map. References without a terminating `;` are left untouched, as
/// are spellings that are already at least as short as their
/// replacement, and replacements that would run into the following
/// text to form a new reference.
pub fn replace_entities<'a>(
    b: &'a [u8],
    entities: &HashMap<&str, &[u8]>,
    rev_entities: &HashMap<u8, &[u8]>,
) -> Cow<'a, [u8]> {
    let mut out = Vec::with_capacity(b.len());
    let mut changed = false;
    let mut i = 0;
    while i < b.len() {
        let c = b[i];
        if c == b'&' {
            if let Some(end) = reference_end(b, i) {
                let name = &b[i + 1..end - 1];
                if name.first() == Some(&b'#') {
                    if let Some(cp) = numeric_reference(&name[1..]) {
                        if cp < 0x100 {
                            push_escaped(&mut out, cp as u8, rev_entities);
                            changed = true;
                        } else {
                            let decimal = format!("&#{};", cp);
                            if decimal.len() < end - i {
                                out.extend_from_slice(decimal.as_bytes());
                                changed = true;
                            } else {
                                // already the shortest spelling
                                out.extend_from_slice(&b[i..end]);
                            }
                        }
                        i = end;
                        continue;
                    }
                } else if let Some(replacement) = std::str::from_utf8(name)
                    .ok()
                    .and_then(|name| entities.get(name))
                {
                    if *replacement == b"&" && reference_shaped(&b[end..]) {
                        // decoding would fuse with the following text
                        // into a new reference
                        out.extend_from_slice(&b[i..end]);
                    } else {
                        for &ch in *replacement {
                            push_escaped(&mut out, ch, rev_entities);
                        }
                        changed = true;
                    }
                    i = end;
                    continue;
                }
            }
        }
        out.push(c);
        i += 1;
    }
    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(b)
    }
}

fn push_escaped(out: &mut Vec<u8>, ch: u8, rev_entities: &HashMap<u8, &[u8]>) {
    if let Some(escape) = rev_entities.get(&ch) {
        out.extend_from_slice(escape);
    } else {
        out.push(ch);
    }
}

/// Position just past the `;` of the reference starting at `amp`, or
/// `None` when no well-formed reference starts there.
fn reference_end(b: &[u8], amp: usize) -> Option<usize> {
    let mut j = amp + 1;
    while j < b.len() && j - amp - 1 <= MAX_ENTITY_LENGTH {
        match b[j] {
            b';' => return if amp + 1 < j { Some(j + 1) } else { None },
            ch if ch.is_ascii_alphanumeric() || ch == b'#' => j += 1,
            _ => return None,
        }
    }
    None
}

/// Whether `rest` begins with text shaped like an entity reference.
fn reference_shaped(rest: &[u8]) -> bool {
    let mut j = 0;
    while j < rest.len() && j <= MAX_ENTITY_LENGTH {
        match rest[j] {
            b';' => return 0 < j,
            ch if ch.is_ascii_alphanumeric() || ch == b'#' => j += 1,
            _ => return false,
        }
    }
    false
}

fn numeric_reference(digits: &[u8]) -> Option<u32> {
    let (digits, radix): (&[u8], u32) = match digits.first() {
        Some(&b'x') | Some(&b'X') => (&digits[1..], 16),
        _ => (digits, 10),
    };
    if digits.is_empty() {
        return None;
    }
    let mut cp: u32 = 0;
    for &ch in digits {
        let digit = (ch as char).to_digit(radix)?;
        cp = cp.saturating_mul(radix).saturating_add(digit);
    }
    Some(cp)
}
