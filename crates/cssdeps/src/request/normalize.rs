use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::request::is_native_win32_path;

static ESCAPED_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(?:\n|\r\n|\r|\x0c)").unwrap());

/// Characters `decodeURI` leaves percent-encoded.
const RESERVED: &[u8] = b";/?:@&=+$,#";

fn is_css_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

/// Normalize a URL as written in a stylesheet into the text used for
/// classification and resolution.
///
/// Surrounding whitespace is trimmed, escaped newlines inside strings are
/// dropped, CSS escapes are decoded and percent-encoding is decoded with
/// `decodeURI` rules. Windows paths are only trimmed. Malformed
/// percent-encoding leaves the text as it was after unescaping.
pub fn normalize_url(
    url: &str,
    is_string_value: bool,
) -> String {
    let mut normalized = Cow::Borrowed(url.trim_matches(is_css_whitespace));

    if is_string_value && ESCAPED_NEWLINE.is_match(&normalized) {
        normalized = Cow::Owned(ESCAPED_NEWLINE.replace_all(&normalized, "").into_owned());
    }

    if is_native_win32_path(url.trim_matches(is_css_whitespace)) {
        return normalized.into_owned();
    }

    let unescaped = unescape_css(&normalized);
    match decode_uri(&unescaped) {
        Some(decoded) => decoded.into_owned(),
        None => unescaped.into_owned(),
    }
}

/// Decode CSS escapes: `\` followed by up to six hex digits (and one
/// optional whitespace character), or `\` followed by any other character.
pub fn unescape_css(input: &str) -> Cow<'_, str> {
    if !input.contains('\\') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let mut hex = String::new();
        while hex.len() < 6
            && let Some(&next) = chars.peek()
            && next.is_ascii_hexdigit()
        {
            hex.push(next);
            chars.next();
        }

        if hex.is_empty() {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            }
            continue;
        }

        if chars.peek().is_some_and(|next| is_css_whitespace(*next)) {
            chars.next();
        }
        let decoded = u32::from_str_radix(&hex, 16)
            .ok()
            .filter(|code| *code != 0)
            .and_then(char::from_u32)
            .unwrap_or('\u{FFFD}');
        out.push(decoded);
    }
    Cow::Owned(out)
}

fn percent_byte(
    bytes: &[u8],
    at: usize,
) -> Option<u8> {
    if bytes.get(at) != Some(&b'%') {
        return None;
    }
    let high = (*bytes.get(at + 1)? as char).to_digit(16)?;
    let low = (*bytes.get(at + 2)? as char).to_digit(16)?;
    Some((high * 16 + low) as u8)
}

fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Percent-decode with `decodeURI` semantics. Returns `None` for malformed
/// escapes or invalid UTF-8, in which case callers keep the input.
pub fn decode_uri(input: &str) -> Option<Cow<'_, str>> {
    if !input.contains('%') {
        return Some(Cow::Borrowed(input));
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut pos = 0;
    while pos < bytes.len() {
        if bytes[pos] != b'%' {
            out.push(bytes[pos]);
            pos += 1;
            continue;
        }

        let lead = percent_byte(bytes, pos)?;
        if lead < 0x80 {
            if RESERVED.contains(&lead) {
                out.extend_from_slice(&bytes[pos..pos + 3]);
            } else {
                out.push(lead);
            }
            pos += 3;
            continue;
        }

        let width = utf8_width(lead)?;
        let mut sequence = vec![lead];
        for k in 1..width {
            let next = percent_byte(bytes, pos + 3 * k)?;
            if next & 0xC0 != 0x80 {
                return None;
            }
            sequence.push(next);
        }
        std::str::from_utf8(&sequence).ok()?;
        out.extend_from_slice(&sequence);
        pos += 3 * width;
    }

    String::from_utf8(out).ok().map(Cow::Owned)
}

#[cfg(test)]
#[path = "../../tests/src/request/normalize_tests.rs"]
mod tests;
