//! Recognises `Text("...")` operands in descumm listings and decodes the
//! escape syntax descumm uses for them.
//!
//! Only two escapes exist: `\\` for a literal backslash and `\xHH` for an
//! arbitrary byte. Anything else means the listing came from a descumm
//! whose output format this decoder does not understand.

use thiserror::Error;

const TEXT_OPEN: &str = "Text(\"";
const TEXT_CLOSE: &str = "\")";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscapeError {
    #[error("unexpected escape code {found:?} at position {position}")]
    UnknownEscape { position: usize, found: char },

    #[error("expected two hex digits after \\x at position {position}")]
    BadHexEscape { position: usize },

    #[error("dangling backslash at position {position}")]
    TrailingBackslash { position: usize },
}

/// Returns the raw payloads of every `Text("...")` token, in order.
///
/// A payload ends at the first double quote that is not part of an escape
/// and must be followed by `)`. Empty payloads carry nothing to translate
/// and are skipped.
pub fn scan_text_payloads(listing: &str) -> Vec<&str> {
    let mut payloads = Vec::new();
    let mut rest = listing;

    while let Some(start) = rest.find(TEXT_OPEN) {
        let body = &rest[start + TEXT_OPEN.len()..];
        match payload_len(body) {
            Some(len) if body[len..].starts_with(TEXT_CLOSE) => {
                if len > 0 {
                    payloads.push(&body[..len]);
                }
                rest = &body[len + TEXT_CLOSE.len()..];
            }
            Some(_) => rest = body,
            None => break,
        }
    }

    payloads
}

/// Length in bytes up to the closing unescaped quote.
fn payload_len(body: &str) -> Option<usize> {
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

pub fn unescape(payload: &str) -> Result<Vec<u8>, EscapeError> {
    let bytes = payload.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'\\' {
            out.push(bytes[pos]);
            pos += 1;
            continue;
        }

        match bytes.get(pos + 1) {
            Some(b'\\') => {
                out.push(b'\\');
                pos += 2;
            }
            Some(b'x') => {
                let value = bytes
                    .get(pos + 2..pos + 4)
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                    .ok_or(EscapeError::BadHexEscape { position: pos })?;
                out.push(value);
                pos += 4;
            }
            Some(_) => {
                let found = payload[pos + 1..].chars().next().unwrap_or('\u{FFFD}');
                return Err(EscapeError::UnknownEscape {
                    position: pos,
                    found,
                });
            }
            None => return Err(EscapeError::TrailingBackslash { position: pos }),
        }
    }

    Ok(out)
}

/// Inverse of [`unescape`]: doubles backslashes and hex-escapes every byte
/// outside printable ASCII. Also keeps `"` escaped so the result can be
/// embedded back into a `Text("...")` token.
pub fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\x22"),
            0x20..=0x7e => out.push(char::from(b)),
            _ => out.push_str(&format!("\\x{b:02X}")),
        }
    }
    out
}
