//! Value quoting as used by `LIST VAR` responses.
//!
//! upsd wraps every variable value in double quotes and escapes embedded
//! quotes and backslashes with a backslash. Unquoting also accepts the usual
//! C-style escapes so values from other server implementations decode too.

use crate::error::{NutError, Result};

/// Quote a value the way upsd does.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Remove the surrounding double quotes from `raw` and resolve escapes.
///
/// Fails when the quotes are missing, when an unescaped quote or newline
/// appears inside the value, or on a malformed escape sequence.
pub fn unquote(raw: &str) -> Result<String> {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| NutError::protocol_error(format!("value is not quoted: {raw}")))?;

    if !inner.contains(['\\', '"', '\n']) {
        return Ok(inner.to_string());
    }

    let invalid = || NutError::protocol_error(format!("invalid quoted value: {raw}"));
    let bytes = inner.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\n' => return Err(invalid()),
            b'\\' => {
                let esc = *bytes.get(i + 1).ok_or_else(invalid)?;
                i += 2;
                match esc {
                    b'"' => out.push(b'"'),
                    b'\\' => out.push(b'\\'),
                    b'a' => out.push(0x07),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'v' => out.push(0x0b),
                    b'x' => {
                        let v = hex_value(bytes.get(i..i + 2).ok_or_else(invalid)?)
                            .ok_or_else(invalid)?;
                        out.push(v as u8);
                        i += 2;
                    }
                    b'u' | b'U' => {
                        let len = if esc == b'u' { 4 } else { 8 };
                        let ch = hex_value(bytes.get(i..i + len).ok_or_else(invalid)?)
                            .and_then(char::from_u32)
                            .ok_or_else(invalid)?;
                        let mut buf = [0u8; 4];
                        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                        i += len;
                    }
                    b'0'..=b'7' => {
                        let digits = bytes.get(i - 1..i + 2).ok_or_else(invalid)?;
                        let mut v: u32 = 0;
                        for d in digits {
                            if !(b'0'..=b'7').contains(d) {
                                return Err(invalid());
                            }
                            v = v * 8 + u32::from(d - b'0');
                        }
                        if v > 0xff {
                            return Err(invalid());
                        }
                        out.push(v as u8);
                        i += 2;
                    }
                    _ => return Err(invalid()),
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| invalid())
}

fn hex_value(digits: &[u8]) -> Option<u32> {
    let text = std::str::from_utf8(digits).ok()?;
    if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(text, 16).ok()
}
