// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP String Decoding
//!
//! ISO 10303-21 string literals escape everything beyond basic ASCII:
//! `''` for a quote, `\\` for a backslash, `\S\c` for the ISO 8859 upper
//! half, `\X\hh` for a raw byte, and `\X2\..\X0\` / `\X4\..\X0\` runs of
//! UTF-16 / UTF-32 code units. Decoding is best-effort: a malformed escape
//! passes through literally instead of failing the whole literal.

/// Decode the raw interior of a `'...'` literal into text.
pub fn decode_string(raw: &str) -> String {
    if !raw.contains('\'') && !raw.contains('\\') {
        return raw.to_string();
    }
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut run = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                out.push_str(&raw[run..i]);
                out.push('\'');
                // Doubled quote inside the literal. A lone quote only shows
                // up when the caller isolated the interior, keep it as-is.
                i += if bytes.get(i + 1) == Some(&b'\'') { 2 } else { 1 };
                run = i;
            }
            b'\\' => {
                out.push_str(&raw[run..i]);
                i += decode_escape(&bytes[i..], &mut out);
                run = i;
            }
            _ => i += 1,
        }
    }
    out.push_str(&raw[run..]);
    out
}

/// Escape text for embedding in a `'...'` literal.
///
/// Quotes are doubled and backslashes self-escaped; everything else passes
/// through, so `decode_string(&encode_string(s)) == s` for any `s`.
pub fn encode_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decode one escape starting at the backslash, returning bytes consumed.
/// Unrecognized forms emit the backslash literally and consume only it.
fn decode_escape(bytes: &[u8], out: &mut String) -> usize {
    match bytes.get(1) {
        Some(b'\\') => {
            out.push('\\');
            2
        }
        Some(b'S') if bytes.get(2) == Some(&b'\\') && bytes.len() > 3 => {
            // \S\c maps to the upper half of ISO 8859-1
            out.push(char::from(bytes[3].wrapping_add(128)));
            4
        }
        Some(b'X') => match bytes.get(2) {
            Some(b'\\') => {
                if let (Some(hi), Some(lo)) = (
                    bytes.get(3).copied().and_then(hex_val),
                    bytes.get(4).copied().and_then(hex_val),
                ) {
                    out.push(char::from(hi << 4 | lo));
                    5
                } else {
                    out.push('\\');
                    1
                }
            }
            Some(b'2') if bytes.get(3) == Some(&b'\\') => decode_wide(bytes, out, 4),
            Some(b'4') if bytes.get(3) == Some(&b'\\') => decode_wide(bytes, out, 8),
            _ => {
                out.push('\\');
                1
            }
        },
        _ => {
            out.push('\\');
            1
        }
    }
}

/// Decode a `\X2\` or `\X4\` run (code units of `width` hex digits each)
/// terminated by `\X0\`.
fn decode_wide(bytes: &[u8], out: &mut String, width: usize) -> usize {
    let mut units: Vec<u32> = Vec::new();
    let mut i = 4;
    loop {
        if bytes[i.min(bytes.len())..].starts_with(b"\\X0\\") {
            i += 4;
            break;
        }
        let mut unit: u32 = 0;
        for k in 0..width {
            match bytes.get(i + k).copied().and_then(hex_val) {
                Some(h) => unit = unit << 4 | h as u32,
                None => {
                    // Truncated or junk run, fall back to a literal backslash
                    out.push('\\');
                    return 1;
                }
            }
        }
        units.push(unit);
        i += width;
    }
    if width == 4 {
        let code_units = units.iter().map(|&u| u as u16);
        for decoded in char::decode_utf16(code_units) {
            out.push(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
        }
    } else {
        for &unit in &units {
            out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
    }
    i
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_passthrough() {
        assert_eq!(decode_string("Wall-01"), "Wall-01");
        assert_eq!(decode_string(""), "");
    }

    #[test]
    fn test_doubled_quote() {
        assert_eq!(decode_string("it''s"), "it's");
        assert_eq!(decode_string("''"), "'");
    }

    #[test]
    fn test_backslash_escape() {
        assert_eq!(decode_string(r"C:\\temp"), r"C:\temp");
    }

    #[test]
    fn test_s_escape_latin1() {
        // \S\D = 'D' (0x44) + 0x80 = 0xC4 = 'Ä'
        assert_eq!(decode_string(r"\S\Dach"), "Äach");
    }

    #[test]
    fn test_x_escape_byte() {
        assert_eq!(decode_string(r"\X\E9t\X\E9"), "été");
    }

    #[test]
    fn test_x2_run() {
        assert_eq!(decode_string(r"\X2\00C40042\X0\"), "ÄB");
    }

    #[test]
    fn test_x2_surrogate_pair() {
        assert_eq!(decode_string(r"\X2\D83DDE00\X0\"), "😀");
    }

    #[test]
    fn test_x4_run() {
        assert_eq!(decode_string(r"\X4\0001F600\X0\"), "😀");
    }

    #[test]
    fn test_malformed_escape_passes_through() {
        assert_eq!(decode_string(r"\Q"), r"\Q");
        assert_eq!(decode_string(r"a\X2\12zz"), r"a\X2\12zz");
        assert_eq!(decode_string(r"end\"), r"end\");
    }

    #[test]
    fn test_encode_round_trip() {
        let original = r"it's a C:\path with 'quotes'";
        assert_eq!(decode_string(&encode_string(original)), original);
    }
}
