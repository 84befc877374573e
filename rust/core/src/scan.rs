// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line Scanner and Index
//!
//! Locates `#id=TYPENAME(...)` instance lines inside whole-file content
//! without parsing any argument. The terminator search is quote- and
//! comment-aware, so a `;` inside a string literal never cuts a line short.

use crate::cursor::skip_comment;
use crate::schema::{TypeCode, TypeRegistry};
use rustc_hash::FxHashMap;

/// One located instance line, arguments still unparsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScannedLine<'a> {
    pub id: u32,
    /// Raw type name as the file spells it
    pub type_name: &'a str,
    /// Offset of the first argument token, just past the opening paren
    pub args_offset: usize,
    /// Offset of the `#`
    pub start: usize,
    /// Just past the terminating `;`, or end of content on a truncated tail
    pub end: usize,
}

/// Index entry for one instance line
#[derive(Debug, Clone, Copy)]
pub struct IndexedLine {
    pub start: usize,
    pub end: usize,
    pub args_offset: usize,
    pub type_code: TypeCode,
}

/// Pre-built line index type
pub type LineIndex = FxHashMap<u32, IndexedLine>;

/// Fast line scanner - locates instance lines without parsing arguments
pub struct LineScanner<'a> {
    content: &'a str,
    position: usize,
}

impl<'a> LineScanner<'a> {
    /// Create a new scanner
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            position: 0,
        }
    }

    /// Scan for the next instance line
    pub fn next_line(&mut self) -> Option<ScannedLine<'a>> {
        let bytes = self.content.as_bytes();
        let len = bytes.len();
        while self.position < len {
            let hash = match memchr::memchr(b'#', &bytes[self.position..]) {
                Some(offset) => self.position + offset,
                None => {
                    self.position = len;
                    return None;
                }
            };
            // Candidate. On any shape mismatch, rescan past the '#'
            // (hashes also show up inside header strings).
            self.position = hash + 1;

            let mut pos = hash + 1;
            let id_start = pos;
            while pos < len && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == id_start {
                continue;
            }
            let id = parse_u32_inline(bytes, id_start, pos);

            // Handles both `#45=` and `#45 = ` forms
            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos >= len || bytes[pos] != b'=' {
                continue;
            }
            pos += 1;
            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }

            let type_start = pos;
            while pos < len && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            if pos == type_start {
                continue;
            }
            let type_end = pos;

            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos >= len || bytes[pos] != b'(' {
                continue;
            }
            let args_offset = pos + 1;

            let end = find_line_end(bytes, args_offset);
            self.position = end;
            return Some(ScannedLine {
                id,
                type_name: &self.content[type_start..type_end],
                args_offset,
                start: hash,
                end,
            });
        }
        None
    }

    /// Find all lines of a specific type
    pub fn find_by_type(&mut self, target_type: &str) -> Vec<ScannedLine<'a>> {
        let mut results = Vec::new();
        while let Some(line) = self.next_line() {
            if line.type_name.eq_ignore_ascii_case(target_type) {
                results.push(line);
            }
        }
        results
    }

    /// Count lines by type
    pub fn count_by_type(&mut self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        while let Some(line) = self.next_line() {
            *counts.entry(line.type_name.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Reset scanner to beginning
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

/// Build the line index in one pass, interning every type name seen.
pub fn build_line_index(content: &str, registry: &mut TypeRegistry) -> LineIndex {
    // Pre-allocate with estimated capacity (roughly 1 line per 50 bytes)
    let estimated_lines = content.len() / 50;
    let mut index = FxHashMap::with_capacity_and_hasher(estimated_lines, Default::default());

    let mut scanner = LineScanner::new(content);
    while let Some(line) = scanner.next_line() {
        let type_code = registry.register(line.type_name);
        index.insert(
            line.id,
            IndexedLine {
                start: line.start,
                end: line.end,
                args_offset: line.args_offset,
                type_code,
            },
        );
    }
    index
}

/// Fast u32 parsing without string allocation
#[inline]
fn parse_u32_inline(bytes: &[u8], start: usize, end: usize) -> u32 {
    let mut result: u32 = 0;
    for &byte in &bytes[start..end] {
        let digit = byte.wrapping_sub(b'0');
        result = result.wrapping_mul(10).wrapping_add(digit as u32);
    }
    result
}

/// Offset just past the `;` that terminates the line, ignoring semicolons
/// inside string literals and comments. A truncated tail runs to the end.
fn find_line_end(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() {
        match memchr::memchr3(b';', b'\'', b'/', &bytes[i..]) {
            Some(offset) => {
                let p = i + offset;
                match bytes[p] {
                    b';' => return p + 1,
                    b'\'' => i = skip_string(bytes, p),
                    _ => {
                        if bytes.get(p + 1) == Some(&b'*') {
                            i = skip_comment(bytes, p);
                        } else {
                            i = p + 1;
                        }
                    }
                }
            }
            None => break,
        }
    }
    bytes.len()
}

/// Offset just past the closing quote, honoring `''` doubling.
fn skip_string(bytes: &[u8], open: usize) -> usize {
    let mut i = open + 1;
    loop {
        match memchr::memchr(b'\'', &bytes[i..]) {
            Some(offset) => {
                let quote = i + offset;
                if bytes.get(quote + 1) == Some(&b'\'') {
                    i = quote + 2;
                } else {
                    return quote + 1;
                }
            }
            None => return bytes.len(),
        }
    }
}
