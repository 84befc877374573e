// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text Cursor - Token reader over in-memory entity text
//!
//! Classifies tokens byte-by-byte without allocating; payload decoding only
//! happens in the `take_*` readers. Whitespace, commas and `/* */` comments
//! are separators and never surface as tokens.

use crate::error::{Error, Result};
use crate::strings::decode_string;
use crate::token::{TokenCursor, TokenKind};

/// One classified-but-unconsumed token
#[derive(Debug, Clone, Copy)]
struct Pending {
    kind: TokenKind,
    /// Byte offset just past the token
    end: usize,
    /// Payload span within the text (interior of quotes/dots, digits of a ref)
    payload: (usize, usize),
}

/// [`TokenCursor`] over a borrowed argument region.
///
/// The cursor owns no text; offsets reported in errors and
/// [`offset`](TokenCursor::offset) are relative to the slice it was created
/// over.
pub struct TextCursor<'a> {
    text: &'a str,
    start: usize,
    pos: usize,
    pending: Option<Pending>,
}

impl<'a> TextCursor<'a> {
    /// Create a cursor positioned at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            start: 0,
            pos: 0,
            pending: None,
        }
    }

    /// Rewind to the position the cursor was created at.
    pub fn reset(&mut self) {
        self.pos = self.start;
        self.pending = None;
    }

    /// Skip whitespace, commas and `/* */` comments.
    fn skip_separators(&mut self) {
        let bytes = self.text.as_bytes();
        let len = bytes.len();
        while self.pos < len {
            let b = bytes[self.pos];
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else if b == b'/' && bytes.get(self.pos + 1) == Some(&b'*') {
                self.pos = skip_comment(bytes, self.pos);
            } else {
                break;
            }
        }
    }

    /// Classify the token at `self.pos`. Caller guarantees `pos < len` and
    /// that separators are already skipped.
    fn classify(&self) -> Pending {
        let bytes = self.text.as_bytes();
        let len = bytes.len();
        let pos = self.pos;
        match bytes[pos] {
            b';' => punct(TokenKind::LineEnd, pos),
            b'(' => punct(TokenKind::SetBegin, pos),
            b')' => punct(TokenKind::SetEnd, pos),
            b'$' => punct(TokenKind::Empty, pos),
            b'\'' => self.classify_string(pos),
            b'#' => {
                let mut end = pos + 1;
                while end < len && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                Pending {
                    kind: TokenKind::Reference,
                    end,
                    payload: (pos + 1, end),
                }
            }
            b'.' => match bytes.get(pos + 1) {
                Some(b) if b.is_ascii_alphabetic() || *b == b'_' => self.classify_enum(pos),
                Some(b) if b.is_ascii_digit() || *b == b'+' || *b == b'-' => {
                    self.classify_number(pos)
                }
                _ => punct(TokenKind::Unknown, pos),
            },
            b'0'..=b'9' | b'+' | b'-' => self.classify_number(pos),
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let mut end = pos + 1;
                while end < len && is_ident_byte(bytes[end]) {
                    end += 1;
                }
                Pending {
                    kind: TokenKind::Label,
                    end,
                    payload: (pos, end),
                }
            }
            _ => punct(TokenKind::Unknown, pos),
        }
    }

    /// Quoted literal; `''` doubling keeps the scan inside the literal.
    /// An unterminated literal runs to end of input.
    fn classify_string(&self, pos: usize) -> Pending {
        let bytes = self.text.as_bytes();
        let len = bytes.len();
        let mut i = pos + 1;
        loop {
            match memchr::memchr(b'\'', &bytes[i..]) {
                Some(offset) => {
                    let quote = i + offset;
                    if bytes.get(quote + 1) == Some(&b'\'') {
                        i = quote + 2;
                    } else {
                        return Pending {
                            kind: TokenKind::StringLiteral,
                            end: quote + 1,
                            payload: (pos + 1, quote),
                        };
                    }
                }
                None => {
                    return Pending {
                        kind: TokenKind::StringLiteral,
                        end: len,
                        payload: (pos + 1, len),
                    };
                }
            }
        }
    }

    /// `.NAME.` with the payload between the dots. A missing closing dot
    /// ends the token at the identifier run.
    fn classify_enum(&self, pos: usize) -> Pending {
        let bytes = self.text.as_bytes();
        let len = bytes.len();
        let mut i = pos + 1;
        while i < len && is_ident_byte(bytes[i]) {
            i += 1;
        }
        let end = if i < len && bytes[i] == b'.' { i + 1 } else { i };
        Pending {
            kind: TokenKind::Enum,
            end,
            payload: (pos + 1, i),
        }
    }

    /// Greedy numeric run; the split between Real and Integer is purely
    /// shape-based, decoding validates later.
    fn classify_number(&self, pos: usize) -> Pending {
        let bytes = self.text.as_bytes();
        let len = bytes.len();
        let mut end = pos + 1;
        while end < len
            && matches!(bytes[end], b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-')
        {
            end += 1;
        }
        let run = &bytes[pos..end];
        let kind = if run
            .iter()
            .any(|&b| b == b'.' || b == b'e' || b == b'E')
        {
            TokenKind::Real
        } else {
            TokenKind::Integer
        };
        Pending {
            kind,
            end,
            payload: (pos, end),
        }
    }

    /// Peek and hand the pending token out by value.
    fn pending_or_peek(&mut self) -> Option<Pending> {
        self.peek_kind();
        self.pending
    }

    /// Require the pending token to have `expected` kind; consumes nothing.
    fn require(&mut self, expected: TokenKind) -> Result<Pending> {
        match self.pending_or_peek() {
            Some(p) if p.kind == expected => Ok(p),
            Some(p) => Err(Error::OutOfPhase {
                expected,
                found: p.kind,
            }),
            None => Err(Error::Exhausted(expected)),
        }
    }

    /// Consume the pending token.
    fn consume(&mut self, end: usize) {
        self.pos = end;
        self.pending = None;
    }

    fn payload_str(&self, pending: &Pending) -> &'a str {
        &self.text[pending.payload.0..pending.payload.1]
    }
}

impl TokenCursor for TextCursor<'_> {
    fn peek_kind(&mut self) -> Option<TokenKind> {
        if let Some(pending) = &self.pending {
            return Some(pending.kind);
        }
        self.skip_separators();
        if self.pos >= self.text.len() {
            return None;
        }
        let pending = self.classify();
        let kind = pending.kind;
        self.pending = Some(pending);
        Some(kind)
    }

    fn advance(&mut self) {
        if let Some(pending) = self.pending_or_peek() {
            self.consume(pending.end);
        }
    }

    fn take_text(&mut self) -> Result<String> {
        let pending = self.require(TokenKind::StringLiteral)?;
        let decoded = decode_string(self.payload_str(&pending));
        self.consume(pending.end);
        Ok(decoded)
    }

    fn take_name(&mut self) -> Result<String> {
        match self.pending_or_peek() {
            Some(p) if matches!(p.kind, TokenKind::Label | TokenKind::Enum) => {
                let name = self.payload_str(&p).to_string();
                self.consume(p.end);
                Ok(name)
            }
            Some(p) => Err(Error::OutOfPhase {
                expected: TokenKind::Label,
                found: p.kind,
            }),
            None => Err(Error::Exhausted(TokenKind::Label)),
        }
    }

    fn take_real(&mut self) -> Result<f64> {
        let pending = self.require(TokenKind::Real)?;
        let offset = self.pos;
        let text = self.payload_str(&pending);
        self.consume(pending.end);
        match fast_float::parse_partial::<f64, _>(text) {
            Ok((value, consumed)) if consumed == text.len() => Ok(value),
            _ => Err(Error::MalformedPayload {
                kind: TokenKind::Real,
                text: text.to_string(),
                offset,
            }),
        }
    }

    fn take_integer(&mut self) -> Result<i64> {
        let pending = self.require(TokenKind::Integer)?;
        let offset = self.pos;
        let text = self.payload_str(&pending);
        self.consume(pending.end);
        lexical_core::parse::<i64>(text.as_bytes()).map_err(|_| Error::MalformedPayload {
            kind: TokenKind::Integer,
            text: text.to_string(),
            offset,
        })
    }

    fn take_ref(&mut self) -> Result<u32> {
        let pending = self.require(TokenKind::Reference)?;
        let offset = self.pos;
        let text = self.payload_str(&pending);
        self.consume(pending.end);
        lexical_core::parse::<u32>(text.as_bytes()).map_err(|_| Error::MalformedPayload {
            kind: TokenKind::Reference,
            text: text.to_string(),
            offset,
        })
    }

    fn at_end(&self) -> bool {
        if self.pending.is_some() {
            return false;
        }
        // Only separators may remain
        let bytes = self.text.as_bytes();
        let len = bytes.len();
        let mut pos = self.pos;
        while pos < len {
            let b = bytes[pos];
            if b.is_ascii_whitespace() || b == b',' {
                pos += 1;
            } else if b == b'/' && bytes.get(pos + 1) == Some(&b'*') {
                pos = skip_comment(bytes, pos);
            } else {
                return false;
            }
        }
        true
    }

    fn offset(&self) -> usize {
        self.pos
    }
}

#[inline]
fn punct(kind: TokenKind, pos: usize) -> Pending {
    Pending {
        kind,
        end: pos + 1,
        payload: (pos, pos + 1),
    }
}

#[inline]
fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Skip past a `/* */` comment starting at `pos`; an unterminated comment
/// swallows the rest of the input.
pub(crate) fn skip_comment(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos + 2;
    while let Some(offset) = memchr::memchr(b'*', &bytes[i..]) {
        let star = i + offset;
        if bytes.get(star + 1) == Some(&b'/') {
            return star + 2;
        }
        i = star + 1;
    }
    bytes.len()
}
