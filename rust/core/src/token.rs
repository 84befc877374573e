// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Token Kinds and the Cursor Seam
//!
//! The argument parser never touches raw text. It drives a [`TokenCursor`], a
//! stateful reader that classifies one pending token at a time and hands out
//! decoded payloads on demand.

use crate::error::Result;
use std::fmt;

/// Lexical classification of one token in an entity instance line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// `;` - end of the instance line
    LineEnd,
    /// `(` - opens an aggregate
    SetBegin,
    /// `)` - closes an aggregate
    SetEnd,
    /// `$` - explicit unset attribute
    Empty,
    /// Bare identifier, the head of a typed aggregate
    Label,
    /// `'...'` quoted literal
    StringLiteral,
    /// `.NAME.` enumeration literal
    Enum,
    /// Floating point number
    Real,
    /// Integer number
    Integer,
    /// `#n` entity instance reference
    Reference,
    /// Anything the cursor cannot classify, e.g. the derived marker `*`
    Unknown,
}

impl TokenKind {
    /// Short name used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LineEnd => "line-end",
            Self::SetBegin => "set-begin",
            Self::SetEnd => "set-end",
            Self::Empty => "empty",
            Self::Label => "label",
            Self::StringLiteral => "string",
            Self::Enum => "enum",
            Self::Real => "real",
            Self::Integer => "integer",
            Self::Reference => "reference",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stateful token reader over one entity's argument region.
///
/// The protocol is two-phase: [`peek_kind`](TokenCursor::peek_kind) classifies
/// the pending token without consuming it, then either
/// [`advance`](TokenCursor::advance) consumes it structurally (parens, line
/// ends, anything whose payload is irrelevant) or one of the `take_*` readers
/// consumes it and decodes its payload.
///
/// Consumption rules:
///
/// - `take_*` on a token of the matching kind consumes it. If the payload
///   text fails to decode the token is *still consumed* and the reader
///   returns [`Error::MalformedPayload`](crate::Error::MalformedPayload), so
///   a caller can skip the damage and keep scanning.
/// - `take_*` on a token of the wrong kind consumes nothing and returns
///   [`Error::OutOfPhase`](crate::Error::OutOfPhase).
/// - `take_*` with no token left returns
///   [`Error::Exhausted`](crate::Error::Exhausted).
pub trait TokenCursor {
    /// Classify the pending token, or `None` at end of stream.
    fn peek_kind(&mut self) -> Option<TokenKind>;

    /// Consume the pending token without decoding its payload.
    /// No-op at end of stream.
    fn advance(&mut self);

    /// Consume a [`TokenKind::StringLiteral`] and decode its escape
    /// sequences.
    fn take_text(&mut self) -> Result<String>;

    /// Consume a [`TokenKind::Label`] or [`TokenKind::Enum`] as raw
    /// identifier text, no escape decoding.
    fn take_name(&mut self) -> Result<String>;

    /// Consume a [`TokenKind::Real`] payload.
    fn take_real(&mut self) -> Result<f64>;

    /// Consume a [`TokenKind::Integer`] payload.
    fn take_integer(&mut self) -> Result<i64>;

    /// Consume a [`TokenKind::Reference`] payload, the id after `#`.
    fn take_ref(&mut self) -> Result<u32>;

    /// True once the stream has no further tokens.
    fn at_end(&self) -> bool;

    /// Byte offset of the pending token, for diagnostics.
    fn offset(&self) -> usize;
}
