//! Entity Argument Parser
//!
//! Recursive descent over a [`TokenCursor`], rebuilding the positional
//! argument list of one instance line. A damaged payload is skipped and
//! logged, never fatal: the scan picks up at the next token, so one bad
//! argument costs one value, not the whole line.

use crate::error::Error;
use crate::token::{TokenCursor, TokenKind};
use crate::value::Value;

/// One token dropped because its payload failed to decode
#[derive(Debug)]
pub struct SkippedToken {
    pub kind: TokenKind,
    /// Byte offset within the cursor's text
    pub offset: usize,
    pub error: Error,
}

/// Skip-and-log recovery policy.
///
/// Every recovered failure lands here in encounter order and is mirrored as
/// a `tracing` debug event. Callers that care whether a parse was clean
/// check [`is_empty`](SkipLog::is_empty) afterwards; callers that do not can
/// share one log across a whole file.
#[derive(Debug, Default)]
pub struct SkipLog {
    entries: Vec<SkippedToken>,
}

impl SkipLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn record(&mut self, kind: TokenKind, offset: usize, error: Error) {
        tracing::debug!(kind = %kind, offset, %error, "Skipped argument token");
        self.entries.push(SkippedToken {
            kind,
            offset,
            error,
        });
    }

    /// Recovered failures in encounter order
    pub fn entries(&self) -> &[SkippedToken] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Parse the argument list of an instance line.
///
/// The cursor must sit at the first token of the line's argument region,
/// just past the opening paren. Consumes through the terminating line end
/// (or the set end closing the entity's own argument set, which precedes
/// it). A stream that ends early yields the arguments read so far.
pub fn parse_arguments<C: TokenCursor + ?Sized>(cursor: &mut C, skips: &mut SkipLog) -> Vec<Value> {
    collect_values(cursor, skips)
}

/// Parse the interior of an already-opened aggregate.
///
/// Same loop as [`parse_arguments`]; the name marks the calling position.
/// Consumes through the set end that closes the aggregate.
pub fn parse_nested_list<C: TokenCursor + ?Sized>(
    cursor: &mut C,
    skips: &mut SkipLog,
) -> Vec<Value> {
    collect_values(cursor, skips)
}

fn collect_values<C: TokenCursor + ?Sized>(cursor: &mut C, skips: &mut SkipLog) -> Vec<Value> {
    let mut values = Vec::new();
    loop {
        let kind = match cursor.peek_kind() {
            Some(kind) => kind,
            // Truncated stream: hand back what was read
            None => break,
        };
        let offset = cursor.offset();
        match kind {
            TokenKind::LineEnd | TokenKind::SetEnd => {
                cursor.advance();
                break;
            }
            TokenKind::Empty => {
                cursor.advance();
                values.push(Value::Null);
            }
            TokenKind::SetBegin => {
                cursor.advance();
                values.push(Value::List(collect_values(cursor, skips)));
            }
            TokenKind::Label => match cursor.take_name() {
                Ok(name) => {
                    // The member set opens right behind the label; the
                    // opener is consumed unchecked, whatever it is.
                    if let Some(next) = cursor.peek_kind() {
                        if next != TokenKind::SetBegin {
                            tracing::debug!(
                                found = %next,
                                offset = cursor.offset(),
                                "Expected set-begin after label"
                            );
                        }
                        cursor.advance();
                    }
                    values.push(Value::Typed(name, collect_values(cursor, skips)));
                }
                Err(error) => skips.record(kind, offset, error),
            },
            TokenKind::StringLiteral => match cursor.take_text() {
                Ok(text) => values.push(Value::Text(text)),
                Err(error) => skips.record(kind, offset, error),
            },
            TokenKind::Enum => match cursor.take_name() {
                Ok(name) => values.push(Value::Enum(name)),
                Err(error) => skips.record(kind, offset, error),
            },
            TokenKind::Real => match cursor.take_real() {
                Ok(value) => values.push(Value::Real(value)),
                Err(error) => skips.record(kind, offset, error),
            },
            TokenKind::Integer => match cursor.take_integer() {
                Ok(value) => values.push(Value::Integer(value)),
                Err(error) => skips.record(kind, offset, error),
            },
            TokenKind::Reference => match cursor.take_ref() {
                Ok(id) => values.push(Value::EntityRef(id)),
                Err(error) => skips.record(kind, offset, error),
            },
            TokenKind::Unknown => {
                // Derived markers and future token kinds pass through
                tracing::trace!(offset, "Dropped unclassified token");
                cursor.advance();
            }
        }
    }
    values
}
