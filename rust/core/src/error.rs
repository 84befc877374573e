use crate::token::TokenKind;
use thiserror::Error;

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading entity arguments
#[derive(Error, Debug)]
pub enum Error {
    /// A typed read was issued while the pending token has a different kind.
    /// The cursor state is untouched; nothing was consumed.
    #[error("cursor out of phase: expected {expected} token, found {found}")]
    OutOfPhase {
        expected: TokenKind,
        found: TokenKind,
    },

    /// A typed read was issued with no token left on the stream.
    #[error("cursor exhausted while reading {0} token")]
    Exhausted(TokenKind),

    /// The token classified fine but its payload text failed to decode.
    /// The token has been consumed; the stream is positioned past it.
    #[error("malformed {kind} payload {text:?} at offset {offset}")]
    MalformedPayload {
        kind: TokenKind,
        text: String,
        offset: usize,
    },

    /// An entity type name could not be resolved against the registry.
    #[error("unknown entity type name {0:?}")]
    UnknownTypeName(String),
}
