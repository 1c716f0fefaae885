//! Error type shared by every codec.

use thiserror::Error;

use crate::Token;

/// Errors raised by decoders, readers, writers and value helpers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended before a complete token could be read.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// Unrecognized tag byte (or, for JSON, unexpected character).
    #[error("invalid tag 0x{tag:02x} at offset {offset}")]
    InvalidTag { tag: u8, offset: usize },
    /// A length prefix decoded as negative under a signed-length format.
    #[error("negative length at offset {0}")]
    NegativeLength(usize),
    /// Invalid JSON number or keyword literal.
    #[error("invalid literal at offset {0}")]
    InvalidLiteral(usize),
    #[error("invalid UTF-8")]
    InvalidUtf8,
    /// A `get_*` accessor was called on a token of another kind.
    #[error("incompatible type: expected {expected}, found {found:?}")]
    IncompatibleType { expected: &'static str, found: Token },
    /// The wire value does not fit the requested type.
    #[error("value out of range")]
    Overflow,
    /// A container end that does not match the innermost open container.
    #[error("unbalanced end of container: {0:?}")]
    UnbalancedEnd(Token),
    /// A token that is not allowed at this position of the document.
    #[error("unexpected token {0:?}")]
    UnexpectedToken(Token),
    #[error("nesting depth exceeds {0}")]
    DepthExceeded(usize),
    /// More elements were written than the container declared.
    #[error("too many elements in container")]
    TooManyElements,
    /// A container was closed before all declared elements were written.
    #[error("too few elements in container: {0} missing")]
    TooFewElements(usize),
    /// The format needs the element count when a container is opened.
    #[error("container element count is required")]
    MissingCount,
    /// The value shape cannot be expressed in this format.
    #[error("unsupported value for {0}")]
    Unsupported(&'static str),
    /// Input continues after a complete top-level value.
    #[error("trailing data at offset {0}")]
    TrailingData(usize),
}

pub type Result<T> = std::result::Result<T, CodecError>;
