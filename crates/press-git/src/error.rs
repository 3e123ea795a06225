//! Ref decoding error types.

use thiserror::Error;

/// Errors raised while decoding a ref advertisement.
///
/// The decoder fails fast: a malformed length prefix or a declared length
/// running past the buffer stops iteration with an error instead of
/// looping or reading garbage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefDecodeError {
    /// The 4-character length prefix was not hexadecimal.
    #[error("malformed pkt-line length prefix {prefix:?} at byte {offset}")]
    MalformedLength { prefix: String, offset: usize },

    /// The declared payload length exceeds the remaining buffer.
    #[error("truncated pkt-line at byte {offset}: declared {declared} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        declared: usize,
        available: usize,
    },

    /// A pkt-line payload was not valid UTF-8.
    #[error("pkt-line payload at byte {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    /// A data line had no ref name after the object id.
    #[error("pkt-line at byte {offset} has no ref field")]
    MissingRef { offset: usize },
}
