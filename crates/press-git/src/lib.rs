//! Git ref advertisement parsing for Press.
//!
//! GitHub's `info/refs?service=git-upload-pack` endpoint answers in the
//! pkt-line framing of the smart HTTP protocol. This crate decodes that
//! response into [`RefRecord`] values and answers the two questions the
//! edge service actually asks: what is HEAD, and what does a named branch
//! point at.

mod decode;
mod encode;
mod error;
mod refs;

pub use decode::{decode_refs, RefDecoder};
pub use encode::{encode_data_line, encode_flush};
pub use error::RefDecodeError;
pub use refs::{find_branch, find_head, BranchRef, HeadRef, RefRecord};

/// Result type for ref decoding operations.
pub type Result<T> = std::result::Result<T, RefDecodeError>;
