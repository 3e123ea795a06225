//! Upstream fetching for Press.
//!
//! Everything the edge service reads lives somewhere else: raw repo files,
//! flat file listings, the git ref advertisement, gist files, and public
//! S3 objects. [`GitHubClient`] wraps those endpoints behind one reqwest
//! client with overridable base URLs so tests can point it anywhere.

mod client;
mod content;
mod error;

pub use client::{Endpoints, FetchedFile, GitHubClient};
pub use content::{Content, FileListing};
pub use error::FetchError;

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
