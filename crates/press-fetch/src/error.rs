//! Fetch error types.

use thiserror::Error;

/// Errors raised while fetching upstream content.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The upstream answered with an error status.
    #[error("upstream {url} answered {status}")]
    UpstreamStatus { url: String, status: u16 },

    /// The request itself failed (connect, timeout, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl FetchError {
    /// The upstream HTTP status, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::UpstreamStatus { status, .. } => Some(*status),
            FetchError::Http(error) => error.status().map(|s| s.as_u16()),
        }
    }
}
