//! Route construction errors.

use thiserror::Error;

/// Errors raised while building route patterns.
///
/// These are programming errors caught when the route table is constructed
/// at startup; dispatch itself never returns an error.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A capture step's regular expression failed to compile.
    #[error("invalid capture pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// A route's pattern has no terminal producer.
    #[error("route {0:?} has no terminal producer")]
    MissingProducer(&'static str),
}
