//! The Press edge service.
//!
//! Every request path runs through the declarative router in `press-route`;
//! the matched [`endpoint::Endpoint`] names one of the fetch-and-render
//! handlers in [`handlers`]. The service holds no state beyond the
//! read-only route table, a cached pair of stylesheets, and the in-memory
//! view counter.

pub mod analytics;
pub mod assets;
pub mod endpoint;
pub mod error;
pub mod handlers;
pub mod respond;
pub mod service;
pub mod site;

pub use endpoint::{route_table, Endpoint, RepoFile, S3Key, Source};
pub use error::ServerError;
pub use service::{app, AppState, ServiceConfig};
