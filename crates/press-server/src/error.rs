//! Service error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use press_fetch::FetchError;
use press_git::RefDecodeError;
use serde::Serialize;
use thiserror::Error;

/// Errors a handler can surface after a route has matched.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The matched resource does not exist upstream.
    #[error("not found: {0}")]
    NotFound(String),

    /// An upstream fetch failed; the upstream status is carried through.
    #[error(transparent)]
    Upstream(#[from] FetchError),

    /// An upstream answered with bytes we could not make sense of.
    #[error("invalid upstream response: {0}")]
    BadUpstream(String),
}

impl From<RefDecodeError> for ServerError {
    fn from(error: RefDecodeError) -> Self {
        ServerError::BadUpstream(error.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Upstream(error) => error
                .status()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ServerError::BadUpstream(_) => StatusCode::BAD_GATEWAY,
        };

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ServerError::NotFound("nope".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_status_carries_through() {
        let response = ServerError::Upstream(FetchError::UpstreamStatus {
            url: "https://example.org/x".to_owned(),
            status: 451,
        })
        .into_response();
        assert_eq!(response.status().as_u16(), 451);
    }

    #[test]
    fn test_decode_error_maps_to_bad_gateway() {
        let error: ServerError = RefDecodeError::InvalidUtf8 { offset: 4 }.into();
        assert_eq!(
            error.into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
