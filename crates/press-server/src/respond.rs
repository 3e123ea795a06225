//! Response builders with the service's standard headers.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use serde::Serialize;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; img-src *; media-src *; \
     style-src 'self' 'unsafe-hashes' 'unsafe-inline' https://cdn.jsdelivr.net; \
     script-src 'self'";

fn base(status: StatusCode) -> axum::http::response::Builder {
    Response::builder().status(status)
}

/// An HTML page with the security headers every HTML response carries.
pub fn html(body: String) -> Response {
    html_with_status(body, StatusCode::OK)
}

/// An HTML page with an explicit status.
pub fn html_with_status(body: String, status: StatusCode) -> Response {
    base(status)
        .header(header::CONTENT_TYPE, "text/html;charset=utf-8")
        .header(header::STRICT_TRANSPORT_SECURITY, "max-age=63072000")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .header(header::X_FRAME_OPTIONS, "DENY")
        .header(header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY)
        .body(Body::from(body))
        .unwrap_or_default()
}

/// A JSON body.
pub fn json<T: Serialize>(value: &T, status: StatusCode) -> Response {
    let body = serde_json::to_vec(value).unwrap_or_else(|_| b"{}".to_vec());
    base(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_default()
}

/// Plain text.
pub fn plain(text: impl Into<String>, status: StatusCode) -> Response {
    base(status)
        .header(header::CONTENT_TYPE, "text/plain;charset=utf-8")
        .body(Body::from(text.into()))
        .unwrap_or_default()
}

/// CSS with a long shared-cache lifetime; asset URLs are content-addressed
/// so staleness is impossible.
pub fn css_cached(source: String) -> Response {
    base(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/css;charset=utf-8")
        .header(
            header::CACHE_CONTROL,
            "public, max-age=604800, s-maxage=43200",
        )
        .body(Body::from(source))
        .unwrap_or_default()
}

/// A see-other redirect.
pub fn redirect(location: &str) -> Response {
    let mut builder = base(StatusCode::SEE_OTHER);
    if let Ok(value) = HeaderValue::from_str(location) {
        builder = builder.header(header::LOCATION, value);
    }
    builder.body(Body::empty()).unwrap_or_default()
}

/// Raw bytes under an explicit content type (binary passthrough).
pub fn bytes(content_type: &str, body: bytes::Bytes) -> Response {
    base(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_str(content_type)
                .unwrap_or(HeaderValue::from_static("application/octet-stream")),
        )
        .body(Body::from(body))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_carries_security_headers() {
        let response = html("<p>hi</p>".to_owned());
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/html;charset=utf-8"
        );
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
    }

    #[test]
    fn test_redirect_sets_location() {
        let response = redirect("/github/acme/widgets@abc/");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/github/acme/widgets@abc/"
        );
    }

    #[test]
    fn test_css_is_cacheable() {
        let response = css_cached("body{}".to_owned());
        assert!(response
            .headers()
            .get(header::CACHE_CONTROL)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("max-age=604800"));
    }
}
