//! HTTP wiring: application state and the dispatch entry point.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use press_fetch::GitHubClient;
use press_route::{Attempt, MatchOutcome, RouteError, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::analytics::ViewCounter;
use crate::assets::AssetStore;
use crate::endpoint::{route_table, Endpoint};
use crate::handlers;
use crate::respond;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Owner of the repo the home and docs pages render.
    pub home_owner: String,
    /// Name of the repo the home and docs pages render.
    pub home_repo: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            home_owner: "collectedpress".to_owned(),
            home_repo: "press".to_owned(),
        }
    }
}

/// Shared state: the read-only route table, the upstream client, the asset
/// cache, and the view counter.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<GitHubClient>,
    pub assets: Arc<AssetStore>,
    pub views: Arc<ViewCounter>,
    pub routes: Arc<Router<Endpoint>>,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    /// Builds the state, compiling the route table once.
    pub fn new(client: GitHubClient, config: ServiceConfig) -> Result<Self, RouteError> {
        Ok(Self {
            client: Arc::new(client),
            assets: Arc::new(AssetStore::new()),
            views: Arc::new(ViewCounter::new()),
            routes: Arc::new(route_table()?),
            config: Arc::new(config),
        })
    }
}

/// The axum application: every path funnels through [`dispatch`].
pub fn app(state: AppState) -> axum::Router {
    axum::Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct NotFoundBody {
    success: bool,
    attempts: Vec<Attempt>,
}

/// Runs the route table over the request path and executes the matched
/// endpoint. Unmatched paths answer 404 with one diagnostic entry per
/// tried route.
async fn dispatch(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
) -> Response {
    let path = request.uri().path().to_owned();

    match state.routes.dispatch(&path) {
        MatchOutcome::Matched(matched) => {
            tracing::debug!(route = matched.route, path = %path, "dispatched");
            if path != "/analytics" {
                state.views.record(&path);
            }
            match handlers::handle(&state, matched.value, &params, request.headers()).await {
                Ok(response) => response,
                Err(error) => {
                    tracing::warn!(route = matched.route, %error, "handler failed");
                    error.into_response()
                }
            }
        }
        MatchOutcome::NotMatched { attempts } => {
            tracing::debug!(path = %path, tried = attempts.len(), "no route matched");
            respond::json(
                &NotFoundBody {
                    success: false,
                    attempts,
                },
                StatusCode::NOT_FOUND,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn test_app() -> axum::Router {
        let state = AppState::new(GitHubClient::new(), ServiceConfig::default())
            .expect("route table compiles");
        app(state)
    }

    #[tokio::test]
    async fn test_unknown_path_is_structured_404() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/unknown/path")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_analytics_answers_without_upstream() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/analytics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_favicon_is_no_content() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/favicon.ico")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_unloaded_asset_is_404() {
        let sha = "a".repeat(64);
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri(format!("/assets/night-owl/{sha}.css"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
