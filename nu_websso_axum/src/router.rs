//! Router for the WebSSO endpoints

use axum::{Router, extract::FromRef};
use std::sync::Arc;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use nu_websso::WebSso;

/// Create a router for the WebSSO endpoints
///
/// The endpoints will be available at:
/// - {WEBSSO_ROUTE_PREFIX}/login?goto=...&duo=true
/// - {WEBSSO_ROUTE_PREFIX}/logout
/// - {WEBSSO_ROUTE_PREFIX}/session
///
/// The router state must provide an `Arc<WebSso>`.
pub fn websso_router<S>() -> Router<S>
where
    Arc<WebSso>: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    websso_router_no_trace().layer(
        TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new()
                    .level(Level::INFO)
                    .include_headers(false),
            )
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`websso_router`] without the HTTP tracing middleware
pub fn websso_router_no_trace<S>() -> Router<S>
where
    Arc<WebSso>: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    super::sso::router()
}
