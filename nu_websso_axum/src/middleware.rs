use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use nu_websso::WebSso;

use super::config::WEBSSO_REQUIRE_DUO;
use super::session::authenticate;

async fn run_authenticated(
    websso: &WebSso,
    mut req: Request,
    next: Next,
    require_duo: bool,
) -> Response {
    match authenticate(websso, req.method(), req.uri(), req.headers(), require_duo).await {
        Ok(user) => {
            tracing::debug!("WebSSO user: {:?}", user);
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(rejection) => rejection.into_response(),
    }
}

/// Requires a WebSSO session, redirecting GET requests to the login page
///
/// Also requires Duo when `WEBSSO_REQUIRE_DUO` is set. Use with
/// `axum::middleware::from_fn_with_state`; the resolved
/// [`SsoUser`](crate::SsoUser) is stored in the request extensions.
pub async fn require_sso_login(
    State(websso): State<Arc<WebSso>>,
    req: Request,
    next: Next,
) -> Response {
    run_authenticated(&websso, req, next, *WEBSSO_REQUIRE_DUO).await
}

/// Requires a WebSSO session that passed through Duo
pub async fn require_sso_duo(
    State(websso): State<Arc<WebSso>>,
    req: Request,
    next: Next,
) -> Response {
    run_authenticated(&websso, req, next, true).await
}
