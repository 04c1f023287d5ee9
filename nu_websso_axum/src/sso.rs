use axum::{
    Router,
    extract::{FromRef, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{Json, Redirect},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use nu_websso::{SessionInfo, WebSso};

use crate::config::WEBSSO_APP_ORIGIN;
use crate::error::IntoResponseError;
use crate::session::return_target;

pub(super) fn router<S>() -> Router<S>
where
    Arc<WebSso>: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/login", get(login))
        .route("/logout", get(logout))
        .route("/session", get(session_info))
}

#[derive(Deserialize)]
struct LoginQuery {
    goto: Option<String>,
    #[serde(default)]
    duo: bool,
}

/// Redirects to the WebSSO login page
///
/// `goto` defaults to the root of this application.
async fn login(
    State(websso): State<Arc<WebSso>>,
    Query(params): Query<LoginQuery>,
    headers: HeaderMap,
) -> Result<Redirect, (StatusCode, String)> {
    let target = match params.goto {
        Some(goto) if !goto.is_empty() => goto,
        _ => return_target(WEBSSO_APP_ORIGIN.as_deref(), &Uri::from_static("/"), &headers),
    };
    let url = websso
        .login_url(params.duo, &target)
        .await
        .into_response_error()?;
    tracing::debug!("Redirecting to WebSSO login, duo: {}", params.duo);
    Ok(Redirect::to(&url))
}

async fn logout(State(websso): State<Arc<WebSso>>) -> Result<Redirect, (StatusCode, String)> {
    let url = websso.logout_url().await.into_response_error()?;
    Ok(Redirect::to(&url))
}

/// Reports the session facts of the current request as JSON
async fn session_info(
    State(websso): State<Arc<WebSso>>,
    headers: HeaderMap,
) -> Result<Json<SessionInfo>, (StatusCode, String)> {
    let session = websso
        .session_from_headers(&headers)
        .await
        .into_checked()
        .into_response_error()?;
    Ok(Json(SessionInfo::from(&session)))
}
