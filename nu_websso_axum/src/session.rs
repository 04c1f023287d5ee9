use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Redirect, Response},
};
use http::{HeaderMap, Method, StatusCode, Uri, header::HOST, request::Parts};
use std::sync::Arc;

use nu_websso::{SessionQueryResult, WebSso, WebSsoError};

use super::config::{WEBSSO_APP_ORIGIN, WEBSSO_REQUIRE_DUO};
use super::error::status_for;

/// Why a request was turned away
#[derive(Debug)]
pub enum SsoRejection {
    /// Send the browser to the WebSSO login page
    Login(String),
    Unauthorized,
    /// The session or login URL lookup itself failed
    Upstream(WebSsoError),
}

impl IntoResponse for SsoRejection {
    fn into_response(self) -> Response {
        match self {
            SsoRejection::Login(url) => {
                tracing::debug!("Redirecting to WebSSO login");
                Redirect::temporary(&url).into_response()
            }
            SsoRejection::Unauthorized => {
                tracing::debug!("Unauthorized");
                (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
            }
            SsoRejection::Upstream(err) => (status_for(&err), err.to_string()).into_response(),
        }
    }
}

/// WebSSO user of the current request, available as an Axum extractor
///
/// Requires `Arc<WebSso>` to be obtainable from the router state. When the
/// request has no valid session, GET requests are redirected to the WebSSO
/// login page and other methods get `401 Unauthorized`. When
/// `WEBSSO_REQUIRE_DUO` is set, a session that did not pass through Duo is
/// sent to the Duo login flow.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{routing::get, Router};
/// use nu_websso_axum::{ProviderConfig, SsoUser, WebSso};
///
/// async fn protected_handler(user: SsoUser) -> String {
///     format!("Hello, {}!", user.net_id)
/// }
///
/// # fn app() -> Result<Router, nu_websso_axum::WebSsoError> {
/// let websso = Arc::new(WebSso::new(ProviderConfig::direct("dev-websso.it.northwestern.edu"))?);
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler))
///     .with_state(websso);
/// # Ok(app)
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SsoUser {
    /// The user's netid
    pub net_id: String,
    /// Whether the session passed through Duo
    pub duo_verified: bool,
}

impl SsoUser {
    pub fn from_session(session: &SessionQueryResult) -> Option<Self> {
        match session {
            SessionQueryResult::Authenticated {
                principal_id,
                second_factor_verified,
                ..
            } => Some(Self {
                net_id: principal_id.clone(),
                duo_verified: *second_factor_verified,
            }),
            _ => None,
        }
    }
}

impl<S> FromRequestParts<S> for SsoUser
where
    Arc<WebSso>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = SsoRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already resolved by the middleware
        if let Some(user) = parts.extensions.get::<SsoUser>() {
            return Ok(user.clone());
        }

        let websso = Arc::<WebSso>::from_ref(state);
        authenticate(
            &websso,
            &parts.method,
            &parts.uri,
            &parts.headers,
            *WEBSSO_REQUIRE_DUO,
        )
        .await
    }
}

impl<S> OptionalFromRequestParts<S> for SsoUser
where
    Arc<WebSso>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = SsoRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<SsoUser>() {
            return Ok(Some(user.clone()));
        }

        let websso = Arc::<WebSso>::from_ref(state);
        let session = websso.session_from_headers(&parts.headers).await;
        if let SessionQueryResult::ProviderError { status, .. } = &session {
            tracing::error!("Session lookup failed with status {}", status);
        }
        Ok(SsoUser::from_session(&session))
    }
}

/// Resolves the request's session, producing the rejection to send when it is not good enough
pub(crate) async fn authenticate(
    websso: &WebSso,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    require_duo: bool,
) -> Result<SsoUser, SsoRejection> {
    let session = websso
        .session_from_headers(headers)
        .await
        .into_checked()
        .map_err(|e| {
            tracing::error!("Failed to resolve WebSSO session: {}", e);
            SsoRejection::Upstream(e)
        })?;

    match SsoUser::from_session(&session) {
        Some(user) if require_duo && !user.duo_verified => {
            tracing::debug!("User {} has not passed through Duo", user.net_id);
            Err(login_rejection(websso, method, uri, headers, true).await)
        }
        Some(user) => Ok(user),
        None => Err(login_rejection(websso, method, uri, headers, require_duo).await),
    }
}

async fn login_rejection(
    websso: &WebSso,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    second_factor_required: bool,
) -> SsoRejection {
    if method != Method::GET {
        return SsoRejection::Unauthorized;
    }

    let target = return_target(WEBSSO_APP_ORIGIN.as_deref(), uri, headers);
    match websso.login_url(second_factor_required, &target).await {
        Ok(url) => SsoRejection::Login(url),
        Err(e) => {
            tracing::error!("Failed to get WebSSO login URL: {}", e);
            SsoRejection::Upstream(e)
        }
    }
}

/// Absolute URL of the current request, for the login `goto` target
pub(crate) fn return_target(origin: Option<&str>, uri: &Uri, headers: &HeaderMap) -> String {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }
    if let Some(origin) = origin {
        return format!("{origin}{path}");
    }
    match headers.get(HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("https://{host}{path}"),
        None => path.to_string(),
    }
}
