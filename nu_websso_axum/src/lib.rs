//! Axum integration for Northwestern WebSSO
//!
//! Provides the [`SsoUser`] extractor, the [`require_sso_login`] and
//! [`require_sso_duo`] middleware, and [`websso_router`] with login, logout
//! and session endpoints. The router state must provide an `Arc<WebSso>`.

mod config;
mod error;
mod middleware;
mod router;
mod session;
mod sso;

pub use config::{WEBSSO_APP_ORIGIN, WEBSSO_REQUIRE_DUO, WEBSSO_ROUTE_PREFIX};
pub use error::IntoResponseError;
pub use middleware::{require_sso_duo, require_sso_login};
pub use router::{websso_router, websso_router_no_trace};
pub use session::{SsoRejection, SsoUser};

pub use nu_websso::{
    Deployment, ProviderConfig, SessionInfo, SessionQuery, SessionQueryResult, SessionToken,
    WebSso, WebSsoError,
};
