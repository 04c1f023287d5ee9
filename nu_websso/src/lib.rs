//! nu-websso - Northwestern WebSSO session adapter
//!
//! Resolves whether a request's `nusso` cookie names a live SSO session and
//! builds the login/logout URLs of the identity provider, either by calling
//! the provider directly or through the agentless-websso gateway proxy.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use nu_websso::{ProviderConfig, WebSso};
//!
//! # async fn handler(cookies: HashMap<String, String>) -> Result<(), nu_websso::WebSsoError> {
//! let websso = WebSso::new(ProviderConfig::direct("dev-websso.it.northwestern.edu"))?;
//! let session = websso.session_from_cookies(&cookies).await.into_checked()?;
//! if !session.is_logged_in() {
//!     let login_url = websso.login_url(true, "https://app.example.edu/home").await?;
//!     println!("redirect to {login_url}");
//! }
//! # Ok(())
//! # }
//! ```

mod classify;
mod client;
mod config;
mod errors;
mod redirect;
mod session;
mod token;
mod websso;

pub use classify::{
    DUO_PROPERTY_NAME, NETID_PROPERTY_NAME, UPSTREAM_UNAUTHORIZED_FAULT, classify,
    classify_failure, is_upstream_unauthorized, unauthorized_body,
};
pub use client::{DirectClient, GatewayClient, RawResponse, SessionQuery};
pub use config::{Deployment, FlowSelectors, ProviderConfig};
pub use errors::{Operation, WebSsoError};
pub use redirect::direct_login_url;
pub use session::{
    SessionInfo, SessionQueryResult, get_net_id, is_duo_authenticated, is_logged_in,
    resolve_session,
};
pub use token::{
    SSO_COOKIE_NAME, SessionToken, get_sso_cookie, get_sso_cookie_from_headers,
    get_sso_cookie_from_typed,
};
pub use websso::WebSso;

// Re-exported so strategy implementors use the same macro version
pub use async_trait::async_trait;
