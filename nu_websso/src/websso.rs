use http::HeaderMap;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::sync::Arc;

use crate::client::{DirectClient, GatewayClient, SessionQuery};
use crate::config::{Deployment, ProviderConfig};
use crate::errors::{Operation, WebSsoError};
use crate::redirect::direct_login_url;
use crate::session::{SessionQueryResult, resolve_session};
use crate::token::{SessionToken, get_sso_cookie, get_sso_cookie_from_headers};

/// Session checks and login/logout URLs for one provider configuration
///
/// Holds no per-request state, so a single value can be shared across
/// request handlers.
#[derive(Clone)]
pub struct WebSso {
    config: ProviderConfig,
    query: Arc<dyn SessionQuery>,
    gateway: Option<Arc<GatewayClient>>,
}

impl fmt::Debug for WebSso {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSso")
            .field("deployment", &self.config.deployment)
            .field("base_url", &self.config.base_url())
            .field("realm", &self.config.realm)
            .finish()
    }
}

impl WebSso {
    pub fn new(config: ProviderConfig) -> Result<Self, WebSsoError> {
        config.validate()?;
        let gateway = match config.deployment {
            Deployment::Direct => None,
            Deployment::Gateway => Some(Arc::new(GatewayClient::new(&config)?)),
        };
        let query: Arc<dyn SessionQuery> = match &gateway {
            Some(gateway) => gateway.clone(),
            None => Arc::new(DirectClient::new(&config)?),
        };
        tracing::debug!("WebSSO configured for {:?} deployment", config.deployment);
        Ok(Self {
            config,
            query,
            gateway,
        })
    }

    /// Replaces the session lookup strategy; login and logout URLs are unaffected
    pub fn with_query(mut self, query: Arc<dyn SessionQuery>) -> Self {
        self.query = query;
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub async fn session(&self, token: &SessionToken) -> SessionQueryResult {
        resolve_session(self.query.as_ref(), token).await
    }

    /// Resolves the session named by the SSO cookie, without a lookup when it is absent
    pub async fn session_from_cookies<S: BuildHasher>(
        &self,
        request_cookies: &HashMap<String, String, S>,
    ) -> SessionQueryResult {
        match get_sso_cookie(request_cookies) {
            Some(token) => self.session(&token).await,
            None => SessionQueryResult::no_session(),
        }
    }

    pub async fn session_from_headers(&self, headers: &HeaderMap) -> SessionQueryResult {
        match get_sso_cookie_from_headers(headers) {
            Some(token) => self.session(&token).await,
            None => SessionQueryResult::no_session(),
        }
    }

    /// Login URL for the standard or the Duo flow
    ///
    /// Built locally for the direct deployment; fetched from the proxy for the gateway.
    pub async fn login_url(
        &self,
        second_factor_required: bool,
        redirect_target: &str,
    ) -> Result<String, WebSsoError> {
        match &self.gateway {
            Some(gateway) => {
                gateway
                    .fetch_login_url(second_factor_required, redirect_target)
                    .await
            }
            None => Ok(direct_login_url(
                &self.config,
                second_factor_required,
                redirect_target,
            )),
        }
    }

    /// Logout URL; only the gateway deployment provides one
    pub async fn logout_url(&self) -> Result<String, WebSsoError> {
        match &self.gateway {
            Some(gateway) => gateway.fetch_logout_url().await,
            None => Err(WebSsoError::Unsupported(Operation::LogoutUrl)),
        }
    }
}
