use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use std::fmt;

use crate::config::{
    Deployment, GATEWAY_LOGOUT_PATH, GATEWAY_PROXY_NAME, GATEWAY_SESSION_INFO_PATH,
    ProviderConfig,
};
use crate::errors::{Operation, WebSsoError};
use crate::token::SessionToken;

use super::utils::{
    accept_as_data, build_http_client, read_response, require_success, string_field,
    transport_error,
};
use super::{RawResponse, SessionQuery};

const REDIRECT_URL_FIELD: &str = "redirecturl";
const LOGOUT_URL_FIELD: &str = "url";

/// Talks to the agentless-websso proxy on the API gateway
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    config: ProviderConfig,
    api_key: String,
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, WebSsoError> {
        let http = build_http_client(config.timeout())?;
        Self::with_http_client(config, http)
    }

    pub fn with_http_client(
        config: &ProviderConfig,
        http: reqwest::Client,
    ) -> Result<Self, WebSsoError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                WebSsoError::Config("api_key is required for the gateway deployment".to_string())
            })?;
        Ok(Self {
            http,
            config: config.clone(),
            api_key,
        })
    }

    pub(crate) fn proxy_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.config.base_url(), GATEWAY_PROXY_NAME, path)
    }

    /// Asks the proxy for the login redirect URL of the selected flow
    pub async fn fetch_login_url(
        &self,
        second_factor_required: bool,
        redirect_target: &str,
    ) -> Result<String, WebSsoError> {
        let operation = Operation::LoginUrl;
        let url = self.proxy_url(self.config.flow(second_factor_required));
        tracing::debug!("Fetching login URL from {}", url);

        let response = self
            .http
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .header("goto", redirect_target)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;

        let response = read_response(operation, response).await?;
        let body = require_success(operation, response)?;
        string_field(operation, body, REDIRECT_URL_FIELD)
    }

    /// Asks the proxy for the logout URL
    pub async fn fetch_logout_url(&self) -> Result<String, WebSsoError> {
        let operation = Operation::LogoutUrl;
        let url = self.proxy_url(GATEWAY_LOGOUT_PATH);
        tracing::debug!("Fetching logout URL from {}", url);

        let response = self
            .http
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;

        let response = read_response(operation, response).await?;
        let body = require_success(operation, response)?;
        string_field(operation, body, LOGOUT_URL_FIELD)
    }
}

#[async_trait]
impl SessionQuery for GatewayClient {
    async fn query(&self, token: &SessionToken) -> Result<RawResponse, WebSsoError> {
        let url = self.proxy_url(GATEWAY_SESSION_INFO_PATH);
        tracing::debug!("Fetching session info from {} for token {}", url, token);

        let response = self
            .http
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .header("webssotoken", token.as_str())
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(Operation::SessionLookup, e))?;

        let response = read_response(Operation::SessionLookup, response).await?;
        accept_as_data(Operation::SessionLookup, response)
    }

    fn deployment(&self) -> Deployment {
        Deployment::Gateway
    }
}
