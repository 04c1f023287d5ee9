use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use serde_json::json;
use std::fmt;

use crate::config::{Deployment, ProviderConfig};
use crate::errors::{Operation, WebSsoError};
use crate::token::SessionToken;

use super::utils::{accept_as_data, build_http_client, read_response, transport_error};
use super::{RawResponse, SessionQuery};

/// Queries the identity provider's session endpoint directly
#[derive(Clone)]
pub struct DirectClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl fmt::Debug for DirectClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DirectClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, WebSsoError> {
        let http = build_http_client(config.timeout())?;
        Ok(Self::with_http_client(config, http))
    }

    pub fn with_http_client(config: &ProviderConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            config: config.clone(),
        }
    }

    pub(crate) fn session_info_url(&self) -> String {
        format!(
            "{}/nusso/json/realms/root/realms/{}/sessions?_action=getSessionInfo",
            self.config.base_url(),
            self.config.realm
        )
    }
}

#[async_trait]
impl SessionQuery for DirectClient {
    async fn query(&self, token: &SessionToken) -> Result<RawResponse, WebSsoError> {
        let url = self.session_info_url();
        tracing::debug!("Fetching session info from {} for token {}", url, token);

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header("Accept-API-Version", "resource=3")
            .json(&json!({
                "tokenId": token.as_str(),
                "realm": "/",
            }))
            .send()
            .await
            .map_err(|e| transport_error(Operation::SessionLookup, e))?;

        let response = read_response(Operation::SessionLookup, response).await?;
        accept_as_data(Operation::SessionLookup, response)
    }

    fn deployment(&self) -> Deployment {
        Deployment::Direct
    }
}
