//! Outbound calls to the identity provider or the gateway proxy

mod direct;
mod gateway;
mod utils;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Deployment;
use crate::errors::WebSsoError;
use crate::token::SessionToken;

pub use direct::DirectClient;
pub use gateway::GatewayClient;

/// Status and JSON body of a session lookup, before classification
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// Exchanges a session token for the provider's session metadata
///
/// Implementations issue exactly one outbound request per call. Statuses in
/// `200..=499` are returned as data; anything else, and transport failures,
/// come back as [`WebSsoError`].
#[async_trait]
pub trait SessionQuery: Send + Sync {
    async fn query(&self, token: &SessionToken) -> Result<RawResponse, WebSsoError>;

    fn deployment(&self) -> Deployment;
}
