//! Provider configuration for the WebSSO adapter
//!
//! Nothing here reads process state implicitly: callers either build a
//! [`ProviderConfig`] directly or ask for one with [`ProviderConfig::from_env`].

use serde::{Deserialize, Deserializer};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::WebSsoError;

pub const DEFAULT_REALM: &str = "northwestern";
pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Login trees of the identity provider's XUI
pub const LDAP_TREE: &str = "ldap-registry";
pub const LDAP_AND_DUO_TREE: &str = "ldap-and-duo";

/// Gateway proxy and its resource paths
pub const GATEWAY_PROXY_NAME: &str = "agentless-websso";
pub const GATEWAY_SESSION_INFO_PATH: &str = "session-info";
pub const GATEWAY_LDAP_ONLY_PATH: &str = "get-ldap-redirect-url";
pub const GATEWAY_LDAP_AND_DUO_PATH: &str = "get-ldap-duo-redirect-url";
pub const GATEWAY_LOGOUT_PATH: &str = "logout";

/// Which endpoint family session lookups and login URLs go through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    /// Calls the identity provider's REST API and XUI directly
    Direct,
    /// Calls the agentless-websso proxy on the API gateway
    Gateway,
}

impl Deployment {
    /// Flow selector used when the configuration does not override it
    pub fn default_flow(self, second_factor_required: bool) -> &'static str {
        match (self, second_factor_required) {
            (Deployment::Direct, false) => LDAP_TREE,
            (Deployment::Direct, true) => LDAP_AND_DUO_TREE,
            (Deployment::Gateway, false) => GATEWAY_LDAP_ONLY_PATH,
            (Deployment::Gateway, true) => GATEWAY_LDAP_AND_DUO_PATH,
        }
    }

    /// The gateway reports some upstream 401s as its own 500
    pub fn tolerates_upstream_401_quirk(self) -> bool {
        matches!(self, Deployment::Gateway)
    }
}

impl FromStr for Deployment {
    type Err = WebSsoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(Deployment::Direct),
            "gateway" | "apigee" => Ok(Deployment::Gateway),
            other => Err(WebSsoError::Config(format!(
                "Invalid deployment '{other}'. Must be 'direct' or 'gateway'."
            ))),
        }
    }
}

/// The two flow identifiers, one per second-factor requirement
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlowSelectors {
    pub standard: String,
    pub second_factor: String,
}

impl FlowSelectors {
    pub fn new(standard: impl Into<String>, second_factor: impl Into<String>) -> Self {
        Self {
            standard: standard.into(),
            second_factor: second_factor.into(),
        }
    }

    pub fn select(&self, second_factor_required: bool) -> &str {
        if second_factor_required {
            &self.second_factor
        } else {
            &self.standard
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    pub deployment: Deployment,
    /// Identity provider domain or gateway host, optionally with a port
    pub host: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_realm")]
    pub realm: String,
    /// Gateway API key; required for [`Deployment::Gateway`]
    #[serde(default)]
    pub api_key: Option<String>,
    /// Overrides the deployment's default flow selectors
    #[serde(default)]
    pub flows: Option<FlowSelectors>,
    /// Per-request timeout; read from whole seconds as `timeout_secs`
    #[serde(
        rename = "timeout_secs",
        default = "default_timeout",
        deserialize_with = "deserialize_secs"
    )]
    pub timeout: Duration,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("deployment", &self.deployment)
            .field("host", &self.host)
            .field("scheme", &self.scheme)
            .field("realm", &self.realm)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("flows", &self.flows)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_realm() -> String {
    DEFAULT_REALM.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

fn deserialize_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}

impl ProviderConfig {
    /// Configuration for calling the identity provider at `domain` directly
    pub fn direct(domain: impl Into<String>) -> Self {
        Self {
            deployment: Deployment::Direct,
            host: domain.into(),
            scheme: default_scheme(),
            realm: default_realm(),
            api_key: None,
            flows: None,
            timeout: default_timeout(),
        }
    }

    /// Configuration for calling the agentless-websso proxy at `host`
    pub fn gateway(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            deployment: Deployment::Gateway,
            api_key: Some(api_key.into()),
            ..Self::direct(host)
        }
    }

    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_flows(mut self, flows: FlowSelectors) -> Self {
        self.flows = Some(flows);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Flow selector for the given second-factor requirement
    pub fn flow(&self, second_factor_required: bool) -> &str {
        match &self.flows {
            Some(flows) => flows.select(second_factor_required),
            None => self.deployment.default_flow(second_factor_required),
        }
    }

    pub fn validate(&self) -> Result<(), WebSsoError> {
        if self.host.trim().is_empty() {
            return Err(WebSsoError::Config("host must not be empty".to_string()));
        }
        if self.realm.trim().is_empty() {
            return Err(WebSsoError::Config("realm must not be empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(WebSsoError::Config("timeout must be greater than zero".to_string()));
        }
        if self.deployment == Deployment::Gateway
            && self.api_key.as_deref().is_none_or(str::is_empty)
        {
            return Err(WebSsoError::Config(
                "api_key is required for the gateway deployment".to_string(),
            ));
        }
        if let Some(flows) = &self.flows {
            if flows.standard.is_empty() || flows.second_factor.is_empty() {
                return Err(WebSsoError::Config(
                    "flow selectors must not be empty".to_string(),
                ));
            }
            if flows.standard == flows.second_factor {
                return Err(WebSsoError::Config(
                    "standard and second-factor flow selectors must differ".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Build a configuration from `WEBSSO_*` environment variables
    ///
    /// | Variable               | Default          |
    /// |------------------------|------------------|
    /// | `WEBSSO_DEPLOYMENT`    | `direct`         |
    /// | `WEBSSO_HOST`          | required         |
    /// | `WEBSSO_SCHEME`        | `https`          |
    /// | `WEBSSO_REALM`         | `northwestern`   |
    /// | `WEBSSO_API_KEY`       | required for `gateway` |
    /// | `WEBSSO_STANDARD_FLOW` | deployment default |
    /// | `WEBSSO_DUO_FLOW`      | deployment default |
    /// | `WEBSSO_TIMEOUT_SECS`  | `30`             |
    pub fn from_env() -> Result<Self, WebSsoError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, WebSsoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let deployment = match lookup("WEBSSO_DEPLOYMENT") {
            Some(value) => value.parse()?,
            None => Deployment::Direct,
        };

        let host = lookup("WEBSSO_HOST")
            .ok_or_else(|| WebSsoError::Config("WEBSSO_HOST must be set".to_string()))?;

        let timeout = match lookup("WEBSSO_TIMEOUT_SECS") {
            Some(value) => value.parse().map(Duration::from_secs).map_err(|_| {
                WebSsoError::Config(format!("Invalid WEBSSO_TIMEOUT_SECS '{value}'"))
            })?,
            None => default_timeout(),
        };

        let standard = lookup("WEBSSO_STANDARD_FLOW");
        let second_factor = lookup("WEBSSO_DUO_FLOW");
        let flows = if standard.is_some() || second_factor.is_some() {
            Some(FlowSelectors::new(
                standard.unwrap_or_else(|| deployment.default_flow(false).to_string()),
                second_factor.unwrap_or_else(|| deployment.default_flow(true).to_string()),
            ))
        } else {
            None
        };

        let config = Self {
            deployment,
            host,
            scheme: lookup("WEBSSO_SCHEME").unwrap_or_else(default_scheme),
            realm: lookup("WEBSSO_REALM").unwrap_or_else(default_realm),
            api_key: lookup("WEBSSO_API_KEY"),
            flows,
            timeout,
        };
        config.validate()?;

        tracing::debug!(
            "Loaded WebSSO config: deployment={:?}, base_url={}, realm={}",
            config.deployment,
            config.base_url(),
            config.realm
        );
        Ok(config)
    }
}
