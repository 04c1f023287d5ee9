use serde::Serialize;
use serde_json::Value;

use crate::classify::{classify, classify_failure};
use crate::client::SessionQuery;
use crate::errors::{Operation, WebSsoError};
use crate::token::SessionToken;

/// Outcome of a session lookup
#[derive(Debug, Clone, PartialEq)]
pub enum SessionQueryResult {
    /// A 200 response naming the logged-in user
    Authenticated {
        status: u16,
        principal_id: String,
        second_factor_verified: bool,
        body: Value,
    },
    /// No valid session; a 401, a normalized gateway 401, or a 200 without a user
    Unauthenticated { status: u16, body: Value },
    /// Any other status, or a lookup that failed outright
    ProviderError { status: u16, body: Value },
}

impl SessionQueryResult {
    /// The result for a request that carried no SSO cookie
    pub fn no_session() -> Self {
        SessionQueryResult::Unauthenticated {
            status: 401,
            body: Value::Null,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionQueryResult::Authenticated { .. })
    }

    /// Whether the user is logged in and passed through Duo
    pub fn is_second_factor_verified(&self) -> bool {
        matches!(
            self,
            SessionQueryResult::Authenticated {
                second_factor_verified: true,
                ..
            }
        )
    }

    /// The logged-in user's netid, `None` unless authenticated
    pub fn principal_id(&self) -> Option<&str> {
        match self {
            SessionQueryResult::Authenticated { principal_id, .. } => Some(principal_id),
            _ => None,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            SessionQueryResult::Authenticated { status, .. }
            | SessionQueryResult::Unauthenticated { status, .. }
            | SessionQueryResult::ProviderError { status, .. } => *status,
        }
    }

    pub fn body(&self) -> &Value {
        match self {
            SessionQueryResult::Authenticated { body, .. }
            | SessionQueryResult::Unauthenticated { body, .. }
            | SessionQueryResult::ProviderError { body, .. } => body,
        }
    }

    /// Surfaces a provider error as [`WebSsoError::Provider`]
    pub fn into_checked(self) -> Result<Self, WebSsoError> {
        match self {
            SessionQueryResult::ProviderError { status, body } => Err(WebSsoError::Provider {
                operation: Operation::SessionLookup,
                status,
                body,
            }),
            other => Ok(other),
        }
    }
}

pub fn is_logged_in(session_info: &SessionQueryResult) -> bool {
    session_info.is_logged_in()
}

pub fn is_duo_authenticated(session_info: &SessionQueryResult) -> bool {
    session_info.is_second_factor_verified()
}

pub fn get_net_id(session_info: &SessionQueryResult) -> Option<&str> {
    session_info.principal_id()
}

/// The three session facts in one serializable value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub logged_in: bool,
    pub second_factor_verified: bool,
    pub net_id: Option<String>,
}

impl From<&SessionQueryResult> for SessionInfo {
    fn from(result: &SessionQueryResult) -> Self {
        Self {
            logged_in: result.is_logged_in(),
            second_factor_verified: result.is_second_factor_verified(),
            net_id: result.principal_id().map(str::to_owned),
        }
    }
}

/// Looks up `token` once and classifies the outcome
pub async fn resolve_session<Q>(query: &Q, token: &SessionToken) -> SessionQueryResult
where
    Q: SessionQuery + ?Sized,
{
    match query.query(token).await {
        Ok(response) => classify(response),
        Err(err) => {
            tracing::debug!("Session lookup failed: {}", err);
            classify_failure(&err, query.deployment())
        }
    }
}
