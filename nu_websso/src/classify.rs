//! Interprets raw session lookups into [`SessionQueryResult`]s

use serde_json::{Value, json};

use crate::client::RawResponse;
use crate::config::Deployment;
use crate::errors::WebSsoError;
use crate::session::SessionQueryResult;

/// The name of the netid property in the session info
pub const NETID_PROPERTY_NAME: &str = "username";

/// The name of the Duo true/false property in the session info
pub const DUO_PROPERTY_NAME: &str = "isDuoAuthenticated";

/// Fault text the gateway emits when the identity provider answered 401
pub const UPSTREAM_UNAUTHORIZED_FAULT: &str = "ResponseCode 401 is treated as error";

/// Classifies a session lookup that produced a status in `200..=499`
pub fn classify(response: RawResponse) -> SessionQueryResult {
    let RawResponse { status, body } = response;
    match status {
        200 => match principal_id(&body) {
            Some(principal_id) => SessionQueryResult::Authenticated {
                status,
                second_factor_verified: second_factor_verified(&body),
                principal_id,
                body,
            },
            None => {
                tracing::debug!("Session info has no '{}'", NETID_PROPERTY_NAME);
                SessionQueryResult::Unauthenticated { status, body }
            }
        },
        401 => SessionQueryResult::Unauthenticated { status, body },
        _ => {
            tracing::debug!("Unexpected session info status {}", status);
            SessionQueryResult::ProviderError { status, body }
        }
    }
}

/// Classifies a session lookup that failed
///
/// The gateway turns an upstream 401 into its own 500; that single case is
/// reported as [`SessionQueryResult::Unauthenticated`] with the body a direct
/// 401 would carry. Every other failure is a provider error.
pub fn classify_failure(err: &WebSsoError, deployment: Deployment) -> SessionQueryResult {
    if let WebSsoError::Provider {
        status: 500, body, ..
    } = err
    {
        if deployment.tolerates_upstream_401_quirk() && is_upstream_unauthorized(body) {
            tracing::debug!("Gateway returned 500 for an upstream 401");
            return SessionQueryResult::Unauthenticated {
                status: 401,
                body: unauthorized_body(),
            };
        }
    }

    SessionQueryResult::ProviderError {
        status: err.status(),
        body: err.body().cloned().unwrap_or(Value::Null),
    }
}

/// Whether a gateway fault body reports that the upstream answered 401
pub fn is_upstream_unauthorized(body: &Value) -> bool {
    if let Some(fault) = body.pointer("/fault/faultstring").and_then(Value::as_str) {
        return fault.contains(UPSTREAM_UNAUTHORIZED_FAULT);
    }
    match body {
        Value::Null => false,
        Value::String(text) => text.contains(UPSTREAM_UNAUTHORIZED_FAULT),
        other => other.to_string().contains(UPSTREAM_UNAUTHORIZED_FAULT),
    }
}

/// Body of a normalized 401
pub fn unauthorized_body() -> Value {
    json!({
        "code": 401,
        "reason": "Unauthorized",
        "message": "Access Denied",
    })
}

fn principal_id(body: &Value) -> Option<String> {
    body.get(NETID_PROPERTY_NAME)
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
}

// The flag sits at the top level for direct lookups and under `properties`
// for the gateway, as a bool or as the string "true".
fn second_factor_verified(body: &Value) -> bool {
    let top_level = body.get(DUO_PROPERTY_NAME);
    let nested = body
        .get("properties")
        .and_then(|properties| properties.get(DUO_PROPERTY_NAME));
    [top_level, nested].into_iter().flatten().any(is_true_flag)
}

fn is_true_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(flag) => flag == "true",
        _ => false,
    }
}
