use serde_json::Value;
use std::time::Duration;

use crate::errors::{Operation, WebSsoError};

use super::RawResponse;

/// Creates the HTTP client used for provider calls
///
/// - `timeout`: taken from the provider configuration; there is no retry on expiry.
/// - `pool_idle_timeout`: 90 seconds, reqwest's default.
/// - `pool_max_idle_per_host`: 32 idle connections per host.
pub(super) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, WebSsoError> {
    if timeout.is_zero() {
        return Err(WebSsoError::Config(
            "timeout must be greater than zero".to_string(),
        ));
    }
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(32)
        .build()
        .map_err(|e| WebSsoError::Config(format!("Failed to create HTTP client: {e}")))
}

pub(super) fn transport_error(operation: Operation, err: reqwest::Error) -> WebSsoError {
    tracing::error!("{} request failed: {}", operation, err);
    WebSsoError::Transport {
        operation,
        message: err.to_string(),
    }
}

/// Empty bodies become `Null`; bodies that are not JSON are kept as a string
pub(super) fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

pub(super) async fn read_response(
    operation: Operation,
    response: reqwest::Response,
) -> Result<RawResponse, WebSsoError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(operation, e))?;
    tracing::debug!("{} responded with status {}", operation, status);
    Ok(RawResponse::new(status, parse_body(&text)))
}

/// Session lookups classify anything in `200..=499`
pub(super) fn accept_as_data(
    operation: Operation,
    response: RawResponse,
) -> Result<RawResponse, WebSsoError> {
    if (200..500).contains(&response.status) {
        Ok(response)
    } else {
        tracing::error!("{} failed with status {}", operation, response.status);
        Err(WebSsoError::Provider {
            operation,
            status: response.status,
            body: response.body,
        })
    }
}

/// URL lookups only accept 2xx
pub(super) fn require_success(
    operation: Operation,
    response: RawResponse,
) -> Result<Value, WebSsoError> {
    if (200..300).contains(&response.status) {
        Ok(response.body)
    } else {
        tracing::error!("{} failed with status {}", operation, response.status);
        Err(WebSsoError::Provider {
            operation,
            status: response.status,
            body: response.body,
        })
    }
}

pub(super) fn string_field(
    operation: Operation,
    body: Value,
    field: &'static str,
) -> Result<String, WebSsoError> {
    if let Some(value) = body.get(field).and_then(Value::as_str) {
        return Ok(value.to_string());
    }
    tracing::error!("{} response is missing '{}'", operation, field);
    Err(WebSsoError::MissingField {
        operation,
        field,
        body,
    })
}
