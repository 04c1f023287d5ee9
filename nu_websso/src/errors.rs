use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The outbound operation an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SessionLookup,
    LoginUrl,
    LogoutUrl,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::SessionLookup => "session lookup",
            Operation::LoginUrl => "login URL lookup",
            Operation::LogoutUrl => "logout URL lookup",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone)]
pub enum WebSsoError {
    /// The identity provider or gateway answered with an unexpected status
    #[error("{operation} failed with status {status}")]
    Provider {
        operation: Operation,
        status: u16,
        body: Value,
    },

    /// The request never produced a usable response
    #[error("{operation} request failed: {message}")]
    Transport { operation: Operation, message: String },

    #[error("{operation} response is missing field '{field}'")]
    MissingField {
        operation: Operation,
        field: &'static str,
        body: Value,
    },

    #[error("{0} is not supported by the configured deployment")]
    Unsupported(Operation),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WebSsoError {
    /// Upstream status code, or 500 when none could be recovered
    pub fn status(&self) -> u16 {
        match self {
            WebSsoError::Provider { status, .. } => *status,
            _ => 500,
        }
    }

    /// Upstream response body, if the failure carried one
    pub fn body(&self) -> Option<&Value> {
        match self {
            WebSsoError::Provider { body, .. } | WebSsoError::MissingField { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }

    pub fn operation(&self) -> Option<Operation> {
        match self {
            WebSsoError::Provider { operation, .. }
            | WebSsoError::Transport { operation, .. }
            | WebSsoError::MissingField { operation, .. } => Some(*operation),
            WebSsoError::Unsupported(operation) => Some(*operation),
            WebSsoError::Config(_) => None,
        }
    }
}
