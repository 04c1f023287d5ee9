use http::StatusCode;
use nu_websso::WebSsoError;

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Upstream failures map to 502 Bad Gateway
impl<T> IntoResponseError<T> for Result<T, WebSsoError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| (status_for(&e), e.to_string()))
    }
}

pub(crate) fn status_for(err: &WebSsoError) -> StatusCode {
    match err {
        WebSsoError::Provider { .. }
        | WebSsoError::Transport { .. }
        | WebSsoError::MissingField { .. } => StatusCode::BAD_GATEWAY,
        WebSsoError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
        WebSsoError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
