//! Axum-based mock of the identity provider and the agentless-websso proxy
//!
//! Each test starts its own server on an ephemeral port, so tests can run in
//! parallel and inspect exactly the requests they caused.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use nu_websso::ProviderConfig;

pub const MOCK_API_KEY: &str = "test-api-key";
pub const MOCK_LOGOUT_URL: &str = "https://websso.example.edu/nusso/XUI/#logout";

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockState {
    fn record(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: Value) {
        let request = RecordedRequest {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers: headers.clone(),
            body,
        };
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request);
    }
}

pub struct MockProvider {
    /// `127.0.0.1:<port>`, usable as the configured host
    pub host: String,
    state: MockState,
}

impl MockProvider {
    pub async fn start() -> Self {
        super::init_test_tracing();

        let state = MockState::default();
        let app = create_mock_app(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock provider");
        let addr = listener.local_addr().expect("Mock provider has no address");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                println!("Mock provider error: {e}");
            }
        });

        Self {
            host: addr.to_string(),
            state,
        }
    }

    pub fn direct_config(&self) -> ProviderConfig {
        ProviderConfig::direct(self.host.clone()).with_scheme("http")
    }

    pub fn gateway_config(&self) -> ProviderConfig {
        ProviderConfig::gateway(self.host.clone(), MOCK_API_KEY).with_scheme("http")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("request log poisoned")
            .clone()
    }
}

/// A host with nothing listening on it
pub async fn unreachable_host() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Probe listener has no address");
    drop(listener);
    addr.to_string()
}

fn create_mock_app(state: MockState) -> Router {
    Router::new()
        .route(
            "/nusso/json/realms/root/realms/{realm}/sessions",
            post(direct_session_info),
        )
        .route("/agentless-websso/session-info", get(gateway_session_info))
        .route(
            "/agentless-websso/get-ldap-redirect-url",
            get(gateway_redirect_url),
        )
        .route(
            "/agentless-websso/get-ldap-duo-redirect-url",
            get(gateway_redirect_url),
        )
        .route("/agentless-websso/logout", get(gateway_logout_url))
        .with_state(state)
}

fn json_response(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn invalid_api_key() -> Response {
    json_response(
        StatusCode::UNAUTHORIZED,
        json!({
            "fault": {
                "faultstring": "Invalid ApiKey",
                "detail": {"errorcode": "oauth.v2.InvalidApiKey"}
            }
        }),
    )
}

/// Session endpoint of the identity provider's REST API
async fn direct_session_info(
    State(state): State<MockState>,
    Path(realm): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.record(method, &uri, &headers, body.clone());

    if realm != "northwestern"
        || params.get("_action").map(String::as_str) != Some("getSessionInfo")
        || header(&headers, "accept-api-version") != Some("resource=3")
    {
        return json_response(
            StatusCode::BAD_REQUEST,
            json!({"code": 400, "reason": "Bad Request", "message": "Unsupported request"}),
        );
    }

    match body.get("tokenId").and_then(Value::as_str) {
        Some("tok123") => json_response(
            StatusCode::OK,
            json!({
                "username": "jdoe",
                "universalId": "id=jdoe,ou=user,o=northwestern,ou=services,o=root",
                "realm": "/northwestern",
                "isDuoAuthenticated": true
            }),
        ),
        Some("tok-noduo") => json_response(
            StatusCode::OK,
            json!({"username": "asmith", "isDuoAuthenticated": false}),
        ),
        Some("tok-nouser") => json_response(StatusCode::OK, json!({"valid": false})),
        Some("tok-500") => json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"code": 500, "reason": "Internal Server Error", "message": "boom"}),
        ),
        Some("tok-html") => (
            StatusCode::BAD_GATEWAY,
            "<html><body>Bad Gateway</body></html>",
        )
            .into_response(),
        _ => json_response(
            StatusCode::UNAUTHORIZED,
            json!({"code": 401, "reason": "Unauthorized", "message": "Access Denied"}),
        ),
    }
}

/// session-info resource of the gateway proxy
async fn gateway_session_info(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(method, &uri, &headers, Value::Null);

    if header(&headers, "apikey") != Some(MOCK_API_KEY) {
        return invalid_api_key();
    }

    match header(&headers, "webssotoken") {
        Some("gw-tok") => json_response(
            StatusCode::OK,
            json!({
                "username": "jdoe",
                "properties": {"isDuoAuthenticated": "true"}
            }),
        ),
        Some("gw-noduo") => json_response(
            StatusCode::OK,
            json!({
                "username": "jdoe",
                "properties": {"isDuoAuthenticated": "false"}
            }),
        ),
        Some("gw-broken") => json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"fault": {"faultstring": "Unexpected EOF at target"}}),
        ),
        Some("gw-empty") => StatusCode::OK.into_response(),
        // The proxy reports the identity provider's 401 as its own 500
        _ => json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "fault": {
                    "faultstring": "Received 401 Response from server: ResponseCode 401 is treated as error",
                    "detail": {"errorcode": "protocol.http.ResponseCodeError"}
                }
            }),
        ),
    }
}

/// get-ldap-redirect-url and get-ldap-duo-redirect-url resources
async fn gateway_redirect_url(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(method, &uri, &headers, Value::Null);

    if header(&headers, "apikey") != Some(MOCK_API_KEY) {
        return invalid_api_key();
    }
    let Some(goto) = header(&headers, "goto") else {
        return json_response(StatusCode::BAD_REQUEST, json!({"message": "goto is required"}));
    };

    let tree = if uri.path().ends_with("get-ldap-duo-redirect-url") {
        "ldap-and-duo"
    } else {
        "ldap-registry"
    };
    json_response(
        StatusCode::OK,
        json!({
            "redirecturl": format!(
                "https://websso.example.edu/nusso/XUI/?realm=northwestern#login&authIndexType=service&authIndexValue={tree}&goto={goto}"
            )
        }),
    )
}

async fn gateway_logout_url(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(method, &uri, &headers, Value::Null);
    json_response(StatusCode::OK, json!({"url": MOCK_LOGOUT_URL}))
}
