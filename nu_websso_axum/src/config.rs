//! Environment-driven settings for the axum integration

use std::sync::LazyLock;

/// Route prefix under which [`websso_router`](crate::websso_router) is usually mounted
/// Default: "/websso"
pub static WEBSSO_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    std::env::var("WEBSSO_ROUTE_PREFIX").unwrap_or_else(|_| "/websso".to_string())
});

/// Whether protected routes also require Duo
/// Default: false
pub static WEBSSO_REQUIRE_DUO: LazyLock<bool> =
    LazyLock::new(|| parse_flag(std::env::var("WEBSSO_REQUIRE_DUO").ok().as_deref(), false));

/// Public origin of this application, used to build the `goto` target
/// Default: `https://` plus the request's Host header
pub static WEBSSO_APP_ORIGIN: LazyLock<Option<String>> = LazyLock::new(|| {
    std::env::var("WEBSSO_APP_ORIGIN")
        .ok()
        .map(|origin| origin.trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
});

pub(crate) fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
