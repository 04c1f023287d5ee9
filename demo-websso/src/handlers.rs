use axum::{Extension, response::Html};
use nu_websso_axum::{SsoUser, WEBSSO_ROUTE_PREFIX};

pub(crate) async fn index(user: Option<SsoUser>) -> Html<String> {
    let prefix = WEBSSO_ROUTE_PREFIX.as_str();
    match user {
        Some(u) => Html(format!(
            "<h1>Hey {}!</h1>\
             <p><a href=\"/protected\">Protected page</a> | \
             <a href=\"/duo\">Duo page</a> | \
             <a href=\"{prefix}/logout\">Logout</a></p>",
            u.net_id
        )),
        None => Html(format!(
            "<h1>Not logged in</h1>\
             <p><a href=\"{prefix}/login\">Login</a> | \
             <a href=\"{prefix}/login?duo=true\">Login with Duo</a></p>"
        )),
    }
}

pub(crate) async fn protected(user: SsoUser) -> Html<String> {
    tracing::trace!("Duo verified: {}", user.duo_verified);
    Html(format!(
        "<h1>Protected</h1><p>NetID: {}</p><p>Duo: {}</p><p><a href=\"/\">Home</a></p>",
        user.net_id, user.duo_verified
    ))
}

pub(crate) async fn duo_only(Extension(user): Extension<SsoUser>) -> Html<String> {
    Html(format!(
        "<h1>Duo verified</h1><p>{} passed through Duo.</p><p><a href=\"/\">Home</a></p>",
        user.net_id
    ))
}
