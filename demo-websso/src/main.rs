use axum::{Router, middleware::from_fn_with_state, routing::get};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nu_websso_axum::{
    ProviderConfig, WEBSSO_ROUTE_PREFIX, WebSso, require_sso_duo, websso_router,
};

mod handlers;

use crate::handlers::{duo_only, index, protected};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,nu_websso=debug,nu_websso_axum=debug,tower_http=info",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ProviderConfig::from_env()?;
    let websso = Arc::new(WebSso::new(config)?);
    tracing::info!("{:?}", websso);

    let app = Router::new()
        .route("/", get(index))
        .route("/protected", get(protected))
        .route(
            "/duo",
            get(duo_only).route_layer(from_fn_with_state(websso.clone(), require_sso_duo)),
        )
        .nest(WEBSSO_ROUTE_PREFIX.as_str(), websso_router())
        .with_state(websso);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3001);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::debug!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
