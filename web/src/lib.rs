use axum::http::{header, HeaderValue, Method};
use log::*;
use tower_http::cors::CorsLayer;

pub use service::AppState;

mod controller;
mod error;
mod params;
mod response;
pub mod router;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let host = format!("{}:{}", interface, app_state.config.port);

    let cors_layer = cors_layer(&app_state.config.allowed_origins);

    info!(
        "Starting {} server on {host}, gating channel {:?}",
        app_state.config.runtime_env(),
        app_state.config.channel_id()
    );

    let listener = tokio::net::TcpListener::bind(&host).await?;
    axum::serve(listener, router::define_routes(app_state).layer(cors_layer)).await
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
