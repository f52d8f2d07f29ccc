use crate::controller::{
    check_controller, diagnostics_controller, health_check_controller, track_controller,
};
use crate::{error, params, response, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Channel Gate API"
        ),
        paths(
            check_controller::check,
            track_controller::track,
            diagnostics_controller::me,
            diagnostics_controller::ping,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                params::gate::CheckParams,
                params::gate::TrackParams,
                params::gate::PingParams,
                response::gate::GateResponse,
                response::diagnostics::BotIdentityResponse,
                response::diagnostics::PingResponse,
            )
        ),
        tags(
            (name = "channel_gate", description = "Telegram Mini App channel subscription gate")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(gate_routes(app_state.clone()))
        .merge(diagnostic_routes(app_state))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .layer(CatchPanicLayer::custom(error::panic_response))
}

fn gate_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/check", post(check_controller::check))
        .route("/api/track", post(track_controller::track))
        .with_state(app_state)
}

fn diagnostic_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/me", get(diagnostics_controller::me))
        .route("/api/ping", post(diagnostics_controller::ping))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}
