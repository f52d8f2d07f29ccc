use crate::controller::body_or_default;
use crate::params::gate::PingParams;
use crate::response::diagnostics::{BotIdentityResponse, PingResponse};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use domain::diagnostics as DiagnosticsApi;

/// GET the identity of the configured bot
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Bot username and id as reported by getMe", body = BotIdentityResponse),
    )
)]
pub async fn me(State(app_state): State<AppState>) -> Json<BotIdentityResponse> {
    Json(DiagnosticsApi::bot_identity(&app_state.config).await.into())
}

/// POST describe an init data payload without verifying it
#[utoipa::path(
    post,
    path = "/api/ping",
    request_body = PingParams,
    responses(
        (status = 200, description = "Length, keys and hash/user presence of the payload", body = PingResponse),
    )
)]
pub async fn ping(body: Result<Json<PingParams>, JsonRejection>) -> Json<PingResponse> {
    let params = body_or_default(body);
    Json(DiagnosticsApi::init_data_shape(params.init_data.as_deref()).into())
}
