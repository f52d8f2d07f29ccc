use crate::controller::body_or_default;
use crate::params::gate::CheckParams;
use crate::response::gate::GateResponse;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use domain::gate as GateApi;
use log::*;

/// POST check whether the Mini App user is subscribed to the gated channel
#[utoipa::path(
    post,
    path = "/api/check",
    request_body = CheckParams,
    responses(
        (status = 200, description = "Outcome of the gate check, `ok` tells success from failure", body = GateResponse),
    )
)]
pub async fn check(
    State(app_state): State<AppState>,
    body: Result<Json<CheckParams>, JsonRejection>,
) -> Json<GateResponse> {
    let params = body_or_default(body);
    debug!(
        "POST /api/check from {}",
        params.source.as_deref().unwrap_or("unknown source")
    );

    let result = GateApi::check(&app_state.config, params.init_data.as_deref()).await;

    Json(GateResponse::from(result))
}
