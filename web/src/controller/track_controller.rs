use crate::controller::body_or_default;
use crate::params::gate::TrackParams;
use crate::response::gate::GateResponse;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use domain::tracking as TrackingApi;

/// POST record an "open" or "subscribe_click" action for a verified user
#[utoipa::path(
    post,
    path = "/api/track",
    request_body = TrackParams,
    responses(
        (status = 200, description = "`ok: true` once the click is stored", body = GateResponse),
    )
)]
pub async fn track(
    State(app_state): State<AppState>,
    body: Result<Json<TrackParams>, JsonRejection>,
) -> Json<GateResponse> {
    let params = body_or_default(body);

    let result = TrackingApi::track(
        &app_state.config,
        params.init_data.as_deref(),
        params.action.as_deref(),
    )
    .await;

    Json(GateResponse::from(result))
}
