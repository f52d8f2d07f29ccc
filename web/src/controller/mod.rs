use axum::extract::rejection::JsonRejection;
use axum::Json;
use log::*;

pub(crate) mod check_controller;
pub(crate) mod diagnostics_controller;
pub(crate) mod health_check_controller;
pub(crate) mod track_controller;

/// Unwrap a JSON body, treating an unreadable one as an empty request so the
/// domain layer reports the missing field at the right step.
fn body_or_default<P: Default>(body: Result<Json<P>, JsonRejection>) -> P {
    match body {
        Ok(Json(params)) => params,
        Err(rejection) => {
            debug!("Unreadable request body: {}", rejection.body_text());
            P::default()
        }
    }
}
