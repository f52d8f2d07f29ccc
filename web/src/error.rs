use std::any::Any;

use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::outcome::{Failure, Step};
use log::*;

use crate::response::gate::GateResponse;

pub(crate) const UNEXPECTED: &str = "unexpected";

/// Renders a handler panic the same way as any other failed gate step, so the
/// Mini App always receives a JSON body it knows how to read.
pub(crate) fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else {
        "non-string panic payload"
    };
    error!("Request handler panicked: {detail}");

    Json(GateResponse::failed(Failure::new(Step::Catch, UNEXPECTED))).into_response()
}
