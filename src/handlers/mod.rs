// Handlers module

pub mod chat;
pub mod health;

pub use chat::chat_handler;
pub use health::health_handler;

use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::config::ChatSettings;
use crate::llm::core::provider::GenerationClient;
use crate::models::ErrorResponse;

/// Read-only state shared by every request
pub struct AppState {
    pub client: Arc<dyn GenerationClient>,
    pub chat: ChatSettings,
}

impl AppState {
    pub fn new(client: Arc<dyn GenerationClient>, chat: ChatSettings) -> Self {
        Self { client, chat }
    }
}

/// JSON body with an explicit charset
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> warp::reply::Response {
    let reply = warp::reply::with_header(
        warp::reply::json(body),
        "content-type",
        "application/json; charset=utf-8",
    );
    warp::reply::with_status(reply, status).into_response()
}

pub fn internal_error() -> warp::reply::Response {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ErrorResponse::new("Internal Server Error"),
    )
}

pub fn not_found() -> warp::reply::Response {
    warp::reply::with_status("Not Found", StatusCode::NOT_FOUND).into_response()
}

/// Oversized `/chat` bodies become 413 (411 without a content-length), unmatched
/// method/path pairs a plain 404, and anything else that failed before a handler
/// produced a response a 500.
pub async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    // Checked first: a rejected /chat body is combined with the other routes' 404s
    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        warn!("Rejected oversized request body");
        return Ok(json_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            &ErrorResponse::new("Payload Too Large"),
        ));
    }
    if err.find::<warp::reject::LengthRequired>().is_some() {
        return Ok(json_response(
            StatusCode::LENGTH_REQUIRED,
            &ErrorResponse::new("Length Required"),
        ));
    }

    if err.is_not_found() || err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(not_found());
    }

    error!(rejection = ?err, "Request failed before reaching a handler");
    Ok(internal_error())
}
